/// Text Normalizer: turns raw manuscript text into the two query forms the
/// retrievers consume.
///
/// Pipeline (shared): whitespace/hyphenation normalization → front-matter
/// strip → back-matter cut → noise removal. From the cleaned text:
/// - lexical branch: lowercase, digit/punctuation strip, tokenize, stopword
///   filter, Snowball stemming, alphabetic length-[3,19] filter, stopword
///   re-filter;
/// - semantic branch: lowercase + whitespace collapse only, truncated to
///   the embedding model's input budget.
///
/// Degenerate input produces empty outputs; the engine raises EmptyInput
/// before any retriever runs.

mod front_matter;
mod stopwords;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

use front_matter::FrontMatterStripper;
use stopwords::is_stopword;

/// Shortest and longest token kept by the lexical branch.
const MIN_TOKEN_LEN: usize = 3;
const MAX_TOKEN_LEN: usize = 19;

/// Both query forms produced from one manuscript.
#[derive(Debug, Clone)]
pub struct NormalizedQuery {
    /// Cleaned token sequence for BM25 scoring.
    pub lexical_tokens: Vec<String>,
    /// Length-bounded text for the embedding model.
    pub semantic_text: String,
}

pub struct TextNormalizer {
    max_query_tokens: usize,
    stemmer: Stemmer,
    front: FrontMatterStripper,
    linebreak_hyphen: Regex,
    blank_lines: Regex,
    section_ends: Vec<Regex>,
    bracket_citations: Regex,
    author_year_citations: Regex,
    caption_markers: Regex,
    urls: Regex,
    unit_measurements: Regex,
    digits: Regex,
}

impl TextNormalizer {
    pub fn new(max_query_tokens: usize) -> Self {
        TextNormalizer {
            max_query_tokens,
            stemmer: Stemmer::create(Algorithm::English),
            front: FrontMatterStripper::new(),
            linebreak_hyphen: Regex::new(r"-\s*\n\s*").expect("static regex"),
            blank_lines: Regex::new(r"\n+").expect("static regex"),
            section_ends: vec![
                Regex::new(r"(?i)\breferences\b").expect("static regex"),
                Regex::new(r"(?i)\bbibliography\b").expect("static regex"),
                Regex::new(r"(?i)\backnowledg(e)?ments?\b").expect("static regex"),
                Regex::new(r"(?i)\bappendix\b").expect("static regex"),
            ],
            bracket_citations: Regex::new(r"\[[0-9,\s\-]+\]").expect("static regex"),
            author_year_citations: Regex::new(r"\(\s*[A-Z][A-Za-z\-]+,\s*\d{4}\s*\)")
                .expect("static regex"),
            caption_markers: Regex::new(r"(?i)(figure|fig\.?|table)\s+\d+[:.\-]?")
                .expect("static regex"),
            urls: Regex::new(r"http\S+|www\.\S+").expect("static regex"),
            unit_measurements: Regex::new(r"(?i)\d{1,4}\s*(%|°[CF]|km|mm|cm|m|hz|khz|mhz|ghz)\b")
                .expect("static regex"),
            digits: Regex::new(r"\d+").expect("static regex"),
        }
    }

    /// Produce both query branches from raw extracted manuscript text.
    pub fn prepare(&self, raw: &str) -> NormalizedQuery {
        let cleaned = self.clean(raw);
        NormalizedQuery {
            lexical_tokens: self.lexical_tokens(&cleaned),
            semantic_text: self.semantic_text(&cleaned),
        }
    }

    /// Shared cleaning steps: whitespace, front matter, back matter, noise.
    pub fn clean(&self, raw: &str) -> String {
        let text = self.normalize_whitespace(raw);
        let text = self.front.strip(&text);
        let text = self.strip_back_matter(&text);
        self.remove_noise(&text)
    }

    /// Remove soft hyphens, rejoin line-break-hyphenated words, collapse
    /// blank lines.
    fn normalize_whitespace(&self, text: &str) -> String {
        let text = text.replace('\u{00ad}', "");
        let text = self.linebreak_hyphen.replace_all(&text, "");
        self.blank_lines.replace_all(&text, "\n").into_owned()
    }

    /// Cut at the first references/bibliography/acknowledgements/appendix
    /// marker; unchanged when none is found.
    fn strip_back_matter(&self, text: &str) -> String {
        let cut = self
            .section_ends
            .iter()
            .filter_map(|pattern| pattern.find(text).map(|m| m.start()))
            .min();
        match cut {
            Some(offset) => text[..offset].to_string(),
            None => text.to_string(),
        }
    }

    /// Drop citations, caption markers, URLs, and unit-suffixed
    /// measurements.
    fn remove_noise(&self, text: &str) -> String {
        let text = self.bracket_citations.replace_all(text, " ");
        let text = self.author_year_citations.replace_all(&text, " ");
        let text = self.caption_markers.replace_all(&text, " ");
        let text = self.urls.replace_all(&text, " ");
        self.unit_measurements.replace_all(&text, " ").into_owned()
    }

    /// Lexical-scoring branch: cleaned token sequence.
    pub fn lexical_tokens(&self, cleaned: &str) -> Vec<String> {
        let lowered = cleaned.to_lowercase();
        // Fold diacritics so "Müller" and "Muller" score the same term.
        let folded: String = lowered
            .nfkd()
            .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
            .collect();
        let no_digits = self.digits.replace_all(&folded, " ");
        let stripped: String = no_digits
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();

        stripped
            .split_whitespace()
            .filter(|word| word.len() >= MIN_TOKEN_LEN && !is_stopword(word))
            .map(|word| self.stemmer.stem(word).to_string())
            .filter(|word| {
                word.chars().all(char::is_alphabetic)
                    && word.len() >= MIN_TOKEN_LEN
                    && word.len() <= MAX_TOKEN_LEN
                    && !is_stopword(word)
            })
            .collect()
    }

    /// Semantic-scoring branch: lowercase, whitespace-normalize, truncate
    /// to the embedding input budget.
    pub fn semantic_text(&self, cleaned: &str) -> String {
        cleaned
            .to_lowercase()
            .split_whitespace()
            .take(self.max_query_tokens)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
