/// Front-matter stripping for manuscript text.
///
/// Two strategies, tried in order:
/// 1. Jump to the earliest recognized section heading (abstract,
///    introduction, "1. Introduction", "I. INTRODUCTION", background).
/// 2. Otherwise run a per-line state machine that drops leading lines
///    while they classify as author/affiliation block, flipping to in-body
///    at the first long terminal-punctuated sentence or section keyword.
///
/// In both branches the first "meaningful" line (more than two words) is
/// re-prepended as an inferred title.

use regex::Regex;

/// Keywords that suggest an affiliation/institution line.
const AFFILIATION_HINTS: &[&str] = &[
    "university", "institute", "department", "school", "laboratory", "centre", "center",
    "college", "faculty", "academy", "csir", "iit", "iiit", "nit", "google", "microsoft",
    "lab", "research", "science", "engineering", "technology", "hospital",
];

/// Line classification state while scanning from the top of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    FrontMatter,
    InBody,
}

pub(crate) struct FrontMatterStripper {
    section_starts: Vec<Regex>,
    email_orcid: Vec<Regex>,
    countries: Regex,
    section_keyword: Regex,
}

impl FrontMatterStripper {
    pub(crate) fn new() -> Self {
        let section_starts = vec![
            Regex::new(r"(?i)\babstract\b").expect("static regex"),
            Regex::new(r"(?i)\bintroduction\b").expect("static regex"),
            Regex::new(r"(?im)^\s*1[\.\)]?\s*introduction\b").expect("static regex"),
            Regex::new(r"(?im)^\s*i+\.\s*introduction\b").expect("static regex"),
            Regex::new(r"(?im)^\s*background\b").expect("static regex"),
        ];
        let email_orcid = vec![
            Regex::new(r"@").expect("static regex"),
            Regex::new(r"(?i)\borcid\b").expect("static regex"),
            Regex::new(r"\b0000-\d{4}-\d{4}-\d{4}\b").expect("static regex"),
        ];
        let countries = Regex::new(r"(?i)\bindia\b|\busa\b|\buk\b|\bsingapore\b|\bchina\b|\baustralia\b")
            .expect("static regex");
        let section_keyword =
            Regex::new(r"(?i)(abstract|introduction|keywords|index terms)\b").expect("static regex");

        FrontMatterStripper {
            section_starts,
            email_orcid,
            countries,
            section_keyword,
        }
    }

    /// Strip the author/affiliation block from already whitespace-normalized
    /// text. Degenerate input (everything classified as front matter) yields
    /// an empty or title-only string, never an error.
    pub(crate) fn strip(&self, text: &str) -> String {
        let title = self.infer_title(text);

        let body = match self.earliest_section_start(text) {
            Some(offset) => text[offset..].to_string(),
            None => self.drop_leading_front_matter(text),
        };

        match title {
            Some(title) => format!("{}\n{}", title, body),
            None => body,
        }
    }

    /// First line with more than two words, taken as the manuscript title.
    fn infer_title(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .find(|line| line.split_whitespace().count() > 2)
            .map(str::to_string)
    }

    /// Byte offset of the earliest recognized section heading, if any.
    fn earliest_section_start(&self, text: &str) -> Option<usize> {
        self.section_starts
            .iter()
            .filter_map(|pattern| pattern.find(text).map(|m| m.start()))
            .min()
    }

    /// Per-line fallback: drop lines while they classify as front matter.
    fn drop_leading_front_matter(&self, text: &str) -> String {
        let mut state = ScanState::FrontMatter;
        let mut kept: Vec<&str> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if state == ScanState::FrontMatter {
                let dropworthy = self.looks_like_affiliation(trimmed) || !is_long_sentence(trimmed);
                if dropworthy && !self.is_section_keyword_line(trimmed) {
                    continue;
                }
                state = ScanState::InBody;
            }
            kept.push(line);
        }

        kept.join("\n")
    }

    /// Affiliation/author-block heuristics: institution keywords, email or
    /// ORCID patterns, short comma-separated fragments, country names.
    fn looks_like_affiliation(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        AFFILIATION_HINTS.iter().any(|hint| lower.contains(hint))
            || self.email_orcid.iter().any(|pattern| pattern.is_match(line))
            || (line.contains(',') && line.len() < 140 && !line.ends_with('.'))
            || self.countries.is_match(line)
    }

    fn is_section_keyword_line(&self, line: &str) -> bool {
        self.section_keyword.is_match(line)
    }
}

/// A "normal" paragraph line: long and terminally punctuated.
fn is_long_sentence(line: &str) -> bool {
    line.len() > 120 && line.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jumps_to_abstract_heading() {
        let stripper = FrontMatterStripper::new();
        let text = "A Study of Graph Networks\nJane Doe, Example University\nAbstract\nWe study graphs.";
        let out = stripper.strip(text);
        assert!(out.starts_with("A Study of Graph Networks\n"));
        assert!(out.contains("Abstract\nWe study graphs."));
        assert!(!out.contains("Example University"));
    }

    #[test]
    fn test_numbered_introduction_heading() {
        let stripper = FrontMatterStripper::new();
        let text = "Some Title Goes Here\nauthor@example.org\n1. Introduction\nBody text.";
        let out = stripper.strip(text);
        assert!(out.contains("1. Introduction\nBody text."));
        assert!(!out.contains("author@example.org"));
    }

    #[test]
    fn test_heuristic_fallback_drops_affiliation_block() {
        let stripper = FrontMatterStripper::new();
        let long_sentence = format!("{}.", "graph neural networks are widely used in practice ".repeat(4).trim());
        assert!(long_sentence.len() > 120);
        let text = format!(
            "Deep Learning for Image Segmentation\nJane Doe, John Smith\nDept of CS, Example University, India\n{}",
            long_sentence
        );
        let out = stripper.strip(&text);
        assert!(out.starts_with("Deep Learning for Image Segmentation\n"));
        assert!(out.contains(&long_sentence));
        assert!(!out.contains("Example University"));
    }

    #[test]
    fn test_degenerate_input_yields_empty_body() {
        let stripper = FrontMatterStripper::new();
        // Two-word lines only: no title, everything classifies as front matter.
        let out = stripper.strip("Jane Doe\nExample University");
        assert!(out.is_empty());
    }

    #[test]
    fn test_title_prepended_even_without_section_heading() {
        let stripper = FrontMatterStripper::new();
        let long_sentence = format!("{}.", "the quick brown fox jumps over the lazy dog near a riverbank ".repeat(3).trim());
        let text = format!("A Meaningful Title Line\nshort, fragment\n{}", long_sentence);
        let out = stripper.strip(&text);
        assert!(out.starts_with("A Meaningful Title Line\n"));
    }
}
