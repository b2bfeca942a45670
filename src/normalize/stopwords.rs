/// Stopword lists for the lexical query branch.
///
/// Two sets: a standard English list and a curated domain list covering
/// section names and generic academic nouns that carry no topical signal
/// in a manuscript corpus. Tokens are checked against both before and
/// after stemming.

const ENGLISH_STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "ain", "all", "am", "an", "and", "any",
    "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "couldn", "did", "didn", "do", "does", "doesn", "doing", "don",
    "down", "during", "each", "few", "for", "from", "further", "had", "hadn", "has", "hasn",
    "have", "haven", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "ll", "ma", "me",
    "mightn", "more", "most", "mustn", "my", "myself", "needn", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "re", "same", "shan", "she", "should", "shouldn", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn", "we", "were",
    "weren", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "won", "wouldn", "you", "your", "yours", "yourself", "yourselves",
];

/// Section names and generic academic vocabulary.
const DOMAIN_STOP_WORDS: &[&str] = &[
    "abstract", "accepted", "acknowledgement", "al", "analysis", "appendix", "author", "authors",
    "caption", "conclusion", "conference", "corresponding", "data", "dataset", "discussion",
    "et", "experiment", "experiments", "figure", "index", "introduction", "journal", "keywords",
    "manuscript", "methodology", "no", "online", "paper", "profile", "affiliation", "publication",
    "received", "reference", "references", "result", "results", "section", "statistic",
    "statistics", "studies", "study", "summary", "table", "terms", "vol", "work", "works",
];

pub(crate) fn is_stopword(word: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(&word) || DOMAIN_STOP_WORDS.contains(&word)
}
