/// Author-level retrieval primitives shared by both signals.
///
/// Each retriever scores corpus documents, aggregates scores up to the
/// owning author (max, mean, matching-document count), then emits a ranked
/// top-N list. Ranks are 1-based, unique, and contiguous; an author
/// appears at most once per list.

pub mod lexical;
pub mod semantic;

use std::collections::HashMap;

/// One author's position in a single signal's ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub author: String,
    /// 1-based rank within this signal's list.
    pub rank: usize,
    pub max_score: f64,
    pub avg_score: f64,
    /// Number of corpus documents owned by this author that were scored.
    pub num_papers: usize,
}

/// Per-author aggregate of document scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthorStats {
    pub max: f64,
    pub avg: f64,
    pub count: usize,
}

/// Aggregate per-document scores up to per-author statistics.
///
/// `doc_scores` and `doc_authors` are parallel arrays.
pub fn aggregate_by_author(doc_scores: &[f64], doc_authors: &[String]) -> HashMap<String, AuthorStats> {
    let mut sums: HashMap<String, (f64, f64, usize)> = HashMap::new();
    for (score, author) in doc_scores.iter().zip(doc_authors) {
        let entry = sums.entry(author.clone()).or_insert((f64::NEG_INFINITY, 0.0, 0));
        entry.0 = entry.0.max(*score);
        entry.1 += score;
        entry.2 += 1;
    }

    sums.into_iter()
        .map(|(author, (max, sum, count))| {
            (
                author,
                AuthorStats {
                    max,
                    avg: sum / count as f64,
                    count,
                },
            )
        })
        .collect()
}

/// Min-max normalization over a slice of values.
///
/// Edge case: if max == min (including single-element slices), returns
/// vec![1.0; n] — all-identical scores signal "no discrimination" rather
/// than dividing by zero.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![1.0; values.len()];
    }
    values.iter().map(|&v| (v - min) / (max - min)).collect()
}

/// Sort (max descending, author ascending) and emit the top-N with 1-based
/// ranks.
pub(crate) fn rank_top_n(mut entries: Vec<(String, AuthorStats)>, top_n: usize) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| {
        b.1.max
            .partial_cmp(&a.1.max)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    entries
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, (author, stats))| RankedEntry {
            author,
            rank: i + 1,
            max_score: stats.max,
            avg_score: stats.avg,
            num_papers: stats.count,
        })
        .collect()
}
