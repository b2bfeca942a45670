/// Reciprocal Rank Fusion of the two retrieval signals.
///
/// RRF score for each author = sum of 1/(k + rank_i) over each signal i
/// the author appears in. Authors appearing in both signals score higher
/// than single-signal authors, and the fusion is robust to the differing
/// score scales of BM25 and cosine similarity.
///
/// The fusion formula alone does not order authors with equal scores, so
/// ties resolve by author identifier ascending — the documented
/// deterministic secondary key.

use serde::Serialize;

use crate::retrieval::RankedEntry;

/// Default RRF smoothing constant (from the original RRF literature;
/// reduces the dominance of rank-1 entries).
pub const DEFAULT_RRF_K: f64 = 60.0;

/// One signal's view of a fused author: rank and scores if the author made
/// that signal's top-N, or all-None as the explicit "not ranked" marker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignalDetail {
    pub rank: Option<usize>,
    pub max_score: Option<f64>,
    pub avg_score: Option<f64>,
}

impl SignalDetail {
    fn from_entry(entry: &RankedEntry) -> Self {
        SignalDetail {
            rank: Some(entry.rank),
            max_score: Some(entry.max_score),
            avg_score: Some(entry.avg_score),
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }
}

/// A fused candidate with per-signal detail attached.
#[derive(Debug, Clone, Serialize)]
pub struct FusedCandidate {
    pub author: String,
    pub rrf_score: f64,
    pub lexical: SignalDetail,
    pub semantic: SignalDetail,
    /// Matching-document count: the lexical signal's count when available,
    /// the semantic signal's otherwise.
    pub num_papers: Option<usize>,
}

/// Fuse the lexical and semantic ranked lists via RRF.
///
/// A missing signal (None) contributes nothing — with one signal the
/// fusion degrades to a pass-through of the available ranking. Output is
/// sorted by rrf_score descending (author ascending on ties) and truncated
/// to `top_k`.
pub fn rrf_fuse(
    lexical: Option<&[RankedEntry]>,
    semantic: Option<&[RankedEntry]>,
    k: f64,
    top_k: usize,
) -> Vec<FusedCandidate> {
    use std::collections::HashMap;

    let mut scores: HashMap<String, f64> = HashMap::new();
    for entries in [lexical, semantic].into_iter().flatten() {
        for entry in entries {
            *scores.entry(entry.author.clone()).or_default() += 1.0 / (k + entry.rank as f64);
        }
    }

    let mut fused: Vec<FusedCandidate> = scores
        .into_iter()
        .map(|(author, rrf_score)| {
            let lexical_detail = find_detail(lexical, &author);
            let semantic_detail = find_detail(semantic, &author);
            let num_papers = find_count(lexical, &author).or_else(|| find_count(semantic, &author));
            FusedCandidate {
                author,
                rrf_score,
                lexical: lexical_detail,
                semantic: semantic_detail,
                num_papers,
            }
        })
        .collect();

    fused.sort_by(|a, b| {
        b.rrf_score
            .partial_cmp(&a.rrf_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.author.cmp(&b.author))
    });
    fused.truncate(top_k);
    fused
}

fn find_detail(entries: Option<&[RankedEntry]>, author: &str) -> SignalDetail {
    entries
        .and_then(|list| list.iter().find(|e| e.author == author))
        .map(SignalDetail::from_entry)
        .unwrap_or_default()
}

fn find_count(entries: Option<&[RankedEntry]>, author: &str) -> Option<usize> {
    entries
        .and_then(|list| list.iter().find(|e| e.author == author))
        .map(|e| e.num_papers)
}
