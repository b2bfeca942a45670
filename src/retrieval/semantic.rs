/// Semantic retriever: cosine similarity between the query embedding and
/// every corpus document vector, aggregated to author level.
///
/// Unlike the lexical signal, raw cosine values are kept as-is — they are
/// already bounded and comparable, so no min-max pass is applied.

use crate::artifacts::SemanticIndex;

use super::{aggregate_by_author, rank_top_n, RankedEntry};

/// Cosine similarity between two vectors. Returns 0.0 when either vector
/// has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Similarity per corpus document, aligned to the index's document order.
pub fn score_documents(index: &SemanticIndex, query_vector: &[f32]) -> Vec<f64> {
    index
        .embeddings
        .iter()
        .map(|doc_vector| cosine_similarity(query_vector, doc_vector))
        .collect()
}

/// Rank authors by max similarity; emit the top-N.
pub fn rank_authors(index: &SemanticIndex, query_vector: &[f32], top_n: usize) -> Vec<RankedEntry> {
    let doc_scores = score_documents(index, query_vector);
    let stats = aggregate_by_author(&doc_scores, &index.doc_authors);
    rank_top_n(stats.into_iter().collect(), top_n)
}
