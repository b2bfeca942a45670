/// Lexical retriever: BM25 scoring over the precomputed term-statistics
/// index, aggregated to author level.
///
/// Uses the standard Okapi parameters (k1 = 1.5, b = 0.75) and the
/// non-negative IDF variant ln((N - df + 0.5)/(df + 0.5) + 1). Query
/// tokens are scored as given — repeated tokens contribute once per
/// occurrence.
///
/// Max and average author scores are min-max normalized independently
/// across the authors present in the result set before ranking; raw BM25
/// magnitudes are corpus-dependent and not comparable across queries.

use crate::artifacts::LexicalIndex;

use super::{aggregate_by_author, min_max_normalize, rank_top_n, RankedEntry};

/// Term frequency saturation parameter.
pub const BM25_K1: f64 = 1.5;

/// Length normalization parameter. 0 = none, 1 = full.
pub const BM25_B: f64 = 0.75;

/// Non-negative BM25 IDF.
#[inline]
fn bm25_idf(doc_freq: f64, total_docs: f64) -> f64 {
    ((total_docs - doc_freq + 0.5) / (doc_freq + 0.5) + 1.0).ln()
}

/// BM25 score per corpus document for the query tokens, aligned to the
/// index's document order.
pub fn score_documents(index: &LexicalIndex, query_tokens: &[String]) -> Vec<f64> {
    let total_docs = index.num_docs() as f64;
    let mut scores = vec![0.0; index.num_docs()];

    for token in query_tokens {
        let df = match index.doc_frequency.get(token) {
            Some(&df) => df as f64,
            None => continue,
        };
        let idf = bm25_idf(df, total_docs);

        for (i, doc_terms) in index.doc_terms.iter().enumerate() {
            let tf = match doc_terms.get(token) {
                Some(&tf) => tf as f64,
                None => continue,
            };
            let length_norm = 1.0 - BM25_B + BM25_B * (index.doc_lengths[i] / index.avg_doc_len);
            scores[i] += idf * (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * length_norm);
        }
    }

    scores
}

/// Rank authors for the query: score documents, aggregate per author,
/// normalize max/avg independently, emit the top-N by normalized max.
pub fn rank_authors(index: &LexicalIndex, query_tokens: &[String], top_n: usize) -> Vec<RankedEntry> {
    let doc_scores = score_documents(index, query_tokens);
    let stats = aggregate_by_author(&doc_scores, &index.doc_authors);

    // Stable author order so the normalized columns line up.
    let mut authors: Vec<_> = stats.into_iter().collect();
    authors.sort_by(|a, b| a.0.cmp(&b.0));

    let norm_max = min_max_normalize(&authors.iter().map(|(_, s)| s.max).collect::<Vec<_>>());
    let norm_avg = min_max_normalize(&authors.iter().map(|(_, s)| s.avg).collect::<Vec<_>>());

    let normalized: Vec<_> = authors
        .into_iter()
        .zip(norm_max.into_iter().zip(norm_avg))
        .map(|((author, stats), (max, avg))| {
            (
                author,
                super::AuthorStats {
                    max,
                    avg,
                    count: stats.count,
                },
            )
        })
        .collect();

    rank_top_n(normalized, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::LexicalArtifact;
    use std::collections::HashMap;

    fn terms(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    fn index() -> LexicalIndex {
        LexicalIndex::from_artifact(LexicalArtifact {
            doc_authors: vec!["rao".into(), "rao".into(), "iyer".into(), "das".into()],
            doc_terms: vec![
                terms(&[("graph", 3), ("network", 2)]),
                terms(&[("graph", 1), ("image", 2)]),
                terms(&[("image", 3), ("segment", 2)]),
                terms(&[("protein", 4)]),
            ],
        })
        .unwrap()
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_rare_term_outranks_common() {
        let index = index();
        let scores = score_documents(&index, &tokens(&["protein"]));
        // Only das's document mentions protein.
        assert!(scores[3] > 0.0);
        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[1], 0.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_unknown_term_scores_zero() {
        let index = index();
        let scores = score_documents(&index, &tokens(&["blockchain"]));
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_repeated_query_token_accumulates() {
        let index = index();
        let once = score_documents(&index, &tokens(&["graph"]));
        let twice = score_documents(&index, &tokens(&["graph", "graph"]));
        assert!((twice[0] - 2.0 * once[0]).abs() < 1e-12);
    }

    #[test]
    fn test_rank_authors_normalized_and_ordered() {
        let index = index();
        let ranked = rank_authors(&index, &tokens(&["graph", "network"]), 10);

        assert_eq!(ranked[0].author, "rao");
        assert_eq!(ranked[0].rank, 1);
        // Top author's normalized max is 1.0, bottom author's is 0.0.
        assert!((ranked[0].max_score - 1.0).abs() < 1e-12);
        assert_eq!(ranked.last().unwrap().max_score, 0.0);
        // rao owns two scored documents.
        assert_eq!(ranked[0].num_papers, 2);
        // Ranks are contiguous from 1.
        let ranks: Vec<usize> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=ranked.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_discrimination_normalizes_to_one() {
        // No query token matches anything: every author's max and avg are 0,
        // so normalization maps them all to 1.0 instead of dividing by zero.
        let index = index();
        let ranked = rank_authors(&index, &tokens(&["blockchain"]), 10);
        assert!(ranked.iter().all(|e| e.max_score == 1.0 && e.avg_score == 1.0));
    }

    #[test]
    fn test_top_n_truncates() {
        let index = index();
        let ranked = rank_authors(&index, &tokens(&["graph", "image"]), 2);
        assert_eq!(ranked.len(), 2);
    }
}
