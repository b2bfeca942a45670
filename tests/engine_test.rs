//! End-to-end engine tests over in-memory artifacts with a stubbed
//! embedding provider: no model downloads, no network, no files.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use peermatch::artifacts::{
    ArtifactStore, AuthorProfile, AuthorProfiles, LexicalArtifact, LexicalIndex, SemanticArtifact,
    SemanticIndex,
};
use peermatch::embedding::{EmbeddingError, EmbeddingProvider};
use peermatch::engine::{EngineOptions, RecommendationEngine, RetrievalMode};

/// Always returns the same vector, instantly.
struct StubProvider {
    vector: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vector.clone())
    }

    fn model_name(&self) -> &str {
        "stub"
    }

    fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Always fails.
struct FailingProvider;

#[async_trait]
impl EmbeddingProvider for FailingProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Generation("stub inference failure".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing-stub"
    }

    fn dimension(&self) -> usize {
        3
    }
}

/// Never answers within any sane test timeout.
struct SlowProvider;

#[async_trait]
impl EmbeddingProvider for SlowProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(vec![1.0, 0.0, 0.0])
    }

    fn model_name(&self) -> &str {
        "slow-stub"
    }

    fn dimension(&self) -> usize {
        3
    }
}

fn terms(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
    pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
}

/// Four documents, three authors. Terms are stored in their stemmed form,
/// matching what the query normalizer emits.
fn lexical_index() -> LexicalIndex {
    LexicalIndex::from_artifact(LexicalArtifact {
        doc_authors: vec!["rao".into(), "rao".into(), "iyer".into(), "das".into()],
        doc_terms: vec![
            terms(&[("graph", 4), ("neural", 3), ("network", 2)]),
            terms(&[("graph", 2), ("predict", 1)]),
            terms(&[("network", 1), ("predict", 3)]),
            terms(&[("protein", 5)]),
        ],
    })
    .expect("valid lexical artifact")
}

fn semantic_index() -> SemanticIndex {
    SemanticIndex::from_artifact(SemanticArtifact {
        doc_ids: vec!["p1".into(), "p2".into(), "p3".into(), "p4".into()],
        doc_authors: vec!["rao".into(), "rao".into(), "iyer".into(), "das".into()],
        embeddings: vec![
            vec![0.9, 0.1, 0.0],
            vec![0.8, 0.2, 0.0],
            vec![0.1, 0.9, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
    })
    .expect("valid semantic artifact")
}

fn profiles() -> AuthorProfiles {
    let mut map = HashMap::new();
    map.insert(
        "rao".to_string(),
        AuthorProfile {
            primary_institution: "IIT".to_string(),
            num_papers: 32,
            recent_papers: 2,
            latest_year: Some(2025),
        },
    );
    map.insert(
        "iyer".to_string(),
        AuthorProfile {
            primary_institution: "Other".to_string(),
            num_papers: 8,
            recent_papers: 4,
            latest_year: Some(2026),
        },
    );
    // das intentionally unprofiled.
    AuthorProfiles::new(map)
}

fn store(lexical: bool, semantic: bool) -> ArtifactStore {
    ArtifactStore {
        lexical: lexical.then(lexical_index),
        semantic: semantic.then(semantic_index),
        profiles: profiles(),
    }
}

fn options() -> EngineOptions {
    EngineOptions {
        embed_timeout: Duration::from_millis(200),
        ..EngineOptions::default()
    }
}

const MANUSCRIPT: &str = "\
Graph Neural Networks for Molecular Prediction

Abstract

We describe graph neural networks applied to molecular prediction tasks, \
with benchmarks on several public datasets and an analysis of network \
depth against predictive quality.";

#[tokio::test]
async fn test_hybrid_run_produces_tiered_list() {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubProvider {
        vector: vec![1.0, 0.0, 0.0],
    });
    let engine = RecommendationEngine::new(store(true, true), Some(provider), options())
        .expect("engine builds");

    let out = engine.recommend(MANUSCRIPT).await.expect("run succeeds");
    assert_eq!(out.mode, RetrievalMode::Hybrid);
    assert!(!out.results.is_empty());

    // rao dominates both signals.
    assert_eq!(out.results[0].author, "rao");
    assert_eq!(out.results[0].rank, 1);
    assert_eq!(out.results[0].score, 100.0);
    assert_eq!(out.results[0].institution, "IIT");

    // Ranks contiguous from 1; scores non-increasing.
    for (i, r) in out.results.iter().enumerate() {
        assert_eq!(r.rank, i + 1);
    }
    for pair in out.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn test_embed_failure_demotes_to_lexical_only() {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(FailingProvider);
    let engine = RecommendationEngine::new(store(true, true), Some(provider), options())
        .expect("engine builds");

    let out = engine.recommend(MANUSCRIPT).await.expect("run survives");
    assert_eq!(out.mode, RetrievalMode::LexicalOnly);
    assert!(!out.results.is_empty());
    // Semantic detail is the explicit not-ranked marker everywhere.
    assert!(out.results.iter().all(|r| r.avg_similarity_pct >= 0.0));
}

#[tokio::test]
async fn test_embed_timeout_demotes_to_lexical_only() {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(SlowProvider);
    let engine = RecommendationEngine::new(store(true, true), Some(provider), options())
        .expect("engine builds");

    let out = engine.recommend(MANUSCRIPT).await.expect("run survives");
    assert_eq!(out.mode, RetrievalMode::LexicalOnly);
}

#[tokio::test]
async fn test_semantic_only_when_no_lexical_index() {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubProvider {
        vector: vec![1.0, 0.0, 0.0],
    });
    let engine = RecommendationEngine::new(store(false, true), Some(provider), options())
        .expect("engine builds");

    let out = engine.recommend(MANUSCRIPT).await.expect("run succeeds");
    assert_eq!(out.mode, RetrievalMode::SemanticOnly);
    // Closest corpus vectors belong to rao.
    assert_eq!(out.results[0].author, "rao");
}

#[tokio::test]
async fn test_semantic_only_embed_failure_is_fatal() {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(FailingProvider);
    let engine = RecommendationEngine::new(store(false, true), Some(provider), options())
        .expect("engine builds");

    let err = engine.recommend(MANUSCRIPT).await.unwrap_err();
    assert!(err.to_string().contains("No retrieval signal"));
}

#[tokio::test]
async fn test_dimension_mismatch_demotes() {
    // Corpus is 3-dimensional, stub emits 5 dimensions.
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubProvider {
        vector: vec![1.0; 5],
    });
    let engine = RecommendationEngine::new(store(true, true), Some(provider), options())
        .expect("engine builds");

    let out = engine.recommend(MANUSCRIPT).await.expect("run survives");
    assert_eq!(out.mode, RetrievalMode::LexicalOnly);
}

#[tokio::test]
async fn test_empty_manuscript_rejected_before_retrieval() {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubProvider {
        vector: vec![1.0, 0.0, 0.0],
    });
    let engine = RecommendationEngine::new(store(true, true), Some(provider), options())
        .expect("engine builds");

    let err = engine.recommend("   \n\t  ").await.unwrap_err();
    assert!(err.to_string().contains("Empty input"));
}

#[tokio::test]
async fn test_stopword_only_manuscript_rejected_on_lexical_only_deployment() {
    // No semantic signal configured; every word is a stopword, so the token
    // form is empty even though the semantic branch text is not. This is an
    // empty-input case, not a missing-signal one.
    let engine = RecommendationEngine::new(store(true, false), None, options())
        .expect("engine builds");

    let manuscript = "About the Results of the Study\n\nAbstract\n\nThe results of this study and the analysis of the data.";
    let err = engine.recommend(manuscript).await.unwrap_err();
    assert!(err.to_string().contains("Empty input"));
}

#[tokio::test]
async fn test_engine_requires_at_least_one_signal() {
    let result = RecommendationEngine::new(store(false, false), None, options());
    assert!(result.is_err());

    // An embedding matrix with no provider is equally unusable.
    let result = RecommendationEngine::new(store(false, true), None, options());
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unprofiled_author_gets_defaults() {
    // Query that only das's document matches.
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(StubProvider {
        vector: vec![0.0, 0.0, 1.0],
    });
    let engine = RecommendationEngine::new(store(true, true), Some(provider), options())
        .expect("engine builds");

    let manuscript = "Protein Folding Study\n\nAbstract\n\nProtein structure analysis of protein folding pathways.";
    let out = engine.recommend(manuscript).await.expect("run succeeds");
    let das = out
        .results
        .iter()
        .find(|r| r.author == "das")
        .expect("das is ranked");
    assert_eq!(das.institution, "Other");
    assert_eq!(das.latest_year, None);
    // Falls back to the signal's matching-document count.
    assert_eq!(das.num_papers, 1);
}
