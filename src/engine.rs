/// Request orchestration: one manuscript in, one tiered reviewer list out.
///
/// The engine owns no mutable state. Artifacts are loaded once and shared
/// behind Arcs, the normalizer is immutable after construction, and every
/// request builds its own scoring structures, so any number of
/// `recommend` calls may run concurrently.
///
/// Signal degradation: with only one retrieval artifact (or when the
/// embedding call fails or times out while the lexical index is present)
/// the run completes on the surviving signal and the result is annotated
/// with the mode actually used. Only the loss of both signals is an error.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::artifacts::{ArtifactStore, AuthorProfiles, LexicalIndex, SemanticIndex};
use crate::config::Config;
use crate::embedding::EmbeddingProvider;
use crate::errors::PeermatchError;
use crate::fusion::rrf_fuse;
use crate::normalize::TextNormalizer;
use crate::rerank::{rerank, RerankResult};
use crate::retrieval::{lexical, semantic, RankedEntry};

/// Which retrieval signals actually contributed to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RetrievalMode {
    #[serde(rename = "hybrid")]
    Hybrid,
    #[serde(rename = "lexical_only")]
    LexicalOnly,
    #[serde(rename = "semantic_only")]
    SemanticOnly,
}

impl std::fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalMode::Hybrid => write!(f, "hybrid"),
            RetrievalMode::LexicalOnly => write!(f, "lexical_only"),
            RetrievalMode::SemanticOnly => write!(f, "semantic_only"),
        }
    }
}

/// Final output of one recommendation run.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub mode: RetrievalMode,
    pub results: Vec<RerankResult>,
}

/// Tuning knobs for a single engine instance.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Authors kept per signal before fusion.
    pub signal_top_n: usize,
    /// Authors in the final list.
    pub top_k: usize,
    /// RRF smoothing constant.
    pub rrf_k: f64,
    /// Budget for the embedding call before demoting to lexical-only.
    pub embed_timeout: Duration,
    /// Whitespace-token budget for the semantic query branch.
    pub max_query_tokens: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            signal_top_n: 20,
            top_k: 10,
            rrf_k: crate::fusion::DEFAULT_RRF_K,
            embed_timeout: Duration::from_secs(30),
            max_query_tokens: 512,
        }
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        EngineOptions {
            signal_top_n: config.retrieval.signal_top_n,
            top_k: config.retrieval.top_k,
            rrf_k: config.retrieval.rrf_k,
            embed_timeout: Duration::from_millis(config.embedding.timeout_ms),
            max_query_tokens: config.embedding.max_query_tokens,
        }
    }
}

pub struct RecommendationEngine {
    normalizer: TextNormalizer,
    lexical: Option<Arc<LexicalIndex>>,
    semantic: Option<Arc<SemanticIndex>>,
    profiles: Arc<AuthorProfiles>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    options: EngineOptions,
}

impl RecommendationEngine {
    /// Build an engine over loaded artifacts. Fails fast when neither
    /// retrieval signal can ever produce a ranking.
    pub fn new(
        store: ArtifactStore,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        options: EngineOptions,
    ) -> Result<Self, PeermatchError> {
        let lexical = store.lexical.map(Arc::new);
        let semantic = store.semantic.map(Arc::new);

        let semantic_usable = semantic.is_some() && embedder.is_some();
        if lexical.is_none() && !semantic_usable {
            return Err(PeermatchError::DataUnavailable(
                "no lexical index and no usable embedding setup".to_string(),
            ));
        }
        if semantic.is_some() && embedder.is_none() {
            tracing::warn!("embedding matrix present but no provider configured — semantic signal disabled");
        }

        Ok(RecommendationEngine {
            normalizer: TextNormalizer::new(options.max_query_tokens),
            lexical,
            semantic,
            profiles: Arc::new(store.profiles),
            embedder,
            options,
        })
    }

    /// Run the full pipeline for one manuscript.
    pub async fn recommend(&self, manuscript: &str) -> Result<Recommendations, PeermatchError> {
        let query = self.normalizer.prepare(manuscript);
        // A branch only counts toward non-emptiness if a signal can consume
        // it: with no usable semantic setup, an empty token form alone means
        // there is nothing to rank with.
        let semantic_usable = self.semantic.is_some() && self.embedder.is_some();
        if query.lexical_tokens.is_empty()
            && (!semantic_usable || query.semantic_text.trim().is_empty())
        {
            return Err(PeermatchError::EmptyInput(
                "manuscript text yielded no query content after normalization".to_string(),
            ));
        }
        tracing::debug!(
            lexical_tokens = query.lexical_tokens.len(),
            semantic_chars = query.semantic_text.len(),
            "Query normalized"
        );

        // BM25 is CPU-bound over the whole corpus; keep it off the async
        // runtime threads. The semantic leg awaits the embedding call
        // concurrently.
        let lexical_task = match (&self.lexical, query.lexical_tokens.is_empty()) {
            (Some(index), false) => {
                let index = Arc::clone(index);
                let tokens = query.lexical_tokens.clone();
                let top_n = self.options.signal_top_n;
                Some(tokio::task::spawn_blocking(move || {
                    lexical::rank_authors(&index, &tokens, top_n)
                }))
            }
            _ => None,
        };

        let semantic_ranked = self.semantic_leg(&query.semantic_text).await?;

        let lexical_ranked = match lexical_task {
            Some(handle) => Some(handle.await.map_err(|e| {
                PeermatchError::Internal(format!("lexical scoring task failed: {}", e))
            })?),
            None => None,
        };

        let mode = match (&lexical_ranked, &semantic_ranked) {
            (Some(_), Some(_)) => RetrievalMode::Hybrid,
            (Some(_), None) => RetrievalMode::LexicalOnly,
            (None, Some(_)) => RetrievalMode::SemanticOnly,
            (None, None) => {
                return Err(PeermatchError::DataUnavailable(
                    "neither retrieval signal produced a ranking".to_string(),
                ))
            }
        };
        if mode != RetrievalMode::Hybrid {
            tracing::warn!(%mode, "Running with a single retrieval signal");
        }

        let fused = rrf_fuse(
            lexical_ranked.as_deref(),
            semantic_ranked.as_deref(),
            self.options.rrf_k,
            self.options.signal_top_n,
        );
        let results = rerank(&fused, &self.profiles, self.options.top_k);
        tracing::info!(%mode, candidates = fused.len(), results = results.len(), "Recommendation run complete");

        Ok(Recommendations { mode, results })
    }

    /// Embed the query and rank the semantic signal. Returns Ok(None) when
    /// the signal is unavailable or fails while the lexical signal can
    /// still carry the run; propagates the failure otherwise.
    async fn semantic_leg(&self, text: &str) -> Result<Option<Vec<RankedEntry>>, PeermatchError> {
        let (index, embedder) = match (&self.semantic, &self.embedder) {
            (Some(index), Some(embedder)) => (index, embedder),
            _ => return Ok(None),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        let vector = match tokio::time::timeout(self.options.embed_timeout, embedder.embed(text)).await {
            Ok(Ok(vector)) => vector,
            Ok(Err(e)) => return self.demote_semantic(format!("embedding failed: {}", e)),
            Err(_) => {
                return self.demote_semantic(format!(
                    "embedding timed out after {:?}",
                    self.options.embed_timeout
                ))
            }
        };

        if vector.len() != index.dimension {
            return self.demote_semantic(format!(
                "query embedding dimension {} does not match corpus dimension {}",
                vector.len(),
                index.dimension
            ));
        }

        let index = Arc::clone(index);
        let top_n = self.options.signal_top_n;
        let ranked = tokio::task::spawn_blocking(move || {
            semantic::rank_authors(&index, &vector, top_n)
        })
        .await
        .map_err(|e| PeermatchError::Internal(format!("semantic scoring task failed: {}", e)))?;

        Ok(Some(ranked))
    }

    fn demote_semantic(&self, reason: String) -> Result<Option<Vec<RankedEntry>>, PeermatchError> {
        if self.lexical.is_some() {
            tracing::warn!(%reason, "Semantic signal dropped for this run");
            Ok(None)
        } else {
            Err(PeermatchError::DataUnavailable(format!(
                "semantic signal failed with no lexical fallback: {}",
                reason
            )))
        }
    }
}
