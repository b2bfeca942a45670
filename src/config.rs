/// Configuration management using figment
///
/// Loads configuration with this precedence (highest wins):
/// 1. Defaults (hardcoded)
/// 2. TOML file: peermatch.toml (in working directory)
/// 3. Environment variables: prefixed PEERMATCH_ with `__` as the nesting
///    separator (e.g., PEERMATCH_EMBEDDING__PROVIDER=openai)

use figment::{
    Figment,
    providers::{Env, Format, Toml, Serialized},
};
use serde::{Deserialize, Serialize};
use crate::errors::PeermatchError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory holding the read-only retrieval artifacts
    /// (lexical_index.json, embeddings.json, author_profiles.json).
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Knobs for the retrieval/fusion/rerank pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Authors kept per signal before fusion (each retriever's top-N).
    #[serde(default = "default_signal_top_n")]
    pub signal_top_n: usize,

    /// Authors in the final recommendation list.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// RRF smoothing constant.
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "local" (fastembed, no API key) or "openai"
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Cache directory for local model weights
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// OpenAI API key (required only when provider = "openai")
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Budget for a single embedding call before the run demotes to
    /// lexical-only ranking.
    #[serde(default = "default_embed_timeout_ms")]
    pub timeout_ms: u64,

    /// Whitespace-token budget for the semantic query branch.
    #[serde(default = "default_max_query_tokens")]
    pub max_query_tokens: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_artifacts_dir() -> String {
    "artifacts".to_string()
}

fn default_signal_top_n() -> usize {
    20
}

fn default_top_k() -> usize {
    10
}

fn default_rrf_k() -> f64 {
    60.0
}

fn default_embedding_provider() -> String {
    "local".to_string()
}

fn default_cache_dir() -> String {
    ".fastembed_cache".to_string()
}

fn default_embed_timeout_ms() -> u64 {
    30_000
}

fn default_max_query_tokens() -> usize {
    512
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        RetrievalConfig {
            signal_top_n: default_signal_top_n(),
            top_k: default_top_k(),
            rrf_k: default_rrf_k(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig {
            provider: default_embedding_provider(),
            cache_dir: default_cache_dir(),
            openai_api_key: None,
            timeout_ms: default_embed_timeout_ms(),
            max_query_tokens: default_max_query_tokens(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            artifacts_dir: default_artifacts_dir(),
            retrieval: RetrievalConfig::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, TOML file, and environment variables
    ///
    /// Environment variables override TOML file values.
    /// Example: PEERMATCH_RETRIEVAL__TOP_K=5 overrides retrieval.top_k.
    pub fn load() -> Result<Config, PeermatchError> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("peermatch.toml"))
            .merge(Env::prefixed("PEERMATCH_").split("__"))
            .extract()
            .map_err(|e| PeermatchError::Config(format!("Failed to load config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.artifacts_dir, "artifacts");
        assert_eq!(config.retrieval.signal_top_n, 20);
        assert_eq!(config.retrieval.top_k, 10);
        assert_eq!(config.retrieval.rrf_k, 60.0);
        assert_eq!(config.embedding.provider, "local");
        assert_eq!(config.embedding.max_query_tokens, 512);
    }
}
