/// Domain-specific error types for peermatch
///
/// Every failure is local to a single request: artifacts are read-only and
/// per-request structures are discarded on any exit path.

#[derive(Debug, thiserror::Error)]
pub enum PeermatchError {
    /// The normalized query text (or its token form) came out empty.
    /// Raised before any retriever runs — no partial rankings are produced.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A retrieval artifact failed to load or validate.
    #[error("Artifact error ({name}): {message}")]
    Artifact { name: String, message: String },

    /// Both retrieval signals are unavailable — nothing to rank with.
    #[error("No retrieval signal available: {0}")]
    DataUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::embedding::EmbeddingError> for PeermatchError {
    fn from(e: crate::embedding::EmbeddingError) -> Self {
        PeermatchError::Internal(e.to_string())
    }
}

impl PeermatchError {
    /// Helper to create artifact errors with the artifact name attached.
    pub fn artifact(name: &str, message: impl std::fmt::Display) -> Self {
        PeermatchError::Artifact {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}
