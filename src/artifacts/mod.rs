/// Read-only retrieval artifacts
///
/// The lexical index, document embedding matrix, and author-profile table
/// are built offline and loaded once at process start. After loading they
/// are immutable for the process lifetime — safe for unlimited concurrent
/// read access across requests. The loaders here are explicit repository
/// constructors; nothing in the query pipeline holds ambient global state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::PeermatchError;

/// On-disk form of the lexical index: per-document term-frequency maps
/// with a parallel document→author map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalArtifact {
    /// Owning author per document, parallel to `doc_terms`.
    pub doc_authors: Vec<String>,
    /// term → occurrence count per document.
    pub doc_terms: Vec<HashMap<String, u32>>,
}

/// Validated lexical index with the derived statistics BM25 needs.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    pub doc_authors: Vec<String>,
    pub doc_terms: Vec<HashMap<String, u32>>,
    /// Token count per document (sum of term frequencies).
    pub doc_lengths: Vec<f64>,
    pub avg_doc_len: f64,
    /// term → number of documents containing it.
    pub doc_frequency: HashMap<String, u32>,
}

impl LexicalIndex {
    /// Validate an on-disk artifact and derive document lengths, the
    /// average length, and document frequencies.
    pub fn from_artifact(artifact: LexicalArtifact) -> Result<Self, PeermatchError> {
        if artifact.doc_authors.len() != artifact.doc_terms.len() {
            return Err(PeermatchError::artifact(
                "lexical_index",
                format!(
                    "doc_authors ({}) and doc_terms ({}) lengths differ",
                    artifact.doc_authors.len(),
                    artifact.doc_terms.len()
                ),
            ));
        }
        if artifact.doc_terms.is_empty() {
            return Err(PeermatchError::artifact("lexical_index", "index contains no documents"));
        }

        let doc_lengths: Vec<f64> = artifact
            .doc_terms
            .iter()
            .map(|terms| terms.values().map(|&tf| tf as f64).sum())
            .collect();
        let avg_doc_len =
            (doc_lengths.iter().sum::<f64>() / doc_lengths.len() as f64).max(1.0);

        let mut doc_frequency: HashMap<String, u32> = HashMap::new();
        for terms in &artifact.doc_terms {
            for term in terms.keys() {
                *doc_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        Ok(LexicalIndex {
            doc_authors: artifact.doc_authors,
            doc_terms: artifact.doc_terms,
            doc_lengths,
            avg_doc_len,
            doc_frequency,
        })
    }

    pub fn num_docs(&self) -> usize {
        self.doc_terms.len()
    }
}

/// On-disk form of the embedding matrix: parallel document identifiers,
/// authors, and vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticArtifact {
    pub doc_ids: Vec<String>,
    pub doc_authors: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
}

/// Validated embedding matrix: all vectors share one dimension.
#[derive(Debug, Clone)]
pub struct SemanticIndex {
    pub doc_ids: Vec<String>,
    pub doc_authors: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
    pub dimension: usize,
}

impl SemanticIndex {
    pub fn from_artifact(artifact: SemanticArtifact) -> Result<Self, PeermatchError> {
        if artifact.doc_authors.len() != artifact.embeddings.len()
            || artifact.doc_ids.len() != artifact.embeddings.len()
        {
            return Err(PeermatchError::artifact(
                "embeddings",
                "doc_ids, doc_authors, and embeddings must be parallel arrays",
            ));
        }
        let dimension = match artifact.embeddings.first() {
            Some(v) if !v.is_empty() => v.len(),
            _ => {
                return Err(PeermatchError::artifact(
                    "embeddings",
                    "embedding matrix is empty",
                ))
            }
        };
        if let Some(bad) = artifact.embeddings.iter().position(|v| v.len() != dimension) {
            return Err(PeermatchError::artifact(
                "embeddings",
                format!(
                    "embedding {} has dimension {} (expected {})",
                    bad,
                    artifact.embeddings[bad].len(),
                    dimension
                ),
            ));
        }

        Ok(SemanticIndex {
            doc_ids: artifact.doc_ids,
            doc_authors: artifact.doc_authors,
            embeddings: artifact.embeddings,
            dimension,
        })
    }

    pub fn num_docs(&self) -> usize {
        self.embeddings.len()
    }
}

/// Per-author metadata used only by the reranking stage.
///
/// Absent or partial entries are never an error — fields default to
/// "Other"/zero/absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorProfile {
    #[serde(default = "default_institution")]
    pub primary_institution: String,
    #[serde(default)]
    pub num_papers: u32,
    /// Papers published in the last 3 years.
    #[serde(default)]
    pub recent_papers: u32,
    #[serde(default)]
    pub latest_year: Option<i32>,
}

fn default_institution() -> String {
    "Other".to_string()
}

impl Default for AuthorProfile {
    fn default() -> Self {
        AuthorProfile {
            primary_institution: default_institution(),
            num_papers: 0,
            recent_papers: 0,
            latest_year: None,
        }
    }
}

/// Author → profile lookup table. Missing entries resolve to defaults.
#[derive(Debug, Clone, Default)]
pub struct AuthorProfiles {
    profiles: HashMap<String, AuthorProfile>,
}

impl AuthorProfiles {
    pub fn new(profiles: HashMap<String, AuthorProfile>) -> Self {
        AuthorProfiles { profiles }
    }

    /// Resolve a profile, substituting defaults for absent entries.
    pub fn resolve(&self, author: &str) -> AuthorProfile {
        self.profiles.get(author).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Everything the engine needs, loaded once at startup.
///
/// A missing lexical or semantic artifact degrades the engine to
/// single-signal mode; a missing profile table only disables profile-driven
/// boosts (defaults substitute). Both retrieval artifacts missing is fatal
/// at engine construction, not here.
pub struct ArtifactStore {
    pub lexical: Option<LexicalIndex>,
    pub semantic: Option<SemanticIndex>,
    pub profiles: AuthorProfiles,
}

impl ArtifactStore {
    /// Load artifacts from `dir`. Expected files:
    /// `lexical_index.json`, `embeddings.json`, `author_profiles.json`.
    pub fn load(dir: &Path) -> Result<Self, PeermatchError> {
        let lexical = match read_json::<LexicalArtifact>(&dir.join("lexical_index.json")) {
            Ok(Some(artifact)) => Some(LexicalIndex::from_artifact(artifact)?),
            Ok(None) => {
                tracing::warn!("lexical_index.json not found — lexical signal disabled");
                None
            }
            Err(e) => return Err(PeermatchError::artifact("lexical_index", e)),
        };

        let semantic = match read_json::<SemanticArtifact>(&dir.join("embeddings.json")) {
            Ok(Some(artifact)) => Some(SemanticIndex::from_artifact(artifact)?),
            Ok(None) => {
                tracing::warn!("embeddings.json not found — semantic signal disabled");
                None
            }
            Err(e) => return Err(PeermatchError::artifact("embeddings", e)),
        };

        let profiles = match read_json::<HashMap<String, AuthorProfile>>(
            &dir.join("author_profiles.json"),
        ) {
            Ok(Some(map)) => AuthorProfiles::new(map),
            Ok(None) => {
                tracing::warn!("author_profiles.json not found — rerank boosts use defaults");
                AuthorProfiles::default()
            }
            Err(e) => return Err(PeermatchError::artifact("author_profiles", e)),
        };

        if let Some(ref index) = lexical {
            tracing::info!(docs = index.num_docs(), "Lexical index loaded");
        }
        if let Some(ref index) = semantic {
            tracing::info!(
                docs = index.num_docs(),
                dimension = index.dimension,
                "Embedding matrix loaded"
            );
        }
        tracing::info!(authors = profiles.len(), "Author profiles loaded");

        Ok(ArtifactStore {
            lexical,
            semantic,
            profiles,
        })
    }
}

/// Read and parse a JSON artifact. Ok(None) when the file does not exist;
/// a present-but-unparseable file is an error, never silently skipped.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    #[test]
    fn test_lexical_index_derives_stats() {
        let index = LexicalIndex::from_artifact(LexicalArtifact {
            doc_authors: vec!["a".into(), "b".into()],
            doc_terms: vec![terms(&[("graph", 2), ("neural", 1)]), terms(&[("graph", 1)])],
        })
        .unwrap();

        assert_eq!(index.doc_lengths, vec![3.0, 1.0]);
        assert_eq!(index.avg_doc_len, 2.0);
        assert_eq!(index.doc_frequency.get("graph"), Some(&2));
        assert_eq!(index.doc_frequency.get("neural"), Some(&1));
    }

    #[test]
    fn test_lexical_index_rejects_mismatched_arrays() {
        let result = LexicalIndex::from_artifact(LexicalArtifact {
            doc_authors: vec!["a".into()],
            doc_terms: vec![],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_semantic_index_rejects_ragged_matrix() {
        let result = SemanticIndex::from_artifact(SemanticArtifact {
            doc_ids: vec!["p1".into(), "p2".into()],
            doc_authors: vec!["a".into(), "b".into()],
            embeddings: vec![vec![1.0, 0.0], vec![1.0]],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_defaults() {
        let profiles = AuthorProfiles::default();
        let p = profiles.resolve("nobody");
        assert_eq!(p.primary_institution, "Other");
        assert_eq!(p.num_papers, 0);
        assert_eq!(p.recent_papers, 0);
        assert_eq!(p.latest_year, None);
    }

    #[test]
    fn test_partial_profile_entry_fills_defaults() {
        let map: HashMap<String, AuthorProfile> =
            serde_json::from_str(r#"{"kumar": {"num_papers": 12}}"#).unwrap();
        let profiles = AuthorProfiles::new(map);
        let p = profiles.resolve("kumar");
        assert_eq!(p.num_papers, 12);
        assert_eq!(p.primary_institution, "Other");
        assert_eq!(p.latest_year, None);
    }

    #[test]
    fn test_artifact_store_missing_files_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::load(dir.path()).unwrap();
        assert!(store.lexical.is_none());
        assert!(store.semantic.is_none());
        assert!(store.profiles.is_empty());
    }

    #[test]
    fn test_artifact_store_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lexical_index.json"), "not json").unwrap();
        assert!(ArtifactStore::load(dir.path()).is_err());
    }
}
