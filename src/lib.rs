/// peermatch — hybrid retrieval engine for peer-reviewer recommendation
///
/// Scores a corpus of previously-authored papers against a manuscript with
/// two independent signals (BM25 lexical, embedding-based semantic), fuses
/// the author-level rankings via Reciprocal Rank Fusion, then applies
/// reviewer-suitability boosts to produce a tiered shortlist.

pub mod artifacts;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod errors;
pub mod fusion;
pub mod logging;
pub mod normalize;
pub mod rerank;
pub mod retrieval;
