/// Reranking engine: adjusts fused scores with author-profile-derived
/// multiplicative factors, re-sorts, normalizes to a 0–100 display scale,
/// and assigns tiers.
///
/// Each factor is a step function expressed as an ordered
/// (lower bound, multiplier) table scanned from the highest bound down, so
/// thresholds stay independently testable and tunable.

use serde::Serialize;

use crate::artifacts::AuthorProfiles;
use crate::fusion::FusedCandidate;

/// Institutions receiving the fixed institution boost.
pub const PREMIER_INSTITUTIONS: &[&str] = &["IIT", "IISc", "IIIT", "NIT", "BITS", "VIT"];

/// Experience boost by total paper count.
const EXPERIENCE_STEPS: &[(u32, f64)] = &[(30, 1.07), (20, 1.05), (10, 1.02), (5, 1.01), (0, 1.00)];

/// Recency boost by papers in the last 3 years. The table is deliberately
/// non-monotonic: zero recent papers receives the largest multiplier.
/// Carried over verbatim from the tuned scoring tables; see DESIGN.md
/// before changing.
const RECENCY_STEPS: &[(u32, f64)] = &[(3, 1.015), (1, 1.025), (0, 1.04)];

/// Consistency boost by average similarity across signals.
const CONSISTENCY_STEPS: &[(f64, f64)] = &[(0.7, 1.05), (0.5, 1.025), (0.0, 1.00)];

/// Total-paper count at or below which the low-volume penalty applies.
const LOW_VOLUME_THRESHOLD: u32 = 2;
const LOW_VOLUME_PENALTY: f64 = 0.95;

/// Rank band for the final list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Consider")]
    Consider,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::HighlyRecommended => write!(f, "Highly Recommended"),
            Tier::Recommended => write!(f, "Recommended"),
            Tier::Consider => write!(f, "Consider"),
        }
    }
}

/// The five multiplicative factors applied to one candidate.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BoostBreakdown {
    pub experience: f64,
    pub institution: f64,
    pub recency: f64,
    pub consistency: f64,
    pub penalty: f64,
}

/// Terminal, caller-facing record for one recommended reviewer.
#[derive(Debug, Clone, Serialize)]
pub struct RerankResult {
    /// 1-based rank in the final list.
    pub rank: usize,
    pub tier: Tier,
    pub author: String,
    /// Display score on the 0–100 scale, 2 decimals; the leader is always
    /// 100.00 when its final score is positive.
    pub score: f64,
    pub rrf_score: f64,
    pub final_score: f64,
    pub num_papers: u32,
    pub institution: String,
    pub recent_papers: u32,
    pub latest_year: Option<i32>,
    /// Average similarity across signals as a percentage, 1 decimal.
    pub avg_similarity_pct: f64,
    pub boosts: BoostBreakdown,
}

fn step_lookup_u32(table: &[(u32, f64)], value: u32) -> f64 {
    table
        .iter()
        .find(|(bound, _)| value >= *bound)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

fn step_lookup_f64(table: &[(f64, f64)], value: f64) -> f64 {
    table
        .iter()
        .find(|(bound, _)| value >= *bound)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

pub fn experience_boost(num_papers: u32) -> f64 {
    step_lookup_u32(EXPERIENCE_STEPS, num_papers)
}

pub fn institution_boost(institution: &str) -> f64 {
    if PREMIER_INSTITUTIONS.contains(&institution) {
        1.02
    } else {
        1.00
    }
}

pub fn recency_boost(recent_papers: u32) -> f64 {
    step_lookup_u32(RECENCY_STEPS, recent_papers)
}

pub fn consistency_boost(avg_similarity: f64) -> f64 {
    step_lookup_f64(CONSISTENCY_STEPS, avg_similarity)
}

pub fn low_volume_penalty(num_papers: u32) -> f64 {
    if num_papers <= LOW_VOLUME_THRESHOLD {
        LOW_VOLUME_PENALTY
    } else {
        1.00
    }
}

/// Tier from final rank: 1–3 highly recommended, 4–7 recommended, 8+
/// consider. Total and non-overlapping for any list length.
pub fn assign_tier(rank: usize) -> Tier {
    match rank {
        1..=3 => Tier::HighlyRecommended,
        4..=7 => Tier::Recommended,
        _ => Tier::Consider,
    }
}

/// Mean of the available signal averages; 0.0 when neither is present.
fn average_similarity(candidate: &FusedCandidate) -> f64 {
    match (candidate.lexical.avg_score, candidate.semantic.avg_score) {
        (Some(lex), Some(sem)) => (lex + sem) / 2.0,
        (Some(lex), None) => lex,
        (None, Some(sem)) => sem,
        (None, None) => 0.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Apply the reviewer-suitability factors to the fused candidates and
/// produce the final tiered list.
///
/// Builds fresh result records — the fused input is never mutated.
pub fn rerank(
    candidates: &[FusedCandidate],
    profiles: &AuthorProfiles,
    top_k: usize,
) -> Vec<RerankResult> {
    struct Scored {
        author: String,
        rrf_score: f64,
        final_score: f64,
        num_papers: u32,
        institution: String,
        recent_papers: u32,
        latest_year: Option<i32>,
        avg_similarity: f64,
        boosts: BoostBreakdown,
    }

    let mut scored: Vec<Scored> = candidates
        .iter()
        .map(|candidate| {
            let profile = profiles.resolve(&candidate.author);
            // Profile paper count wins; a zero/absent count falls back to
            // whichever signal counted this author's matching documents.
            let num_papers = if profile.num_papers > 0 {
                profile.num_papers
            } else {
                candidate.num_papers.unwrap_or(0) as u32
            };
            let avg_similarity = average_similarity(candidate);

            let boosts = BoostBreakdown {
                experience: experience_boost(num_papers),
                institution: institution_boost(&profile.primary_institution),
                recency: recency_boost(profile.recent_papers),
                consistency: consistency_boost(avg_similarity),
                penalty: low_volume_penalty(num_papers),
            };
            let final_score = candidate.rrf_score
                * boosts.experience
                * boosts.institution
                * boosts.recency
                * boosts.consistency
                * boosts.penalty;

            Scored {
                author: candidate.author.clone(),
                rrf_score: candidate.rrf_score,
                final_score,
                num_papers,
                institution: profile.primary_institution,
                recent_papers: profile.recent_papers,
                latest_year: profile.latest_year,
                avg_similarity,
                boosts,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.author.cmp(&b.author))
    });
    scored.truncate(top_k);

    let leader = scored.first().map(|s| s.final_score).unwrap_or(0.0);

    scored
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let rank = i + 1;
            let display = if leader > 0.0 {
                round2((s.final_score / leader) * 100.0)
            } else {
                0.0
            };
            RerankResult {
                rank,
                tier: assign_tier(rank),
                author: s.author,
                score: display,
                rrf_score: s.rrf_score,
                final_score: s.final_score,
                num_papers: s.num_papers,
                institution: s.institution,
                recent_papers: s.recent_papers,
                latest_year: s.latest_year,
                avg_similarity_pct: round1(s.avg_similarity * 100.0),
                boosts: s.boosts,
            }
        })
        .collect()
}
