//! Batch matching: scores many (resume, job description) pairs in parallel.

use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::matching::scorer::{ExtractedProfile, MatchResult, MatchScorer};
use crate::matching::vocabulary::SkillVocabulary;

#[derive(Debug, Clone, Deserialize)]
pub struct MatchPair {
    pub resume_text: String,
    pub jd_text: String,
}

/// Scores every pair independently. Output order follows input order.
pub fn match_batch(
    pairs: &[MatchPair],
    vocabulary: &SkillVocabulary,
    scorer: &dyn MatchScorer,
) -> Vec<MatchResult> {
    debug!(
        "Scoring batch of {} pairs with '{}' backend",
        pairs.len(),
        scorer.backend()
    );

    pairs
        .par_iter()
        .map(|pair| {
            let candidate = ExtractedProfile::from_text(&pair.resume_text, vocabulary);
            let requirement = ExtractedProfile::from_text(&pair.jd_text, vocabulary);
            scorer.score(&candidate, &requirement)
        })
        .collect()
}
