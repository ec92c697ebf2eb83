//! Match Scoring: compares a candidate profile against a requirement profile.
//!
//! Default: `KeywordMatchScorer` (pure-Rust, deterministic, no I/O).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`, so a different backend can be
//! swapped in at startup without touching handlers.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::matching::experience::extract_experience_years;
use crate::matching::skill_extractor::extract_skills;
use crate::matching::vocabulary::{Skill, SkillVocabulary};

/// Skill overlap share of the composite score.
pub const SKILL_WEIGHT: f64 = 0.3;
/// Experience sufficiency share of the composite score.
pub const EXPERIENCE_WEIGHT: f64 = 0.7;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Skills and years extracted from one document.
///
/// `experience_years` must be non-negative. Values from `extract_experience_years`
/// always are; callers constructing profiles by hand are responsible for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedProfile {
    pub skills: BTreeSet<Skill>,
    pub experience_years: f64,
}

impl ExtractedProfile {
    pub fn from_text(text: &str, vocabulary: &SkillVocabulary) -> Self {
        Self {
            skills: extract_skills(text, vocabulary),
            experience_years: extract_experience_years(text),
        }
    }
}

/// Full match report returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub score: f64,                    // 0 – 100, 2 dp
    pub skill_score: f64,              // 0 – 100, 2 dp
    pub matched_skills: BTreeSet<Skill>,
    pub missing_skills: BTreeSet<Skill>, // required but absent from candidate
    pub candidate_experience: f64,
    pub required_experience: f64,
    pub experience_match_percent: f64, // 0 – 100, 2 dp
    pub recommendation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handler code.
pub trait MatchScorer: Send + Sync {
    fn score(&self, candidate: &ExtractedProfile, requirement: &ExtractedProfile) -> MatchResult;

    /// Short label for the backend, surfaced in logs.
    fn backend(&self) -> &'static str;
}

/// Lexical scorer: set overlap on skills, ratio on years.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatchScorer;

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, candidate: &ExtractedProfile, requirement: &ExtractedProfile) -> MatchResult {
        score_profiles(candidate, requirement)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Extracts both documents and scores the resume against the job description.
pub fn match_texts(
    candidate_text: &str,
    requirement_text: &str,
    vocabulary: &SkillVocabulary,
) -> MatchResult {
    let candidate = ExtractedProfile::from_text(candidate_text, vocabulary);
    let requirement = ExtractedProfile::from_text(requirement_text, vocabulary);
    score_profiles(&candidate, &requirement)
}

/// Scores `candidate` against `requirement`. Total: never panics, never divides by zero.
///
/// - skill score: share of required skills the candidate has (100 when none required)
/// - experience: candidate/required years, capped at 100 (100 when none required)
/// - score: 0.3 × skill + 0.7 × experience, rounded to 2 dp
pub fn score_profiles(candidate: &ExtractedProfile, requirement: &ExtractedProfile) -> MatchResult {
    let matched_skills: BTreeSet<Skill> = requirement
        .skills
        .intersection(&candidate.skills)
        .cloned()
        .collect();
    let missing_skills: BTreeSet<Skill> = requirement
        .skills
        .difference(&candidate.skills)
        .cloned()
        .collect();

    let skill_score = if requirement.skills.is_empty() {
        100.0
    } else {
        100.0 * matched_skills.len() as f64 / requirement.skills.len() as f64
    };

    let experience_match_percent =
        experience_match(candidate.experience_years, requirement.experience_years);

    let score = round2(SKILL_WEIGHT * skill_score + EXPERIENCE_WEIGHT * experience_match_percent)
        .clamp(0.0, 100.0);

    let recommendation = build_recommendation(score, &missing_skills);

    MatchResult {
        score,
        skill_score: round2(skill_score),
        matched_skills,
        missing_skills,
        candidate_experience: candidate.experience_years,
        required_experience: requirement.experience_years,
        experience_match_percent: round2(experience_match_percent),
        recommendation,
    }
}

fn experience_match(candidate_years: f64, required_years: f64) -> f64 {
    if required_years <= 0.0 || candidate_years >= required_years {
        100.0
    } else {
        (100.0 * candidate_years / required_years).clamp(0.0, 100.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds a human-readable recommendation string from score and missing skills.
/// The band comes from the score alone; missing skills only change the wording.
fn build_recommendation(score: f64, missing: &BTreeSet<Skill>) -> String {
    if score >= 80.0 {
        return "Strong fit. The resume covers the key requirements.".to_string();
    }

    let band = if score >= 60.0 { "Moderate fit" } else { "Low fit" };
    let top_missing: Vec<&str> = missing.iter().take(3).map(Skill::as_str).collect();

    if top_missing.is_empty() {
        format!("{band} ({score:.2}/100). Skills are covered; experience falls short.")
    } else if score >= 60.0 {
        format!(
            "{band} ({score:.2}/100). Consider highlighting: {}.",
            top_missing.join(", ")
        )
    } else {
        format!(
            "{band} ({score:.2}/100). Significant gaps: {}.",
            top_missing.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
