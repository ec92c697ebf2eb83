pub mod config;
pub mod documents;
pub mod errors;
pub mod matching;
pub mod routes;
pub mod state;

pub use matching::experience::extract_experience_years;
pub use matching::role_gap::{analyze_role_gap, RoleGap};
pub use matching::scorer::{
    match_texts, score_profiles, ExtractedProfile, KeywordMatchScorer, MatchResult, MatchScorer,
};
pub use matching::skill_extractor::extract_skills;
pub use matching::vocabulary::{RoleVocabulary, Skill, SkillVocabulary};
