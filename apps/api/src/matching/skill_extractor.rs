//! Skill extraction: finds which vocabulary skills appear in free text.

use std::collections::BTreeSet;

use tracing::debug;

use crate::matching::vocabulary::{Skill, SkillVocabulary};

/// Returns every vocabulary skill that occurs in `text` as a whole phrase.
///
/// Matching is case-insensitive. A skill only counts when it is not glued to
/// neighbouring word characters (`_`, alphanumerics, `+`, `#`), so `c` does not
/// fire inside `crystal` or `c++`. Each skill is checked independently: the
/// presence of one entry never suppresses another.
pub fn extract_skills(text: &str, vocabulary: &SkillVocabulary) -> BTreeSet<Skill> {
    if text.trim().is_empty() {
        return BTreeSet::new();
    }

    let found: BTreeSet<Skill> = vocabulary
        .entries()
        .iter()
        .filter(|entry| entry.matcher.is_match(text))
        .map(|entry| entry.skill.clone())
        .collect();

    debug!(
        "Extracted {} of {} vocabulary skills from text ({} chars)",
        found.len(),
        vocabulary.len(),
        text.len()
    );

    found
}
