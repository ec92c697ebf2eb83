//! Role gap analysis: which of a role's required skills a candidate already has.
//!
//! Same set semantics as the scorer, no composite score.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::matching::vocabulary::{RoleVocabulary, Skill};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleGap {
    pub matched: BTreeSet<Skill>,
    pub missing: BTreeSet<Skill>,
}

/// Compares candidate skills with the role's required skills.
/// Unknown roles require nothing, so both sets come back empty.
pub fn analyze_role_gap(
    candidate_skills: &BTreeSet<Skill>,
    role: &str,
    roles: &RoleVocabulary,
) -> RoleGap {
    let required = roles.required_skills(role);
    if required.is_empty() {
        debug!("No required skills for role '{role}'");
    }

    let (matched, missing): (Vec<&Skill>, Vec<&Skill>) = required
        .iter()
        .partition(|skill| candidate_skills.contains(*skill));

    RoleGap {
        matched: matched.into_iter().cloned().collect(),
        missing: missing.into_iter().cloned().collect(),
    }
}
