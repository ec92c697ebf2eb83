//! Skill vocabularies: the catalog of canonical skill phrases the extractors recognise.
//!
//! Two shapes are supported:
//! - `SkillVocabulary`: a flat, ordered list of distinct skills.
//! - `RoleVocabulary`: role name → ordered required-skill list.
//!
//! Both are built once at startup and shared read-only (`Arc`) across requests.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::VocabularyError;

const EMBEDDED_SKILLS: &str = include_str!("../../data/skills.json");
const EMBEDDED_ROLES: &str = include_str!("../../data/job_roles.json");

/// Characters that, besides `\w`, glue onto a skill token.
/// `c` must not fire inside `c++` or `c#`.
const BOUNDARY_CLASS: &str = r"[^\w+#]";

// ────────────────────────────────────────────────────────────────────────────
// Skill
// ────────────────────────────────────────────────────────────────────────────

/// A canonical, lowercase skill phrase with single-space word separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Skill(String);

impl Skill {
    /// Normalises a raw phrase. Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize_phrase(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Skill(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Skill {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trim, collapse internal whitespace, lowercase.
pub(crate) fn normalize_phrase(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Builds a case-insensitive matcher that only fires on whole-phrase occurrences.
/// Words of a multi-word skill may be separated by any run of whitespace.
fn build_matcher(skill: &Skill) -> Result<Regex, VocabularyError> {
    let body = skill
        .as_str()
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let pattern = format!(r"(?i)(?:^|{BOUNDARY_CLASS}){body}(?:$|{BOUNDARY_CLASS})");

    Regex::new(&pattern).map_err(|source| VocabularyError::InvalidPattern {
        skill: skill.to_string(),
        source,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// SkillVocabulary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct VocabularyEntry {
    pub skill: Skill,
    pub matcher: Regex,
}

/// An ordered catalog of distinct skills, each with a pre-compiled matcher.
#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    entries: Vec<VocabularyEntry>,
}

impl SkillVocabulary {
    /// Builds a vocabulary from raw phrases.
    ///
    /// Blank phrases are skipped and duplicates (after normalisation) keep their
    /// first position. Fails only if a matcher cannot be compiled.
    pub fn new<I, S>(phrases: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for phrase in phrases {
            let Some(skill) = Skill::new(phrase.as_ref()) else {
                warn!("Skipping blank vocabulary phrase");
                continue;
            };
            if !seen.insert(skill.clone()) {
                warn!("Dropping duplicate vocabulary phrase '{skill}'");
                continue;
            }
            let matcher = build_matcher(&skill)?;
            entries.push(VocabularyEntry { skill, matcher });
        }

        Ok(Self { entries })
    }

    /// Parses a JSON array of skill phrases.
    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let phrases: Vec<String> = serde_json::from_str(json)?;
        Self::new(phrases)
    }

    pub fn from_path(path: &Path) -> Result<Self, VocabularyError> {
        let json = read_file(path)?;
        let vocabulary = Self::from_json_str(&json)?;
        info!(
            "Loaded skill vocabulary from {} ({} skills)",
            path.display(),
            vocabulary.len()
        );
        Ok(vocabulary)
    }

    /// The built-in catalog shipped with the crate.
    pub fn embedded() -> Result<Self, VocabularyError> {
        Self::from_json_str(EMBEDDED_SKILLS)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        let normalized = normalize_phrase(phrase);
        self.entries.iter().any(|e| e.skill.as_str() == normalized)
    }

    /// Skills in vocabulary order.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.entries.iter().map(|e| &e.skill)
    }

    pub(crate) fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RoleVocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Role name → required skills, plus the union of all role skills for text extraction.
#[derive(Debug, Clone, Default)]
pub struct RoleVocabulary {
    roles: BTreeMap<String, Vec<Skill>>,
    union: SkillVocabulary,
}

impl RoleVocabulary {
    pub fn new<I, R, S>(roles: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = (R, Vec<S>)>,
        R: AsRef<str>,
        S: AsRef<str>,
    {
        let mut table: BTreeMap<String, Vec<Skill>> = BTreeMap::new();

        for (name, phrases) in roles {
            let name = normalize_phrase(name.as_ref());
            if name.is_empty() {
                warn!("Skipping role with blank name");
                continue;
            }
            let required = table.entry(name).or_default();
            for phrase in phrases {
                if let Some(skill) = Skill::new(phrase.as_ref()) {
                    if !required.contains(&skill) {
                        required.push(skill);
                    }
                }
            }
        }

        let distinct: BTreeSet<&str> = table.values().flatten().map(Skill::as_str).collect();
        let union = SkillVocabulary::new(distinct)?;

        Ok(Self {
            roles: table,
            union,
        })
    }

    /// Parses a JSON object of `{"role name": ["skill", ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let roles: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::new(roles)
    }

    pub fn from_path(path: &Path) -> Result<Self, VocabularyError> {
        let json = read_file(path)?;
        let vocabulary = Self::from_json_str(&json)?;
        info!(
            "Loaded role vocabulary from {} ({} roles)",
            path.display(),
            vocabulary.len()
        );
        Ok(vocabulary)
    }

    pub fn embedded() -> Result<Self, VocabularyError> {
        Self::from_json_str(EMBEDDED_ROLES)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Required skills for a role; empty for unknown roles.
    /// Lookup is case-insensitive and ignores surrounding/extra whitespace.
    pub fn required_skills(&self, role: &str) -> &[Skill] {
        self.roles
            .get(&normalize_phrase(role))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_role(&self, role: &str) -> bool {
        self.roles.contains_key(&normalize_phrase(role))
    }

    /// Role names, sorted.
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Every skill required by any role, usable as an extraction vocabulary.
    pub fn all_skills(&self) -> &SkillVocabulary {
        &self.union
    }
}

fn read_file(path: &Path) -> Result<String, VocabularyError> {
    std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
        path: path.to_path_buf(),
        source,
    })
}
