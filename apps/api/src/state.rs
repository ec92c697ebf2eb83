use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::matching::scorer::{KeywordMatchScorer, MatchScorer};
use crate::matching::vocabulary::{RoleVocabulary, SkillVocabulary};

/// Shared application state injected into all route handlers via Axum extractors.
/// Vocabularies are built once here and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub vocabulary: Arc<SkillVocabulary>,
    pub roles: Arc<RoleVocabulary>,
    /// Pluggable match scorer. Default: KeywordMatchScorer.
    pub scorer: Arc<dyn MatchScorer>,
}

impl AppState {
    /// Loads vocabularies from the configured files, falling back to the embedded ones.
    pub fn from_config(config: Config) -> Result<Self> {
        let vocabulary = match &config.skills_path {
            Some(path) => SkillVocabulary::from_path(path)?,
            None => SkillVocabulary::embedded().context("embedded skill catalog is invalid")?,
        };
        let roles = match &config.roles_path {
            Some(path) => RoleVocabulary::from_path(path)?,
            None => RoleVocabulary::embedded().context("embedded role table is invalid")?,
        };

        info!(
            "Vocabulary ready: {} skills, {} roles",
            vocabulary.len(),
            roles.len()
        );

        Ok(Self::new(config, vocabulary, roles))
    }

    pub fn new(config: Config, vocabulary: SkillVocabulary, roles: RoleVocabulary) -> Self {
        Self {
            config,
            vocabulary: Arc::new(vocabulary),
            roles: Arc::new(roles),
            scorer: Arc::new(KeywordMatchScorer),
        }
    }
}
