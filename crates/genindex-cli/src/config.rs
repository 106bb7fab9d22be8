//! # Repository Configuration
//!
//! Optional `genindex.yaml` at the repository root (or the file given with
//! `--config`). Every key is optional; command-line flags take precedence.
//!
//! ```yaml
//! schema: schemas/generator-index.schema.json
//! entity_index: entity-index.json
//! migration_index: migration-index.json
//! check_paths: false
//! extra_databases: [cockroachdb]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use genindex_core::{DatabaseVocabulary, IndexKind};
use serde::Deserialize;

/// Parsed `genindex.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Schema file or directory, relative to the repository root.
    /// Absent means the schema compiled into the binary.
    pub schema: Option<PathBuf>,
    /// Entity index location.
    pub entity_index: Option<PathBuf>,
    /// Migration index location.
    pub migration_index: Option<PathBuf>,
    /// Run the referential pass on every `validate`.
    pub check_paths: bool,
    /// Database names accepted in addition to the built-in vocabulary.
    pub extra_databases: Vec<String>,
}

impl Config {
    /// Default configuration file name.
    pub const FILE_NAME: &'static str = "genindex.yaml";

    /// Load the configuration.
    ///
    /// An `explicit` path must exist. Otherwise `genindex.yaml` under
    /// `repo_root` is used when present, and defaults apply when not.
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = repo_root.join(Self::FILE_NAME);
                if !candidate.is_file() {
                    tracing::debug!("no {} found; using defaults", Self::FILE_NAME);
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration text. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Location of the index for `kind`.
    pub fn index_path(&self, kind: IndexKind, repo_root: &Path) -> PathBuf {
        let configured = match kind {
            IndexKind::Entity => self.entity_index.as_deref(),
            IndexKind::Migration => self.migration_index.as_deref(),
        };
        match configured {
            Some(p) => repo_root.join(p),
            None => repo_root.join(kind.default_file_name()),
        }
    }

    /// Configured schema location, if any.
    pub fn schema_path(&self, repo_root: &Path) -> Option<PathBuf> {
        self.schema.as_ref().map(|p| repo_root.join(p))
    }

    /// Built-in vocabulary plus `extra_databases`.
    pub fn vocabulary(&self) -> DatabaseVocabulary {
        DatabaseVocabulary::with_extra(&self.extra_databases)
    }
}
