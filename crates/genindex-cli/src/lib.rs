//! # genindex-cli — Generator Catalog Command-Line Interface
//!
//! Provides the `genindex` binary used by contributors and by CI to keep
//! the generator catalogs healthy.
//!
//! ## Subcommands
//!
//! - `genindex validate` — schema validation of both catalogs (or given
//!   files), with optional referential path checks.
//! - `genindex list` — print catalog entries, filtered by ORM or database.
//! - `genindex fmt` — rewrite catalogs in canonical layout, or `--check`.
//!
//! ```bash
//! genindex validate
//! genindex validate --entities --check-paths --format json
//! genindex list --database postgresql
//! genindex fmt --check
//! ```
//!
//! ## Exit codes
//!
//! `0` success, `1` validation failure or formatting drift, `2`
//! operational error (unreadable schema, missing catalog file).

pub mod config;
pub mod fmt;
pub mod list;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use genindex_core::IndexKind;

/// Catalog selector accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// The entity generator index.
    Entity,
    /// The migration generator index.
    Migration,
}

impl From<KindArg> for IndexKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Entity => IndexKind::Entity,
            KindArg::Migration => IndexKind::Migration,
        }
    }
}

/// Report format for commands that print results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned unchanged. A relative path is taken
/// relative to `repo_root` when that file exists, otherwise relative to
/// the current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Walk up from `start` to the first directory that looks like the
/// catalog repository: it holds the published schema or an index file.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let has_schema = dir
            .join("schemas")
            .join(genindex_schema::GENERATOR_INDEX_SCHEMA)
            .is_file();
        let has_index = IndexKind::ALL
            .iter()
            .any(|k| dir.join(k.default_file_name()).is_file());
        if has_schema || has_index {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Label a document path for reports: relative to the root when possible.
pub(crate) fn display_label(path: &Path, repo_root: &Path) -> String {
    path.strip_prefix(repo_root)
        .unwrap_or(path)
        .display()
        .to_string()
}
