//! # Referential Checks
//!
//! Checks that a JSON Schema cannot express: script paths are unique
//! within a catalog, and every `path` and `icons` entry names a file inside
//! the repository tree. This pass is opt-in and runs separately from the
//! schema pass, on the typed index.

use std::collections::HashMap;
use std::path::{Component, Path};

use genindex_core::GeneratorIndex;
use serde::Serialize;
use thiserror::Error;

/// A catalog entry that does not resolve inside the repository.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferentialError {
    /// Two records point at the same script.
    #[error("generators[{position}] ({record}): path '{path}' is already listed by generators[{first}]")]
    DuplicatePath {
        /// Position of the later record.
        position: usize,
        /// Name of the later record.
        record: String,
        /// The shared path.
        path: String,
        /// Position of the first record listing the path.
        first: usize,
    },

    /// The generator script does not exist.
    #[error("generators[{position}] ({record}): script '{path}' does not exist")]
    MissingScript {
        /// Record position.
        position: usize,
        /// Record name.
        record: String,
        /// The unresolved path.
        path: String,
    },

    /// An icon file does not exist.
    #[error("generators[{position}] ({record}): icon '{path}' does not exist")]
    MissingIcon {
        /// Record position.
        position: usize,
        /// Record name.
        record: String,
        /// The unresolved path.
        path: String,
    },

    /// A path is absolute instead of repository-relative.
    #[error("generators[{position}] ({record}): '{path}' must be relative to the repository root")]
    AbsolutePath {
        /// Record position.
        position: usize,
        /// Record name.
        record: String,
        /// The offending path.
        path: String,
    },

    /// A path climbs out of the repository with `..`.
    #[error("generators[{position}] ({record}): '{path}' escapes the repository root")]
    EscapesRoot {
        /// Record position.
        position: usize,
        /// Record name.
        record: String,
        /// The offending path.
        path: String,
    },
}

impl ReferentialError {
    /// Position of the record the error belongs to.
    pub fn position(&self) -> usize {
        match self {
            Self::DuplicatePath { position, .. }
            | Self::MissingScript { position, .. }
            | Self::MissingIcon { position, .. }
            | Self::AbsolutePath { position, .. }
            | Self::EscapesRoot { position, .. } => *position,
        }
    }
}

#[derive(Clone, Copy)]
enum Target {
    Script,
    Icon,
}

/// Run every referential check of `index` against the tree at `root`.
///
/// All problems are returned; the list is empty when every reference
/// resolves.
pub fn check_references(index: &GeneratorIndex, root: &Path) -> Vec<ReferentialError> {
    let mut errors = Vec::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (position, g) in index.iter().enumerate() {
        match first_seen.get(g.path.as_str()) {
            Some(&first) => errors.push(ReferentialError::DuplicatePath {
                position,
                record: g.name.clone(),
                path: g.path.clone(),
                first,
            }),
            None => {
                first_seen.insert(&g.path, position);
            }
        }

        if let Some(err) = check_path(root, position, &g.name, &g.path, Target::Script) {
            errors.push(err);
        }
        for icon in g.icons() {
            if let Some(err) = check_path(root, position, &g.name, icon, Target::Icon) {
                errors.push(err);
            }
        }
    }

    tracing::debug!(
        root = %root.display(),
        records = index.len(),
        errors = errors.len(),
        "referential check complete"
    );
    errors
}

fn check_path(
    root: &Path,
    position: usize,
    record: &str,
    path: &str,
    target: Target,
) -> Option<ReferentialError> {
    let rel = Path::new(path);
    let record = record.to_string();
    let path = path.to_string();

    if rel.is_absolute() || rel.has_root() {
        return Some(ReferentialError::AbsolutePath {
            position,
            record,
            path,
        });
    }
    if rel.components().any(|c| matches!(c, Component::ParentDir)) {
        return Some(ReferentialError::EscapesRoot {
            position,
            record,
            path,
        });
    }
    if root.join(rel).is_file() {
        return None;
    }
    Some(match target {
        Target::Script => ReferentialError::MissingScript {
            position,
            record,
            path,
        },
        Target::Icon => ReferentialError::MissingIcon {
            position,
            record,
            path,
        },
    })
}
