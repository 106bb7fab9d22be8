//! # Database Vocabulary
//!
//! The conventional set of database backend names used in `databases`.
//! The set is not closed: catalogs may legitimately name a backend that is
//! not listed here, so lookups produce warnings rather than errors.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::descriptor::GeneratorIndex;

/// Built-in database names, lowercase.
pub const KNOWN_DATABASES: &[&str] = &[
    "mysql",
    "mariadb",
    "postgresql",
    "sqlite",
    "mssql",
    "oracle",
];

/// A set of recognised database names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseVocabulary {
    names: BTreeSet<String>,
}

impl Default for DatabaseVocabulary {
    fn default() -> Self {
        Self {
            names: KNOWN_DATABASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DatabaseVocabulary {
    /// The built-in vocabulary extended with `extra` names.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();
        for name in extra {
            vocab.names.insert(name.as_ref().to_ascii_lowercase());
        }
        vocab
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    /// Number of recognised names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every `databases` entry in `index` that is not in the vocabulary.
    pub fn unknown_in(&self, index: &GeneratorIndex) -> Vec<UnknownDatabase> {
        let mut out = Vec::new();
        for (position, g) in index.iter().enumerate() {
            for db in &g.databases {
                if !self.contains(db) {
                    out.push(UnknownDatabase {
                        position,
                        record: g.name.clone(),
                        database: db.clone(),
                    });
                }
            }
        }
        out
    }
}

/// A `databases` value outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownDatabase {
    /// Record position in `generators`.
    pub position: usize,
    /// Record `name`.
    pub record: String,
    /// The unrecognised value.
    pub database: String,
}

impl fmt::Display for UnknownDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generators[{}] ({}): unrecognised database '{}'",
            self.position, self.record, self.database
        )
    }
}
