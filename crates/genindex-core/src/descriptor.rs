//! # Generator Descriptors and Index Documents
//!
//! A catalog document is a single object `{"generators": [...]}` holding an
//! ordered list of [`GeneratorDescriptor`] records. Record order is listing
//! order for display and carries no other meaning.
//!
//! ## Round-trip guarantee
//!
//! [`GeneratorIndex::to_json_string`] emits fields in declaration order with
//! two-space indentation and a trailing newline. Loading and re-saving a
//! catalog never drops or reorders required fields, and an absent `icons`
//! stays absent.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenIndexError;

/// One generator script listed in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorDescriptor {
    /// Human-readable identifier.
    pub name: String,
    /// Target ORM/framework key (e.g. `hibernate`, `laravel`).
    pub orm: String,
    /// Supported database backends. Order is not significant.
    pub databases: Vec<String>,
    /// Semantic-version-like string.
    pub version: String,
    /// Script location relative to the repository root.
    pub path: String,
    /// Short human-readable summary.
    pub description: String,
    /// Relative paths to SVG icons, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<String>>,
}

impl GeneratorDescriptor {
    /// Whether this generator declares support for `database`.
    ///
    /// Comparison is ASCII case-insensitive.
    pub fn supports(&self, database: &str) -> bool {
        self.databases
            .iter()
            .any(|d| d.eq_ignore_ascii_case(database))
    }

    /// Icon paths, empty when the field is absent.
    pub fn icons(&self) -> &[String] {
        self.icons.as_deref().unwrap_or(&[])
    }
}

impl fmt::Display for GeneratorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.version, self.path)
    }
}

/// A catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorIndex {
    /// Records in listing order.
    pub generators: Vec<GeneratorDescriptor>,
}

impl GeneratorIndex {
    /// Parse a catalog from JSON text.
    ///
    /// `origin` names the document in error messages.
    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, GenIndexError> {
        serde_json::from_str(text).map_err(|e| GenIndexError::parse(origin, &e))
    }

    /// Convert an already-parsed JSON value into the typed model.
    pub fn from_json_value(value: &Value, origin: &str) -> Result<Self, GenIndexError> {
        Self::deserialize(value).map_err(|e| GenIndexError::parse(origin, &e))
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self, GenIndexError> {
        let text = std::fs::read_to_string(path).map_err(|source| GenIndexError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let index = Self::from_json_str(&text, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            records = index.len(),
            "loaded generator index"
        );
        Ok(index)
    }

    /// Serialize to the canonical on-disk layout.
    pub fn to_json_string(&self) -> Result<String, GenIndexError> {
        let mut out = serde_json::to_string_pretty(self)
            .map_err(|e| GenIndexError::Serialization(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }

    /// Write the canonical layout to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), GenIndexError> {
        let text = self.to_json_string()?;
        std::fs::write(path, text).map_err(|source| GenIndexError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// True if the catalog lists no generators.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Records in listing order.
    pub fn iter(&self) -> std::slice::Iter<'_, GeneratorDescriptor> {
        self.generators.iter()
    }

    /// The record whose `path` equals `path`, if any.
    pub fn find_by_path(&self, path: &str) -> Option<&GeneratorDescriptor> {
        self.generators.iter().find(|g| g.path == path)
    }

    /// Records targeting `orm`, compared case-insensitively.
    pub fn by_orm<'a>(&'a self, orm: &'a str) -> impl Iterator<Item = &'a GeneratorDescriptor> {
        self.generators
            .iter()
            .filter(move |g| g.orm.eq_ignore_ascii_case(orm))
    }

    /// Records that declare support for `database`.
    pub fn supporting<'a>(
        &'a self,
        database: &'a str,
    ) -> impl Iterator<Item = &'a GeneratorDescriptor> {
        self.generators.iter().filter(move |g| g.supports(database))
    }

    /// Distinct ORM keys in order of first appearance.
    pub fn orms(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for g in &self.generators {
            if !seen.contains(&g.orm.as_str()) {
                seen.push(&g.orm);
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a GeneratorIndex {
    type Item = &'a GeneratorDescriptor;
    type IntoIter = std::slice::Iter<'a, GeneratorDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Which catalog a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Entity/model generators.
    Entity,
    /// Schema-migration generators.
    Migration,
}

impl IndexKind {
    /// Both kinds, in reporting order.
    pub const ALL: [IndexKind; 2] = [IndexKind::Entity, IndexKind::Migration];

    /// Default file name at the repository root.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Entity => "entity-index.json",
            Self::Migration => "migration-index.json",
        }
    }

    /// Short label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Migration => "migration",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIBERNATE: &str = r#"{
  "generators": [
    {
      "name": "Hibernate Entity Generator",
      "orm": "hibernate",
      "databases": [
        "postgresql",
        "mysql"
      ],
      "version": "1.0.0",
      "path": "generators/entities/hibernate/generator.py",
      "description": "JPA entities for Hibernate.",
      "icons": [
        "icons/hibernate.svg",
        "icons/postgresql.svg"
      ]
    }
  ]
}
"#;

    fn sample() -> GeneratorIndex {
        GeneratorIndex::from_json_str(HIBERNATE, "test").unwrap()
    }

    fn descriptor(name: &str, orm: &str, dbs: &[&str], path: &str) -> GeneratorDescriptor {
        GeneratorDescriptor {
            name: name.to_string(),
            orm: orm.to_string(),
            databases: dbs.iter().map(|s| s.to_string()).collect(),
            version: "1.0.0".to_string(),
            path: path.to_string(),
            description: "test".to_string(),
            icons: None,
        }
    }

    #[test]
    fn parses_full_record() {
        let index = sample();
        assert_eq!(index.len(), 1);
        let g = &index.generators[0];
        assert_eq!(g.orm, "hibernate");
        assert_eq!(g.databases, vec!["postgresql", "mysql"]);
        assert_eq!(g.icons().len(), 2);
    }

    #[test]
    fn canonical_layout_is_byte_stable() {
        let index = sample();
        assert_eq!(index.to_json_string().unwrap(), HIBERNATE);
    }

    #[test]
    fn absent_icons_stay_absent() {
        let index = GeneratorIndex {
            generators: vec![descriptor("a", "django", &["mysql"], "entities/a.py")],
        };
        let text = index.to_json_string().unwrap();
        assert!(!text.contains("icons"));
        let back = GeneratorIndex::from_json_str(&text, "test").unwrap();
        assert_eq!(back.generators[0].icons, None);
        assert!(back.generators[0].icons().is_empty());
    }

    #[test]
    fn empty_icons_are_preserved() {
        let mut index = sample();
        index.generators[0].icons = Some(Vec::new());
        let text = index.to_json_string().unwrap();
        assert!(text.contains("\"icons\": []"));
    }

    #[test]
    fn required_fields_keep_declaration_order() {
        let text = sample().to_json_string().unwrap();
        let order: Vec<usize> = ["\"name\"", "\"orm\"", "\"databases\"", "\"version\"", "\"path\"", "\"description\""]
            .iter()
            .map(|k| text.find(k).unwrap())
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[test]
    fn unknown_record_field_is_rejected() {
        let text = HIBERNATE.replace("\"orm\": \"hibernate\",", "\"orm\": \"hibernate\", \"extra\": 1,");
        let err = GeneratorIndex::from_json_str(&text, "entity-index.json").unwrap_err();
        assert!(matches!(err, GenIndexError::Parse { .. }));
        assert!(err.to_string().contains("extra"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = GeneratorIndex::from_json_str("{\"generators\": [", "broken.json").unwrap_err();
        match err {
            GenIndexError::Parse { origin, .. } => assert_eq!(origin, "broken.json"),
            other => panic!("expected Parse, got {other}"),
        }
    }

    #[test]
    fn from_value_matches_from_str() {
        let value: Value = serde_json::from_str(HIBERNATE).unwrap();
        let a = GeneratorIndex::from_json_value(&value, "v").unwrap();
        assert_eq!(a, sample());
    }

    #[test]
    fn supports_is_case_insensitive() {
        let g = &sample().generators[0];
        assert!(g.supports("MySQL"));
        assert!(!g.supports("sqlite"));
    }

    #[test]
    fn catalog_queries() {
        let index = GeneratorIndex {
            generators: vec![
                descriptor("EF", "ef", &["mysql", "mssql"], "entities/ef/ef-mysql.py"),
                descriptor("Dapper", "dapper", &["mysql"], "entities/dapper/dapper-mysql.py"),
                descriptor("EF pg", "ef", &["postgresql"], "entities/ef/ef-postgresql.py"),
            ],
        };
        assert_eq!(index.orms(), vec!["ef", "dapper"]);
        assert_eq!(index.by_orm("EF").count(), 2);
        let mssql: Vec<_> = index.supporting("mssql").map(|g| g.name.as_str()).collect();
        assert_eq!(mssql, vec!["EF"]);
        assert_eq!(
            index.find_by_path("entities/dapper/dapper-mysql.py").map(|g| g.name.as_str()),
            Some("Dapper")
        );
        assert!(index.find_by_path("missing.py").is_none());
        assert_eq!((&index).into_iter().count(), 3);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entity-index.json");
        let index = sample();
        index.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), HIBERNATE);
        assert_eq!(GeneratorIndex::load(&path).unwrap(), index);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeneratorIndex::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, GenIndexError::Io { .. }));
    }

    #[test]
    fn index_kind_file_names() {
        assert_eq!(IndexKind::Entity.default_file_name(), "entity-index.json");
        assert_eq!(IndexKind::Migration.default_file_name(), "migration-index.json");
        assert_eq!(IndexKind::Migration.to_string(), "migration");
        assert_eq!(IndexKind::ALL.len(), 2);
    }
}
