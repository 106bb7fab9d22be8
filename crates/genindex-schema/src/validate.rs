//! # Runtime Schema Validation
//!
//! Validates catalog documents against JSON Schema (Draft 2020-12)
//! definitions. The catalog schema ships inside this crate
//! ([`BUNDLED_SCHEMA`]); a schema directory or a single schema file can be
//! loaded instead, e.g. to test a schema change before publishing it.
//!
//! ## Design
//!
//! [`SchemaValidator`] registers every schema by `$id` so that
//! cross-schema `$ref`s resolve locally, without network access. Each
//! validation compiles the requested schema and collects *all* errors
//! reported by the `jsonschema` crate. Errors are turned into
//! [`Violation`]s carrying the record position, record name and field so
//! that a contributor can fix every problem after a single run.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::error::ValidationErrorKind;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// File name of the catalog schema.
pub const GENERATOR_INDEX_SCHEMA: &str = "generator-index.schema.json";

/// The catalog schema, embedded at compile time.
pub const BUNDLED_SCHEMA: &str = include_str!("../../../schemas/generator-index.schema.json");

/// URI prefix used to derive an `$id` for schemas that do not declare one.
const SCHEMA_URI_PREFIX: &str = "https://schemas.ormfactory.com/generators/";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors returned by schema validation operations.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document is not valid JSON.
    #[error("failed to parse {origin}: {reason}")]
    Parse {
        /// File path or label of the document.
        origin: String,
        /// Parser message with line and column.
        reason: String,
    },

    /// The document parsed but failed one or more schema constraints.
    #[error("{count} validation error(s) against {schema_id}")]
    ValidationFailed {
        /// The schema that was violated.
        schema_id: String,
        /// Number of violations found.
        count: usize,
        /// Every violation, in the order the validator reported them.
        violations: Vec<Violation>,
    },

    /// A schema file could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoad {
        /// Path or identifier of the schema.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A schema could not be compiled into a validator.
    #[error("failed to compile schema {schema_id}: {reason}")]
    SchemaCompile {
        /// The schema `$id`.
        schema_id: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The requested schema is not in the registry.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// I/O error while reading a document.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path of the file being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// The constraint class a violation falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required property is absent.
    MissingField,
    /// A value has the wrong JSON type.
    WrongType,
    /// A value is outside an allowed set.
    EnumMismatch,
    /// An array has fewer items than required.
    TooFewItems,
    /// An array repeats an item that must be unique.
    DuplicateItems,
    /// A string is shorter than allowed (typically empty).
    EmptyString,
    /// A string does not match its pattern.
    PatternMismatch,
    /// A property not declared by the schema.
    UnexpectedField,
    /// Any other constraint.
    Other,
}

impl ViolationKind {
    /// Short label used in text reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "missing field",
            Self::WrongType => "wrong type",
            Self::EnumMismatch => "value not allowed",
            Self::TooFewItems => "too few items",
            Self::DuplicateItems => "duplicate items",
            Self::EmptyString => "empty string",
            Self::PatternMismatch => "pattern mismatch",
            Self::UnexpectedField => "unexpected field",
            Self::Other => "constraint",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single schema violation with record attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer to the violating value in the document.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Position in `generators` when the violation is inside a record.
    pub position: Option<usize>,
    /// The record's `name`, when it has a string one.
    pub record: Option<String>,
    /// The record field involved, if any.
    pub field: Option<String>,
    /// Constraint class.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.position, &self.record) {
            (Some(i), Some(name)) => write!(f, "generators[{i}] ({name}): ")?,
            (Some(i), None) => write!(f, "generators[{i}]: ")?,
            _ if self.instance_path.is_empty() => f.write_str("(root): ")?,
            _ => write!(f, "{}: ", self.instance_path)?,
        }
        write!(f, "{}", self.message)
    }
}

impl Violation {
    /// Build a violation from a `jsonschema` error, attributing it to a
    /// record of `document` when the instance path points inside one.
    fn from_error(err: &jsonschema::ValidationError<'_>, document: &Value) -> Self {
        let instance_path = err.instance_path.to_string();
        let (position, path_field) = locate(&instance_path);
        let record = position.and_then(|i| {
            document
                .get("generators")
                .and_then(|g| g.get(i))
                .and_then(|r| r.get("name"))
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        });

        let (kind, field, message) = match &err.kind {
            ValidationErrorKind::Required { property } => {
                let name = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());
                let message = format!("missing required field `{name}`");
                (ViolationKind::MissingField, Some(name), message)
            }
            ValidationErrorKind::MinItems { limit } => {
                let subject = path_field.clone().unwrap_or_else(|| "array".to_string());
                let message = if *limit == 1 {
                    format!("`{subject}` must contain at least one item")
                } else {
                    format!("`{subject}` must contain at least {limit} items")
                };
                (ViolationKind::TooFewItems, path_field, message)
            }
            ValidationErrorKind::MinLength { limit } if *limit == 1 => {
                let subject = path_field.clone().unwrap_or_else(|| "value".to_string());
                let message = format!("`{subject}` must not be empty");
                (ViolationKind::EmptyString, path_field, message)
            }
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                let message = format!(
                    "unexpected field(s): {}",
                    unexpected
                        .iter()
                        .map(|u| format!("`{u}`"))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                (
                    ViolationKind::UnexpectedField,
                    unexpected.first().cloned(),
                    message,
                )
            }
            other => {
                let kind = match other {
                    ValidationErrorKind::Type { .. } => ViolationKind::WrongType,
                    ValidationErrorKind::Enum { .. } => ViolationKind::EnumMismatch,
                    ValidationErrorKind::UniqueItems => ViolationKind::DuplicateItems,
                    ValidationErrorKind::Pattern { .. } => ViolationKind::PatternMismatch,
                    ValidationErrorKind::MinLength { .. } => ViolationKind::EmptyString,
                    _ => ViolationKind::Other,
                };
                let message = match &path_field {
                    Some(f) => format!("`{f}`: {err}"),
                    None => err.to_string(),
                };
                (kind, path_field, message)
            }
        };

        Self {
            instance_path,
            schema_path: err.schema_path.to_string(),
            position,
            record,
            field,
            kind,
            message,
        }
    }
}

/// Split a JSON Pointer into the record position and record field.
///
/// `/generators/3/icons/0` yields `(Some(3), Some("icons"))`; a pointer
/// outside `generators` yields its last segment as the field.
fn locate(pointer: &str) -> (Option<usize>, Option<String>) {
    let segments: Vec<&str> = pointer.split('/').skip(1).collect();
    match segments.as_slice() {
        [] => (None, None),
        ["generators", idx, rest @ ..] => match idx.parse::<usize>() {
            Ok(i) => (Some(i), rest.first().map(|s| unescape(s))),
            Err(_) => (None, Some("generators".to_string())),
        },
        [.., last] => (None, Some(unescape(last))),
    }
}

/// Undo JSON Pointer escaping (RFC 6901).
fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

// ---------------------------------------------------------------------------
// Schema retriever for $ref resolution
// ---------------------------------------------------------------------------

/// Resolves `$ref` URIs from the in-memory registry only.
struct LocalSchemaRetriever {
    schemas: HashMap<String, Value>,
}

impl jsonschema::Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.schemas
            .get(uri_str)
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

// ---------------------------------------------------------------------------
// SchemaValidator
// ---------------------------------------------------------------------------

/// A registry of JSON schemas used to validate catalog documents.
pub struct SchemaValidator {
    /// Where the schemas came from, for diagnostics.
    source: String,
    /// Schemas indexed by `$id`.
    schema_map: HashMap<String, Value>,
    /// Schema file name to `$id`.
    filename_to_id: HashMap<String, String>,
    /// `$id` of the schema applied by [`SchemaValidator::validate_index`].
    index_schema_id: Option<String>,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("source", &self.source)
            .field("schema_count", &self.schema_map.len())
            .field("index_schema_id", &self.index_schema_id)
            .finish()
    }
}

impl SchemaValidator {
    /// Validator over the catalog schema compiled into this crate.
    pub fn bundled() -> Result<Self, SchemaValidationError> {
        let schema: Value =
            serde_json::from_str(BUNDLED_SCHEMA).map_err(|e| SchemaValidationError::SchemaLoad {
                path: format!("<bundled {GENERATOR_INDEX_SCHEMA}>"),
                reason: e.to_string(),
            })?;
        let mut validator = Self::empty("<bundled>");
        let id = validator.register(GENERATOR_INDEX_SCHEMA, schema);
        validator.index_schema_id = Some(id);
        Ok(validator)
    }

    /// Load every `*.schema.json` file under `schema_dir`, recursively.
    ///
    /// The catalog schema is the one named [`GENERATOR_INDEX_SCHEMA`]; if
    /// the directory does not contain it, [`validate_index`] reports
    /// [`SchemaValidationError::SchemaNotFound`].
    ///
    /// [`validate_index`]: SchemaValidator::validate_index
    pub fn new(schema_dir: impl Into<PathBuf>) -> Result<Self, SchemaValidationError> {
        let schema_dir = schema_dir.into();
        if !schema_dir.is_dir() {
            return Err(SchemaValidationError::SchemaLoad {
                path: schema_dir.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        let mut validator = Self::empty(schema_dir.display().to_string());
        let mut paths = Vec::new();
        walk_for_schemas(&schema_dir, &mut paths)?;
        paths.sort();

        for path in &paths {
            let schema = read_schema(path)?;
            let filename = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or_default()
                .to_string();
            validator.register(&filename, schema);
        }

        validator.index_schema_id = validator.filename_to_id.get(GENERATOR_INDEX_SCHEMA).cloned();
        tracing::debug!(
            dir = %schema_dir.display(),
            schemas = validator.schema_count(),
            "loaded schema directory"
        );
        Ok(validator)
    }

    /// Load a single schema file and use it as the catalog schema.
    pub fn from_schema_file(path: &Path) -> Result<Self, SchemaValidationError> {
        let schema = read_schema(path)?;
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(GENERATOR_INDEX_SCHEMA)
            .to_string();
        let mut validator = Self::empty(path.display().to_string());
        let id = validator.register(&filename, schema);
        validator.index_schema_id = Some(id);
        Ok(validator)
    }

    fn empty(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            schema_map: HashMap::new(),
            filename_to_id: HashMap::new(),
            index_schema_id: None,
        }
    }

    /// Register `schema` under its `$id` (or a derived one) and return the id.
    fn register(&mut self, filename: &str, schema: Value) -> String {
        let schema_id = schema
            .get("$id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{SCHEMA_URI_PREFIX}{filename}"));
        self.filename_to_id
            .insert(filename.to_string(), schema_id.clone());
        self.schema_map.insert(schema_id.clone(), schema);
        schema_id
    }

    /// Where the schemas were loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schema_map.len()
    }

    /// `$id` of the catalog schema, if one is registered.
    pub fn index_schema_id(&self) -> Option<&str> {
        self.index_schema_id.as_deref()
    }

    /// Look up a schema by its file name.
    pub fn get_schema_by_filename(&self, filename: &str) -> Option<&Value> {
        self.filename_to_id
            .get(filename)
            .and_then(|id| self.schema_map.get(id))
    }

    /// Validate `value` against the schema registered as `schema_id`.
    ///
    /// Returns `Ok(())` when the value conforms, or
    /// [`SchemaValidationError::ValidationFailed`] listing every violation.
    pub fn validate_value(&self, value: &Value, schema_id: &str) -> Result<(), SchemaValidationError> {
        let schema = self
            .schema_map
            .get(schema_id)
            .ok_or_else(|| SchemaValidationError::SchemaNotFound(schema_id.to_string()))?;

        let retriever = LocalSchemaRetriever {
            schemas: self.schema_map.clone(),
        };

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(retriever)
            .build(schema)
            .map_err(|e| SchemaValidationError::SchemaCompile {
                schema_id: schema_id.to_string(),
                reason: e.to_string(),
            })?;

        let violations: Vec<Violation> = validator
            .iter_errors(value)
            .map(|err| Violation::from_error(&err, value))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_id: schema_id.to_string(),
                count: violations.len(),
                violations,
            })
        }
    }

    /// Validate `value` against the catalog schema.
    pub fn validate_index(&self, value: &Value) -> Result<(), SchemaValidationError> {
        let schema_id = self
            .index_schema_id
            .as_deref()
            .ok_or_else(|| SchemaValidationError::SchemaNotFound(GENERATOR_INDEX_SCHEMA.to_string()))?;
        self.validate_value(value, schema_id)
    }

    /// Parse JSON text and validate it against the catalog schema.
    pub fn validate_str(&self, text: &str, origin: &str) -> Result<(), SchemaValidationError> {
        let value = parse_document(text, origin)?;
        self.validate_index(&value)
    }

    /// Read, parse and validate a catalog file.
    pub fn validate_file(&self, path: &Path) -> Result<(), SchemaValidationError> {
        let text = read_document(path)?;
        self.validate_str(&text, &path.display().to_string())
    }
}

/// Parse a document, mapping syntax errors to [`SchemaValidationError::Parse`].
pub(crate) fn parse_document(text: &str, origin: &str) -> Result<Value, SchemaValidationError> {
    serde_json::from_str(text).map_err(|e| SchemaValidationError::Parse {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn read_document(path: &Path) -> Result<String, SchemaValidationError> {
    std::fs::read_to_string(path).map_err(|source| SchemaValidationError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn read_schema(path: &Path) -> Result<Value, SchemaValidationError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaValidationError::SchemaLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| SchemaValidationError::SchemaLoad {
        path: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

fn walk_for_schemas(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), SchemaValidationError> {
    let entries = std::fs::read_dir(dir).map_err(|e| SchemaValidationError::SchemaLoad {
        path: dir.display().to_string(),
        reason: format!("cannot read schema directory: {e}"),
    })?;
    for entry in entries {
        let path = entry
            .map_err(|e| SchemaValidationError::SchemaLoad {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?
            .path();
        if path.is_dir() {
            walk_for_schemas(&path, acc)?;
        } else if path
            .file_name()
            .and_then(|f| f.to_str())
            .is_some_and(|name| name.ends_with(".schema.json"))
        {
            acc.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hibernate() -> Value {
        json!({
            "generators": [{
                "name": "Hibernate Entity Generator",
                "orm": "hibernate",
                "databases": ["postgresql", "mysql"],
                "version": "1.0.0",
                "path": "generators/entities/hibernate/generator.py",
                "description": "JPA entities for Hibernate.",
                "icons": ["icons/hibernate.svg", "icons/postgresql.svg"]
            }]
        })
    }

    fn violations_of(result: Result<(), SchemaValidationError>) -> Vec<Violation> {
        match result {
            Err(SchemaValidationError::ValidationFailed { violations, count, .. }) => {
                assert_eq!(count, violations.len());
                violations
            }
            Ok(()) => panic!("expected ValidationFailed, document was valid"),
            Err(other) => panic!("expected ValidationFailed, got: {other}"),
        }
    }

    #[test]
    fn bundled_schema_loads() {
        let v = SchemaValidator::bundled().unwrap();
        assert_eq!(v.schema_count(), 1);
        assert!(v.get_schema_by_filename(GENERATOR_INDEX_SCHEMA).is_some());
        assert_eq!(
            v.index_schema_id(),
            Some("https://schemas.ormfactory.com/generators/generator-index.schema.json")
        );
    }

    #[test]
    fn valid_document_passes() {
        let v = SchemaValidator::bundled().unwrap();
        v.validate_index(&hibernate()).unwrap();
    }

    #[test]
    fn wrong_type_is_classified() {
        let v = SchemaValidator::bundled().unwrap();
        let mut doc = hibernate();
        doc["generators"][0]["databases"] = json!("mysql");
        let violations = violations_of(v.validate_index(&doc));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::WrongType);
        assert_eq!(violations[0].field.as_deref(), Some("databases"));
        assert_eq!(violations[0].position, Some(0));
    }

    #[test]
    fn empty_name_is_classified() {
        let v = SchemaValidator::bundled().unwrap();
        let mut doc = hibernate();
        doc["generators"][0]["name"] = json!("");
        let violations = violations_of(v.validate_index(&doc));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::EmptyString);
        assert_eq!(violations[0].field.as_deref(), Some("name"));
        assert_eq!(violations[0].record, None);
        assert!(violations[0].to_string().starts_with("generators[0]: "));
    }

    #[test]
    fn bad_version_is_pattern_mismatch() {
        let v = SchemaValidator::bundled().unwrap();
        let mut doc = hibernate();
        doc["generators"][0]["version"] = json!("one");
        let violations = violations_of(v.validate_index(&doc));
        assert_eq!(violations[0].kind, ViolationKind::PatternMismatch);
        assert_eq!(violations[0].field.as_deref(), Some("version"));
    }

    #[test]
    fn version_must_be_three_part_semver() {
        let v = SchemaValidator::bundled().unwrap();
        for version in ["1.0", "v1.0.0", "1.0.0.1", "01.0.0"] {
            let mut doc = hibernate();
            doc["generators"][0]["version"] = json!(version);
            let violations = violations_of(v.validate_index(&doc));
            assert_eq!(violations.len(), 1, "{version}: {violations:#?}");
            assert_eq!(violations[0].kind, ViolationKind::PatternMismatch, "{version}");
        }
    }

    #[test]
    fn prerelease_version_is_accepted() {
        let v = SchemaValidator::bundled().unwrap();
        let mut doc = hibernate();
        doc["generators"][0]["version"] = json!("2.1.0-beta.1+build.7");
        v.validate_index(&doc).unwrap();
    }

    #[test]
    fn non_svg_icon_is_rejected() {
        let v = SchemaValidator::bundled().unwrap();
        let mut doc = hibernate();
        doc["generators"][0]["icons"] = json!(["icons/hibernate.png"]);
        let violations = violations_of(v.validate_index(&doc));
        assert_eq!(violations[0].kind, ViolationKind::PatternMismatch);
        assert_eq!(violations[0].field.as_deref(), Some("icons"));
        assert_eq!(violations[0].instance_path, "/generators/0/icons/0");
    }

    #[test]
    fn duplicate_database_is_rejected() {
        let v = SchemaValidator::bundled().unwrap();
        let mut doc = hibernate();
        doc["generators"][0]["databases"] = json!(["mysql", "mysql"]);
        let violations = violations_of(v.validate_index(&doc));
        assert_eq!(violations[0].kind, ViolationKind::DuplicateItems);
    }

    #[test]
    fn unexpected_record_field_is_named() {
        let v = SchemaValidator::bundled().unwrap();
        let mut doc = hibernate();
        doc["generators"][0]["author"] = json!("someone");
        let violations = violations_of(v.validate_index(&doc));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::UnexpectedField);
        assert_eq!(violations[0].field.as_deref(), Some("author"));
    }

    #[test]
    fn missing_generators_is_root_violation() {
        let v = SchemaValidator::bundled().unwrap();
        let violations = violations_of(v.validate_index(&json!({})));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MissingField);
        assert_eq!(violations[0].field.as_deref(), Some("generators"));
        assert_eq!(violations[0].position, None);
        assert!(violations[0].to_string().starts_with("(root): "));
    }

    #[test]
    fn all_violations_are_collected() {
        let v = SchemaValidator::bundled().unwrap();
        let mut doc = hibernate();
        let second = json!({
            "name": "Broken",
            "orm": "ef",
            "databases": [],
            "path": "entities/ef/ef-mysql.py",
            "description": "missing version, empty databases"
        });
        doc["generators"].as_array_mut().unwrap().push(second);
        doc["generators"][0]["orm"] = json!(42);
        let violations = violations_of(v.validate_index(&doc));
        assert_eq!(violations.len(), 3, "{violations:#?}");
        assert!(violations.iter().any(|v| v.position == Some(0) && v.kind == ViolationKind::WrongType));
        assert!(violations
            .iter()
            .any(|v| v.position == Some(1) && v.kind == ViolationKind::MissingField));
        assert!(violations
            .iter()
            .any(|v| v.position == Some(1) && v.kind == ViolationKind::TooFewItems));
        assert!(violations
            .iter()
            .filter(|v| v.position == Some(1))
            .all(|v| v.record.as_deref() == Some("Broken")));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let v = SchemaValidator::bundled().unwrap();
        let err = v.validate_str("{\"generators\": [", "entity-index.json").unwrap_err();
        assert!(matches!(err, SchemaValidationError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("entity-index.json"));
    }

    #[test]
    fn schema_directory_is_loaded_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(GENERATOR_INDEX_SCHEMA), BUNDLED_SCHEMA).unwrap();
        std::fs::write(nested.join("extra.schema.json"), r#"{"type": "object"}"#).unwrap();
        std::fs::write(dir.path().join("README.md"), "not a schema").unwrap();

        let v = SchemaValidator::new(dir.path()).unwrap();
        assert_eq!(v.schema_count(), 2);
        assert!(v.get_schema_by_filename("extra.schema.json").is_some());
        v.validate_index(&hibernate()).unwrap();
    }

    #[test]
    fn directory_without_index_schema_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.schema.json"), r#"{"type": "object"}"#).unwrap();
        let v = SchemaValidator::new(dir.path()).unwrap();
        let err = v.validate_index(&hibernate()).unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaNotFound(_)));
    }

    #[test]
    fn missing_directory_is_load_error() {
        let err = SchemaValidator::new("/nonexistent/genindex-schemas").unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaLoad { .. }));
    }

    #[test]
    fn invalid_schema_json_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(GENERATOR_INDEX_SCHEMA);
        std::fs::write(&path, "{ not json").unwrap();
        let err = SchemaValidator::from_schema_file(&path).unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaLoad { .. }));
    }

    #[test]
    fn uncompilable_schema_is_compile_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.schema.json");
        std::fs::write(&path, r#"{"type": "not-a-type"}"#).unwrap();
        let v = SchemaValidator::from_schema_file(&path).unwrap();
        let err = v.validate_index(&hibernate()).unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaCompile { .. }), "got: {err}");
    }

    #[test]
    fn schema_without_id_gets_derived_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.schema.json");
        std::fs::write(&path, r#"{"type": "object"}"#).unwrap();
        let v = SchemaValidator::from_schema_file(&path).unwrap();
        assert_eq!(
            v.index_schema_id(),
            Some("https://schemas.ormfactory.com/generators/plain.schema.json")
        );
    }

    #[test]
    fn locate_splits_record_pointers() {
        assert_eq!(locate(""), (None, None));
        assert_eq!(locate("/generators/3/icons/0"), (Some(3), Some("icons".to_string())));
        assert_eq!(locate("/generators/0"), (Some(0), None));
        assert_eq!(locate("/generators"), (None, Some("generators".to_string())));
        assert_eq!(locate("/a~1b"), (None, Some("a/b".to_string())));
    }
}
