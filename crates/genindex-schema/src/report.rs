//! # Validation Reports
//!
//! [`IndexChecker`] runs every pass over one catalog document:
//!
//! 1. the schema pass ([`SchemaValidator::validate_index`]),
//! 2. database vocabulary warnings,
//! 3. the referential pass, when a repository root is configured.
//!
//! Passes 2 and 3 need the typed index, so they run whenever the document
//! deserializes into [`GeneratorIndex`], even if the schema pass already
//! found violations. The result is an [`IndexReport`]; several reports
//! aggregate into a [`CatalogReport`].

use std::fmt;
use std::path::{Path, PathBuf};

use genindex_core::{DatabaseVocabulary, GeneratorIndex, UnknownDatabase};
use serde::Serialize;
use serde_json::Value;

use crate::referential::{check_references, ReferentialError};
use crate::validate::{
    parse_document, read_document, SchemaValidationError, SchemaValidator, Violation,
};

/// Outcome of checking one catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    /// File path or label of the document.
    pub document: String,
    /// Number of entries in `generators` (0 if it is not an array).
    pub records: usize,
    /// True iff there are no violations and no referential errors.
    pub valid: bool,
    /// Schema violations, in validator order.
    pub violations: Vec<Violation>,
    /// Referential errors; empty when the pass did not run.
    pub referential: Vec<ReferentialError>,
    /// Unrecognised database names. Never affect validity.
    pub warnings: Vec<UnknownDatabase>,
}

impl IndexReport {
    /// True iff the document passed every enabled check.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Total number of failures (violations plus referential errors).
    pub fn problem_count(&self) -> usize {
        self.violations.len() + self.referential.len()
    }
}

impl fmt::Display for IndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.records == 1 { "record" } else { "records" };
        if self.valid {
            write!(f, "OK: {} ({} {noun})", self.document, self.records)?;
        } else {
            write!(
                f,
                "FAIL: {} ({} {noun}, {} problem(s))",
                self.document,
                self.records,
                self.problem_count()
            )?;
        }
        for v in &self.violations {
            write!(f, "\n  {v}")?;
        }
        for r in &self.referential {
            write!(f, "\n  {r}")?;
        }
        for w in &self.warnings {
            write!(f, "\n  WARN: {w}")?;
        }
        Ok(())
    }
}

/// Reports for several documents validated in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogReport {
    /// One report per document, in the order they were checked.
    pub reports: Vec<IndexReport>,
}

impl CatalogReport {
    /// Number of documents checked.
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Number of documents that passed.
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.valid).count()
    }

    /// True iff every document passed.
    pub fn is_valid(&self) -> bool {
        self.reports.iter().all(|r| r.valid)
    }
}

impl fmt::Display for CatalogReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{report}")?;
        }
        write!(f, "Catalogs: {}/{} passed", self.passed(), self.total())
    }
}

/// Runs the schema, vocabulary and referential passes over catalogs.
#[derive(Debug)]
pub struct IndexChecker<'a> {
    validator: &'a SchemaValidator,
    vocabulary: DatabaseVocabulary,
    repo_root: Option<PathBuf>,
}

impl<'a> IndexChecker<'a> {
    /// A checker running the schema pass and vocabulary warnings only.
    pub fn new(validator: &'a SchemaValidator) -> Self {
        Self {
            validator,
            vocabulary: DatabaseVocabulary::default(),
            repo_root: None,
        }
    }

    /// Replace the database vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: DatabaseVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Enable the referential pass, resolving paths against `root`.
    pub fn with_referential_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.repo_root = Some(root.into());
        self
    }

    /// Check an already-parsed document.
    ///
    /// Returns `Err` only for operational failures (missing or
    /// uncompilable schema). Violations are reported in the `Ok` value.
    pub fn check_value(
        &self,
        value: &Value,
        document: &str,
    ) -> Result<IndexReport, SchemaValidationError> {
        let violations = match self.validator.validate_index(value) {
            Ok(()) => Vec::new(),
            Err(SchemaValidationError::ValidationFailed { violations, .. }) => violations,
            Err(other) => return Err(other),
        };

        let records = value
            .get("generators")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let mut referential = Vec::new();
        let mut warnings = Vec::new();
        match GeneratorIndex::from_json_value(value, document) {
            Ok(index) => {
                warnings = self.vocabulary.unknown_in(&index);
                if let Some(root) = &self.repo_root {
                    referential = check_references(&index, root);
                }
            }
            Err(e) => {
                tracing::debug!(document, error = %e, "typed parse failed; skipping record-level passes");
            }
        }

        for w in &warnings {
            tracing::warn!(document, "{w}");
        }

        let valid = violations.is_empty() && referential.is_empty();
        tracing::info!(
            document,
            records,
            violations = violations.len(),
            referential = referential.len(),
            valid,
            "checked generator index"
        );

        Ok(IndexReport {
            document: document.to_string(),
            records,
            valid,
            violations,
            referential,
            warnings,
        })
    }

    /// Parse JSON text and check it.
    ///
    /// Malformed JSON yields [`SchemaValidationError::Parse`].
    pub fn check_str(&self, text: &str, document: &str) -> Result<IndexReport, SchemaValidationError> {
        let value = parse_document(text, document)?;
        self.check_value(&value, document)
    }

    /// Read and check a catalog file. `label` names it in the report.
    pub fn check_file(&self, path: &Path, label: &str) -> Result<IndexReport, SchemaValidationError> {
        let text = read_document(path)?;
        self.check_str(&text, label)
    }
}
