//! # genindex-schema — Catalog Validation
//!
//! Validates generator catalogs against `generator-index.schema.json` and
//! reports every problem found in a single pass.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`SchemaValidator`] holds a registry of JSON schemas (the bundled
//! catalog schema, a schema directory, or a single file) and validates
//! parsed documents against them. Violations are classified
//! ([`ViolationKind`]) and attributed to the failing record.
//!
//! ## Referential Checks (`referential`)
//!
//! The schema can only check shape. [`check_references`] is the separate,
//! explicit pass for duplicate script paths and for `path`/`icons` entries
//! that do not exist on disk.
//!
//! ## Reports (`report`)
//!
//! [`IndexChecker`] runs the schema pass, the vocabulary warnings and the
//! optional referential pass, producing an [`IndexReport`] per document.
//!
//! ## Crate Policy
//!
//! - Depends only on `genindex-core` internally.
//! - Validation is a pure function of (schema, document): no shared state,
//!   no fail-fast.

pub mod referential;
pub mod report;
pub mod validate;

pub use referential::{check_references, ReferentialError};
pub use report::{CatalogReport, IndexChecker, IndexReport};
pub use validate::{
    SchemaValidationError, SchemaValidator, Violation, ViolationKind, BUNDLED_SCHEMA,
    GENERATOR_INDEX_SCHEMA,
};
