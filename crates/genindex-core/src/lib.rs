//! # genindex-core — Generator Catalog Types
//!
//! The data model behind the two generator catalogs (`entity-index.json`
//! and `migration-index.json`). Every other crate in the workspace depends
//! on `genindex-core`; it depends on nothing internal.
//!
//! ## Contents
//!
//! - [`GeneratorDescriptor`] — one catalog record: name, ORM key, supported
//!   databases, version, script path, description and optional icons.
//! - [`GeneratorIndex`] — the `{"generators": [...]}` document with
//!   load/save that preserves record and field order.
//! - [`IndexKind`] — which of the two catalogs a document is.
//! - [`DatabaseVocabulary`] — the conventional list of database names,
//!   used to flag (never reject) unfamiliar backends.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `genindex-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Shape validation belongs to `genindex-schema`. Parsing here only
//!   guarantees the document deserializes into the typed model.

pub mod descriptor;
pub mod error;
pub mod vocabulary;

pub use descriptor::{GeneratorDescriptor, GeneratorIndex, IndexKind};
pub use error::GenIndexError;
pub use vocabulary::{DatabaseVocabulary, UnknownDatabase, KNOWN_DATABASES};
