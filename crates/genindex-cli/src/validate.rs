//! # Validate Subcommand
//!
//! Validates the catalogs against the published schema and, on request,
//! runs the referential path checks. Every document is checked and every
//! problem is reported before the command exits, so one CI run shows the
//! whole picture.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use genindex_core::IndexKind;
use genindex_schema::{CatalogReport, IndexChecker, SchemaValidationError, SchemaValidator};

use crate::config::Config;
use crate::OutputFormat;

/// Arguments for the `genindex validate` subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Validate the entity generator index.
    #[arg(long)]
    pub entities: bool,

    /// Validate the migration generator index.
    #[arg(long)]
    pub migrations: bool,

    /// Validate specific index files.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Schema file or directory to validate against instead of the
    /// configured or bundled schema.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Also check that script and icon paths exist and scripts are unique.
    #[arg(long)]
    pub check_paths: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// A document that could not be parsed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnparsedDocument {
    /// Label of the document.
    pub document: String,
    /// Parser message.
    pub error: String,
}

/// Everything `validate` found in one run.
#[derive(Debug, Default, Serialize)]
pub struct ValidationRun {
    /// Reports for documents that parsed.
    #[serde(flatten)]
    pub catalog: CatalogReport,
    /// Documents rejected before schema validation.
    pub unparsed: Vec<UnparsedDocument>,
}

impl ValidationRun {
    /// True iff every document parsed and passed.
    pub fn is_valid(&self) -> bool {
        self.unparsed.is_empty() && self.catalog.is_valid()
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure. Operational
/// errors are returned as `Err`.
pub fn run_validate(args: &ValidateArgs, repo_root: &Path, config: &Config) -> Result<u8> {
    let validator = load_validator(args, repo_root, config)?;
    tracing::info!(
        source = validator.source(),
        schema_count = validator.schema_count(),
        "loaded schema registry"
    );

    let targets = select_targets(args, repo_root, config);
    let check_paths = args.check_paths || config.check_paths;
    let run = validate_targets(&validator, &targets, check_paths, repo_root, config)?;

    match args.format {
        OutputFormat::Text => print_text(&run),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&run).context("failed to serialize report")?
        ),
    }

    Ok(if run.is_valid() { 0 } else { 1 })
}

/// Validate each target file and collect the results.
pub fn validate_targets(
    validator: &SchemaValidator,
    targets: &[PathBuf],
    check_paths: bool,
    repo_root: &Path,
    config: &Config,
) -> Result<ValidationRun> {
    let mut checker = IndexChecker::new(validator).with_vocabulary(config.vocabulary());
    if check_paths {
        checker = checker.with_referential_root(repo_root);
    }

    let mut run = ValidationRun::default();
    for path in targets {
        let label = crate::display_label(path, repo_root);
        match checker.check_file(path, &label) {
            Ok(report) => run.catalog.reports.push(report),
            Err(SchemaValidationError::Parse { reason, .. }) => {
                run.unparsed.push(UnparsedDocument {
                    document: label,
                    error: reason,
                });
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot validate {label}"));
            }
        }
    }
    Ok(run)
}

fn load_validator(args: &ValidateArgs, repo_root: &Path, config: &Config) -> Result<SchemaValidator> {
    let schema = args
        .schema
        .as_ref()
        .map(|p| crate::resolve_path(p, repo_root))
        .or_else(|| config.schema_path(repo_root));

    let validator = match schema {
        Some(path) if path.is_dir() => SchemaValidator::new(&path),
        Some(path) => SchemaValidator::from_schema_file(&path),
        None => SchemaValidator::bundled(),
    };
    validator.context("failed to load JSON schema")
}

fn select_targets(args: &ValidateArgs, repo_root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut targets = Vec::new();
    let explicit = args.entities || args.migrations || !args.paths.is_empty();

    for kind in IndexKind::ALL {
        let wanted = match kind {
            IndexKind::Entity => args.entities,
            IndexKind::Migration => args.migrations,
        };
        if wanted || !explicit {
            targets.push(config.index_path(kind, repo_root));
        }
    }
    for path in &args.paths {
        targets.push(crate::resolve_path(path, repo_root));
    }
    targets
}

fn print_text(run: &ValidationRun) {
    for report in &run.catalog.reports {
        println!("{report}");
    }
    for doc in &run.unparsed {
        println!("FAIL: {}: parse error: {}", doc.document, doc.error);
    }
    let total = run.catalog.total() + run.unparsed.len();
    println!("Catalogs: {}/{} passed", run.catalog.passed(), total);
}
