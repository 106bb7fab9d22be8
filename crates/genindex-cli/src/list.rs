//! # List Subcommand
//!
//! Prints catalog entries, the way the host platform discovers generators:
//! by catalog, ORM key and supported database.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use genindex_core::{GeneratorDescriptor, GeneratorIndex, IndexKind};

use crate::config::Config;
use crate::{KindArg, OutputFormat};

/// Arguments for the `genindex list` subcommand.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only list one catalog.
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Only list generators for this ORM key.
    #[arg(long)]
    pub orm: Option<String>,

    /// Only list generators supporting this database.
    #[arg(long)]
    pub database: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// One listed generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedGenerator<'a> {
    /// Catalog the entry comes from.
    pub kind: IndexKind,
    /// The catalog record.
    #[serde(flatten)]
    pub generator: &'a GeneratorDescriptor,
}

/// Execute the list subcommand. Always returns exit code 0 on success.
pub fn run_list(args: &ListArgs, repo_root: &Path, config: &Config) -> Result<u8> {
    let kinds: Vec<IndexKind> = match args.kind {
        Some(k) => vec![k.into()],
        None => IndexKind::ALL.to_vec(),
    };

    let mut catalogs = Vec::new();
    for kind in kinds {
        let path = config.index_path(kind, repo_root);
        let index = GeneratorIndex::load(&path)
            .with_context(|| format!("failed to load {kind} index"))?;
        catalogs.push((kind, index));
    }

    let listed = select(&catalogs, args);
    match args.format {
        OutputFormat::Text => print_text(&listed),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&listed).context("failed to serialize listing")?
        ),
    }
    Ok(0)
}

/// Apply the ORM and database filters across catalogs, keeping order.
pub fn select<'a>(
    catalogs: &'a [(IndexKind, GeneratorIndex)],
    args: &'a ListArgs,
) -> Vec<ListedGenerator<'a>> {
    let mut out = Vec::new();
    for (kind, index) in catalogs {
        let matching: Vec<&GeneratorDescriptor> = match (&args.orm, &args.database) {
            (Some(orm), database) => index
                .by_orm(orm)
                .filter(|g| database.as_deref().map_or(true, |d| g.supports(d)))
                .collect(),
            (None, Some(database)) => index.supporting(database).collect(),
            (None, None) => index.iter().collect(),
        };
        tracing::debug!(
            kind = %kind,
            orms = index.orms().len(),
            matched = matching.len(),
            "filtered catalog"
        );
        out.extend(matching.into_iter().map(|generator| ListedGenerator {
            kind: *kind,
            generator,
        }));
    }
    out
}

fn print_text(listed: &[ListedGenerator<'_>]) {
    if listed.is_empty() {
        println!("No generators match.");
        return;
    }
    for item in listed {
        let g = item.generator;
        println!(
            "{:<9} {:<10} {} {} [{}] {}",
            item.kind.as_str(),
            g.orm,
            g.name,
            g.version,
            g.databases.join(", "),
            g.path
        );
    }
    println!("{} generator(s)", listed.len());
}
