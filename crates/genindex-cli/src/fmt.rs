//! # Fmt Subcommand
//!
//! Rewrites both catalogs in the canonical layout produced by
//! [`GeneratorIndex::to_json_string`], or with `--check` only reports the
//! files whose bytes differ. Records and fields are never reordered.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use genindex_core::{GeneratorIndex, IndexKind};

use crate::config::Config;

/// Arguments for the `genindex fmt` subcommand.
#[derive(Args, Debug, Default)]
pub struct FmtArgs {
    /// Report catalogs that are not canonical instead of rewriting them.
    #[arg(long)]
    pub check: bool,
}

/// Execute the fmt subcommand.
///
/// Every catalog is parsed before any is written, so a malformed catalog
/// leaves the others untouched. Returns exit code 1 when `--check` finds a
/// non-canonical catalog.
pub fn run_fmt(args: &FmtArgs, repo_root: &Path, config: &Config) -> Result<u8> {
    let mut pending = Vec::new();

    for kind in IndexKind::ALL {
        let path = config.index_path(kind, repo_root);
        let label = crate::display_label(&path, repo_root);
        let on_disk = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {label}"))?;
        let index = GeneratorIndex::from_json_str(&on_disk, &label)
            .with_context(|| format!("cannot format {kind} index"))?;

        if index.to_json_string()? == on_disk {
            tracing::debug!(document = %label, "already canonical");
        } else {
            pending.push((path, label, index));
        }
    }

    if args.check {
        for (_, label, _) in &pending {
            println!("DIFF: {label}");
        }
        return Ok(if pending.is_empty() { 0 } else { 1 });
    }

    for (path, label, index) in &pending {
        index.save(path)?;
        println!("FORMATTED: {label}");
    }
    Ok(0)
}
