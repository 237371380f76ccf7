//! `depload prune`: drop ignored coordinates (and their subtrees) from a manifest.

use anyhow::{Context, Result};
use depload_core::manifest;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

pub fn run_prune(path: &Path, ignore: &[String]) -> Result<()> {
    let forest = super::read_manifest(path)?;
    let ignored: HashSet<String> = ignore.iter().map(|s| s.trim().to_string()).collect();
    let pruned = manifest::prune_ignored(&forest, &ignored);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    manifest::write_manifest(&mut out, &pruned).context("write manifest")?;
    writeln!(out)?;
    Ok(())
}
