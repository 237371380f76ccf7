//! CLI command handlers, one file per command.

mod checksum;
mod flatten;
mod load;
mod prune;

pub use checksum::run_checksum;
pub use flatten::run_flatten;
pub use load::{run_load, LoadArgs};
pub use prune::run_prune;

use anyhow::{Context, Result};
use depload_core::manifest::{self, DependencyNode};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Opens and parses a manifest file.
pub(crate) fn read_manifest(path: &Path) -> Result<Vec<DependencyNode>> {
    let file = File::open(path).with_context(|| format!("open manifest {}", path.display()))?;
    let forest = manifest::parse_manifest(BufReader::new(file))
        .with_context(|| format!("parse manifest {}", path.display()))?;
    Ok(forest)
}
