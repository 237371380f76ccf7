//! Checksum command: print a file digest in sidecar format.

use anyhow::{Context, Result};
use depload_core::checksum::HashAlgorithm;
use std::path::Path;

/// Compute and print the digest of `path` with the named algorithm.
pub fn run_checksum(path: &Path, algorithm: &str) -> Result<()> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    let digest = algorithm
        .digest_path(path)
        .with_context(|| format!("hash {}", path.display()))?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
