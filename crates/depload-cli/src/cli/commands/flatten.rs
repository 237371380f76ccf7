//! `depload flatten`: show what a manifest would request.

use anyhow::Result;
use depload_core::manifest;
use std::path::Path;

pub fn run_flatten(path: &Path, sorted: bool) -> Result<()> {
    let forest = super::read_manifest(path)?;
    let mut flat = manifest::flatten(&forest);
    if sorted {
        flat.sort_by(|a, b| a.coordinate.name.cmp(&b.coordinate.name));
    }
    for artifact in flat {
        match &artifact.repository {
            Some(repo) => println!("{}  {}", artifact.coordinate, repo),
            None => println!("{}", artifact.coordinate),
        }
    }
    Ok(())
}
