//! Loader that records artifact paths in registration order.
//!
//! Hosts that start an external runtime (or re-exec themselves) use the
//! collected paths as a search path, e.g. a JVM `-cp` argument.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{ensure_regular_file, LoaderBridge, LoaderError};
use crate::manifest::FlatArtifact;

#[derive(Debug, Default)]
pub struct ClasspathLoader {
    paths: Mutex<Vec<PathBuf>>,
}

impl ClasspathLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered paths in registration order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Registered paths joined with the platform separator (`:` on Unix).
    pub fn classpath(&self) -> Result<OsString, std::env::JoinPathsError> {
        std::env::join_paths(self.paths())
    }
}

impl LoaderBridge for ClasspathLoader {
    fn register(&self, artifact: &FlatArtifact, path: &Path) -> Result<(), LoaderError> {
        ensure_regular_file(path)?;
        let mut paths = self.paths.lock().unwrap_or_else(|e| e.into_inner());
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_path_buf());
        }
        tracing::debug!(artifact = %artifact.coordinate, path = %path.display(), "added to classpath");
        Ok(())
    }
}
