//! Loader that opens artifacts as native shared libraries.
//!
//! Each library stays open for the loader's lifetime so its exported symbols
//! remain callable; look them up through [`NativeLoader::with_library`].

use libloading::Library;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{ensure_regular_file, LoaderBridge, LoaderError};
use crate::manifest::FlatArtifact;

#[derive(Debug, Default)]
pub struct NativeLoader {
    libraries: Mutex<Vec<(PathBuf, Library)>>,
}

impl NativeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of the libraries opened so far, in load order.
    pub fn loaded_paths(&self) -> Vec<PathBuf> {
        self.libraries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Runs `f` with the library loaded from `path`, if any.
    pub fn with_library<T>(&self, path: &Path, f: impl FnOnce(&Library) -> T) -> Option<T> {
        let libs = self.libraries.lock().unwrap_or_else(|e| e.into_inner());
        let canonical = path.canonicalize().ok()?;
        libs.iter().find(|(p, _)| *p == canonical).map(|(_, lib)| f(lib))
    }
}

impl LoaderBridge for NativeLoader {
    fn register(&self, artifact: &FlatArtifact, path: &Path) -> Result<(), LoaderError> {
        ensure_regular_file(path)?;
        let canonical = path.canonicalize().map_err(|e| LoaderError::Rejected {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut libs = self.libraries.lock().unwrap_or_else(|e| e.into_inner());
        if libs.iter().any(|(p, _)| *p == canonical) {
            return Ok(());
        }
        // Opening runs the library's initializers; the artifact came from a
        // repository the manifest author chose to trust.
        let lib = unsafe { Library::new(&canonical) }.map_err(|source| LoaderError::Open {
            path: canonical.clone(),
            source,
        })?;
        tracing::info!(artifact = %artifact.coordinate, path = %canonical.display(), "native library loaded");
        libs.push((canonical, lib));
        Ok(())
    }
}
