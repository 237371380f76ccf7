//! Loader bridge: hands a cached artifact to the host's code-loading facility.
//!
//! The coordinator calls [`LoaderBridge::register`] from a single registration
//! task, one artifact at a time, so implementations never see concurrent
//! calls from one load cycle. A rejected artifact fails the whole cycle.

mod classpath;
mod native;

pub use classpath::ClasspathLoader;
pub use native::NativeLoader;

use std::path::{Path, PathBuf};

use crate::manifest::FlatArtifact;

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The facility refused the file.
    #[error("{} rejected: {reason}", path.display())]
    Rejected { path: PathBuf, reason: String },

    /// The loading mechanism is not usable in this host.
    #[error("loader unavailable: {0}")]
    Unavailable(String),

    /// The shared library could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
}

/// Registration contract with the host's dynamic loading facility.
pub trait LoaderBridge: Send + Sync {
    /// Make the artifact at `path` available to the running process.
    fn register(&self, artifact: &FlatArtifact, path: &Path) -> Result<(), LoaderError>;
}

/// Rejects anything that is not an existing regular file.
pub(crate) fn ensure_regular_file(path: &Path) -> Result<(), LoaderError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(LoaderError::Rejected {
            path: path.to_path_buf(),
            reason: "not a regular file".to_string(),
        }),
        Err(e) => Err(LoaderError::Rejected {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}
