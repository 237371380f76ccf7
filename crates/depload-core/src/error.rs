//! Errors surfaced by a load cycle.
//!
//! Every variant is fatal for the cycle: the host gets either a full load
//! report or one of these. The only graceful outcomes (already-claimed skip,
//! unverified cache hit) are not errors.

use crate::fetch::FetchError;
use crate::loader::LoaderError;
use crate::manifest::Coordinate;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Manifest stream was not a JSON array of dependency trees.
    #[error("invalid dependency manifest: {0}")]
    ManifestParse(String),

    /// Requested digest algorithm is not supported.
    #[error("hash algorithm unavailable: {0}")]
    HashAlgorithmUnavailable(String),

    /// Primary artifact download failed.
    #[error("failed to download {coordinate}: {source}")]
    Fetch {
        coordinate: Coordinate,
        #[source]
        source: FetchError,
    },

    /// Local cache I/O failed (directory creation, hashing).
    #[error("cache error for {coordinate}: {source}")]
    Cache {
        coordinate: Coordinate,
        #[source]
        source: std::io::Error,
    },

    /// The loader bridge rejected the artifact.
    #[error("failed to register {coordinate} with the loader: {source}")]
    LoaderRegistration {
        coordinate: Coordinate,
        #[source]
        source: LoaderError,
    },

    /// A fetch task panicked or was cancelled by the runtime.
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl LoadError {
    /// Coordinate the failure is attributed to, when there is one.
    pub fn coordinate(&self) -> Option<&Coordinate> {
        match self {
            LoadError::Fetch { coordinate, .. }
            | LoadError::Cache { coordinate, .. }
            | LoadError::LoaderRegistration { coordinate, .. } => Some(coordinate),
            LoadError::ManifestParse(_)
            | LoadError::HashAlgorithmUnavailable(_)
            | LoadError::Task(_) => None,
        }
    }
}
