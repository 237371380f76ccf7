pub mod config;
pub mod logging;

pub mod cache;
pub mod checksum;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod repository;
pub mod retry;
pub mod storage;

pub use cache::{ArtifactCache, CacheOutcome};
pub use coordinator::{Coordinator, LoadReport};
pub use error::LoadError;
pub use loader::{ClasspathLoader, LoaderBridge, LoaderError, NativeLoader};
pub use manifest::{Coordinate, DependencyNode, FlatArtifact};
pub use registry::ClaimRegistry;
