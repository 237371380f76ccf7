//! Manifest model: dependency coordinates, trees, and flattened artifacts.
//!
//! A manifest is a forest of [`DependencyNode`]s produced by a build-time
//! resolver. It is read leniently (malformed entries are skipped) and can be
//! written back in the same shape.

mod flatten;
mod parse;
mod prune;

pub use flatten::flatten;
pub use parse::{parse_manifest, to_json, write_manifest};
pub use prune::prune_ignored;

use std::fmt;

/// Artifact coordinate. `group:name` is the identity key; `version` only
/// selects which file is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Identity key used for dedup, e.g. `org.x:lib`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// One resolved artifact and its compile-scope dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub coordinate: Coordinate,
    /// Repository base URL the artifact was found in. `None` means the
    /// default repository is used.
    pub repository: Option<String>,
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            repository: None,
            children: Vec::new(),
        }
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_children(mut self, children: Vec<DependencyNode>) -> Self {
        self.children = children;
        self
    }
}

/// A node from the flattened forest: same coordinate, no children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatArtifact {
    pub coordinate: Coordinate,
    pub repository: Option<String>,
}

impl FlatArtifact {
    pub fn key(&self) -> String {
        self.coordinate.key()
    }

    pub fn name(&self) -> &str {
        &self.coordinate.name
    }
}

impl From<&DependencyNode> for FlatArtifact {
    fn from(node: &DependencyNode) -> Self {
        Self {
            coordinate: node.coordinate.clone(),
            repository: node.repository.clone(),
        }
    }
}
