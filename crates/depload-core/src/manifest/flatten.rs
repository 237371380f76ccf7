//! Forest to list: pre-order, duplicates preserved.

use super::{DependencyNode, FlatArtifact};

/// Flattens a forest in pre-order: each node is emitted before its children,
/// and a child's whole subtree is expanded before its next sibling.
/// Duplicates across branches are kept; dedup happens at claim time.
pub fn flatten(forest: &[DependencyNode]) -> Vec<FlatArtifact> {
    let mut out = Vec::new();
    for root in forest {
        push_subtree(root, &mut out);
    }
    out
}

fn push_subtree(node: &DependencyNode, out: &mut Vec<FlatArtifact>) {
    out.push(FlatArtifact::from(node));
    for child in &node.children {
        push_subtree(child, out);
    }
}
