//! Ignore-list pruning.
//!
//! Removes every node whose `group:name` is ignored, together with its whole
//! subtree. This is the filter a manifest generator applies before writing the
//! document; it is exposed here so manifests can be trimmed after the fact.

use std::collections::HashSet;

use super::DependencyNode;

/// Returns a copy of `forest` without ignored coordinates or their subtrees.
/// `ignored` holds `group:name` keys.
pub fn prune_ignored(forest: &[DependencyNode], ignored: &HashSet<String>) -> Vec<DependencyNode> {
    forest
        .iter()
        .filter(|node| !ignored.contains(&node.coordinate.key()))
        .map(|node| DependencyNode {
            coordinate: node.coordinate.clone(),
            repository: node.repository.clone(),
            children: prune_ignored(&node.children, ignored),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{flatten, Coordinate};

    #[test]
    fn ignored_subtree_never_reaches_flattened_list() {
        let forest = vec![DependencyNode::new(Coordinate::new("org.a", "app", "1"))
            .with_children(vec![
                DependencyNode::new(Coordinate::new("org.skip", "big", "1")).with_children(
                    vec![DependencyNode::new(Coordinate::new("org.deep", "inner", "1"))],
                ),
                DependencyNode::new(Coordinate::new("org.keep", "small", "1")),
            ])];
        let ignored: HashSet<String> = ["org.skip:big".to_string()].into_iter().collect();

        let pruned = prune_ignored(&forest, &ignored);
        let names: Vec<_> = flatten(&pruned)
            .into_iter()
            .map(|a| a.coordinate.name)
            .collect();
        assert_eq!(names, ["app", "small"]);
    }

    #[test]
    fn ignoring_a_root_drops_the_whole_tree() {
        let forest = vec![
            DependencyNode::new(Coordinate::new("g", "root", "1"))
                .with_children(vec![DependencyNode::new(Coordinate::new("g", "c", "1"))]),
            DependencyNode::new(Coordinate::new("g", "other", "1")),
        ];
        let ignored: HashSet<String> = ["g:root".to_string()].into_iter().collect();
        let pruned = prune_ignored(&forest, &ignored);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].coordinate.name, "other");
    }

    #[test]
    fn version_does_not_affect_matching() {
        let forest = vec![DependencyNode::new(Coordinate::new("g", "n", "9.9"))];
        let ignored: HashSet<String> = ["g:n".to_string()].into_iter().collect();
        assert!(prune_ignored(&forest, &ignored).is_empty());
    }
}
