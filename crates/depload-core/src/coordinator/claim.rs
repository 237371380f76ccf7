//! Sequential claim step, run before any concurrent work starts.

use crate::manifest::FlatArtifact;
use crate::registry::ClaimRegistry;

/// Result of the claim step.
#[derive(Debug, Default)]
pub struct ClaimPlan {
    /// Newly claimed artifacts, one fetch task each, in claim order.
    pub scheduled: Vec<FlatArtifact>,
    /// Artifacts whose key was already claimed (earlier in this list or by an
    /// earlier cycle).
    pub skipped: Vec<FlatArtifact>,
}

/// Stable-sorts `artifacts` by name, then claims them one at a time. On a key
/// collision the first entry in sorted order wins, which fixes the version
/// that gets fetched.
pub fn claim_in_order(registry: &ClaimRegistry, mut artifacts: Vec<FlatArtifact>) -> ClaimPlan {
    artifacts.sort_by(|a, b| a.coordinate.name.cmp(&b.coordinate.name));
    let mut plan = ClaimPlan::default();
    for artifact in artifacts {
        if registry.claim(&artifact.key()) {
            plan.scheduled.push(artifact);
        } else {
            tracing::debug!("dependency already claimed, skipping: {}", artifact.coordinate);
            plan.skipped.push(artifact);
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Coordinate;

    fn artifact(group: &str, name: &str, version: &str) -> FlatArtifact {
        FlatArtifact {
            coordinate: Coordinate::new(group, name, version),
            repository: None,
        }
    }

    #[test]
    fn distinct_artifacts_are_all_scheduled_sorted_by_name() {
        let reg = ClaimRegistry::new();
        let plan = claim_in_order(
            &reg,
            vec![
                artifact("g", "zeta", "1"),
                artifact("g", "alpha", "1"),
                artifact("h", "mid", "1"),
            ],
        );
        let names: Vec<_> = plan.scheduled.iter().map(|a| a.name()).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
        assert!(plan.skipped.is_empty());
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn first_version_in_sorted_order_wins() {
        let reg = ClaimRegistry::new();
        let plan = claim_in_order(
            &reg,
            vec![
                artifact("org.b", "b", "1"),
                artifact("org.x", "lib", "2.0"),
                artifact("org.a", "a", "1"),
                artifact("org.x", "lib", "1.0"),
            ],
        );
        let lib: Vec<_> = plan
            .scheduled
            .iter()
            .filter(|a| a.name() == "lib")
            .collect();
        assert_eq!(lib.len(), 1);
        // Stable sort keeps manifest order among equal names.
        assert_eq!(lib[0].coordinate.version, "2.0");
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].coordinate.version, "1.0");
    }

    #[test]
    fn same_name_different_group_are_distinct() {
        let reg = ClaimRegistry::new();
        let plan = claim_in_order(
            &reg,
            vec![artifact("org.a", "core", "1"), artifact("org.b", "core", "1")],
        );
        assert_eq!(plan.scheduled.len(), 2);
    }

    #[test]
    fn earlier_claims_are_respected() {
        let reg = ClaimRegistry::new();
        reg.claim("g:shared");
        let plan = claim_in_order(&reg, vec![artifact("g", "shared", "1"), artifact("g", "own", "1")]);
        assert_eq!(plan.scheduled.len(), 1);
        assert_eq!(plan.scheduled[0].name(), "own");
        assert_eq!(plan.skipped[0].name(), "shared");
    }
}
