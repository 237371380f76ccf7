//! Claim registry: which `group:name` coordinates have been scheduled.
//!
//! A coordinate is claimed the first time it is scheduled and stays claimed
//! after a successful load, so a library is fetched and registered at most
//! once for the registry's lifetime no matter how many manifests name it.
//! A failed load releases the claim so a later cycle can retry.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Set of claimed `group:name` keys behind a single mutex. Only the
/// sequential claim step and failure release touch it.
#[derive(Debug, Default)]
pub struct ClaimRegistry {
    claimed: Mutex<HashSet<String>>,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created empty on first use and never reset.
    pub fn global() -> Arc<ClaimRegistry> {
        static GLOBAL: OnceLock<Arc<ClaimRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ClaimRegistry::new())))
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.claimed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claim `key`. Returns false if it was already claimed.
    pub fn claim(&self, key: &str) -> bool {
        self.lock().insert(key.to_string())
    }

    /// Release a claim after a failed load.
    pub fn release(&self, key: &str) -> bool {
        self.lock().remove(key)
    }

    pub fn is_claimed(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Claimed keys, sorted.
    pub fn snapshot(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().iter().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_first_come() {
        let reg = ClaimRegistry::new();
        assert!(reg.claim("org.x:lib"));
        assert!(!reg.claim("org.x:lib"));
        assert!(reg.is_claimed("org.x:lib"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn release_allows_reclaim() {
        let reg = ClaimRegistry::new();
        assert!(reg.claim("g:n"));
        assert!(reg.release("g:n"));
        assert!(!reg.is_claimed("g:n"));
        assert!(reg.claim("g:n"));
        assert!(!reg.release("g:other"));
    }

    #[test]
    fn snapshot_is_sorted() {
        let reg = ClaimRegistry::new();
        reg.claim("z:z");
        reg.claim("a:a");
        assert_eq!(reg.snapshot(), ["a:a", "z:z"]);
    }

    #[test]
    fn global_is_shared() {
        let a = ClaimRegistry::global();
        let b = ClaimRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
