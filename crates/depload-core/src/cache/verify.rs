//! Freshness decision for an artifact already in the cache.

use crate::checksum::hashes_match;
use crate::fetch::FetchError;

/// What to do with a cached file after comparing it to the remote sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Sidecar matches the local hash; keep the file as is.
    Fresh,
    /// Sidecar differs; re-download over the cached file.
    Stale { expected: String },
    /// No usable sidecar; the cached file is trusted unverified.
    Unverified { reason: String },
}

/// Compares the local digest with the sidecar fetch result. A failed or empty
/// sidecar never forces a re-download.
pub fn check(local_hash: &str, sidecar: Result<Option<String>, FetchError>) -> Freshness {
    match sidecar {
        Ok(Some(remote)) if hashes_match(local_hash, &remote) => Freshness::Fresh,
        Ok(Some(remote)) => Freshness::Stale { expected: remote },
        Ok(None) => Freshness::Unverified {
            reason: "sidecar is empty".to_string(),
        },
        Err(e) => Freshness::Unverified {
            reason: format!("sidecar unavailable: {}", e),
        },
    }
}
