//! Retry and backoff policy for primary artifact downloads.
//!
//! Classifies fetch failures (timeouts, throttling, connection failures) and
//! decides exponential backoff. Sidecar fetches never go through here: a
//! failed sidecar simply means the cached file is accepted unverified.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
