//! File digests used to check cached artifacts against sidecar hashes.
//!
//! Files are read in chunks to keep memory bounded regardless of artifact size.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use crate::error::LoadError;

const BUF_SIZE: usize = 64 * 1024;

/// Digest algorithm of the remote sidecar (and therefore of the local check).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl HashAlgorithm {
    /// Sidecar suffix appended to the artifact URL (e.g. `lib-1.0.jar.md5`).
    pub fn sidecar_suffix(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => ".md5",
            HashAlgorithm::Sha256 => ".sha256",
        }
    }

    /// Lowercase hex digest of the file at `path`.
    pub fn digest_path(self, path: &Path) -> io::Result<String> {
        match self {
            HashAlgorithm::Md5 => digest_file::<Md5>(path),
            HashAlgorithm::Sha256 => digest_file::<Sha256>(path),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => write!(f, "md5"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(LoadError::HashAlgorithmUnavailable(other.to_string())),
        }
    }
}

/// Compute MD5 of a file and return the digest as lowercase hex.
pub fn md5_path(path: &Path) -> io::Result<String> {
    digest_file::<Md5>(path)
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> io::Result<String> {
    digest_file::<Sha256>(path)
}

fn digest_file<D: Digest>(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = D::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Case-insensitive hex comparison (sidecars are published in either case).
pub fn hashes_match(local: &str, remote: &str) -> bool {
    local.trim().eq_ignore_ascii_case(remote.trim())
}
