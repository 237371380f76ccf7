//! Artifact cache and downloader.
//!
//! Cache layout: `<root>/<group-path>/<name>/<version>/<name>-<version>.<ext>`.
//! There is no metadata file; a cached artifact is checked against the remote
//! hash sidecar each time it is claimed.

mod verify;

pub use verify::{check, Freshness};

use std::path::{Path, PathBuf};
use url::Url;

use crate::checksum::{hashes_match, HashAlgorithm};
use crate::config::DeploadConfig;
use crate::error::LoadError;
use crate::fetch::{self, FetchError, HttpOptions};
use crate::manifest::{Coordinate, FlatArtifact};
use crate::repository::{self, DEFAULT_EXTENSION, DEFAULT_REPOSITORY};
use crate::retry::{run_with_retry, RetryPolicy};

/// How a cached artifact was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Not cached before; downloaded.
    Downloaded(PathBuf),
    /// Cached copy differed from the sidecar; downloaded again.
    Redownloaded(PathBuf),
    /// Cached copy matched the sidecar.
    Verified(PathBuf),
    /// Cached copy kept without a sidecar check.
    Unverified(PathBuf),
}

impl CacheOutcome {
    pub fn path(&self) -> &Path {
        match self {
            CacheOutcome::Downloaded(p)
            | CacheOutcome::Redownloaded(p)
            | CacheOutcome::Verified(p)
            | CacheOutcome::Unverified(p) => p,
        }
    }

    /// True when a GET for the artifact itself was issued.
    pub fn downloaded(&self) -> bool {
        matches!(
            self,
            CacheOutcome::Downloaded(_) | CacheOutcome::Redownloaded(_)
        )
    }
}

/// Local artifact cache backed by remote repositories.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    root: PathBuf,
    default_repository: String,
    extension: String,
    algorithm: HashAlgorithm,
    http: HttpOptions,
    retry: RetryPolicy,
}

impl ArtifactCache {
    /// Cache at `root` with the default repository, `.jar` artifacts and MD5 sidecars.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_repository: DEFAULT_REPOSITORY.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            algorithm: HashAlgorithm::Md5,
            http: HttpOptions::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config(cfg: &DeploadConfig) -> Self {
        Self {
            root: cfg.cache_dir.clone(),
            default_repository: cfg.default_repository.clone(),
            extension: cfg.artifact_extension.clone(),
            algorithm: cfg.sidecar_algorithm,
            http: cfg.http_options(),
            retry: cfg
                .retry
                .as_ref()
                .map(RetryPolicy::from)
                .unwrap_or_default(),
        }
    }

    pub fn with_default_repository(mut self, repo: impl Into<String>) -> Self {
        self.default_repository = repo.into();
        self
    }

    pub fn with_http_options(mut self, http: HttpOptions) -> Self {
        self.http = http;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<group-path>/<name>/<version>`
    pub fn artifact_dir(&self, coord: &Coordinate) -> PathBuf {
        repository::path_segments(coord)
            .into_iter()
            .fold(self.root.clone(), |dir, seg| dir.join(seg))
    }

    /// Cached file path for a coordinate.
    pub fn artifact_file(&self, coord: &Coordinate) -> PathBuf {
        self.artifact_dir(coord)
            .join(repository::file_name(coord, &self.extension))
    }

    /// Remote URL: the artifact's own repository, else the default one.
    pub fn artifact_url(&self, artifact: &FlatArtifact) -> Result<Url, FetchError> {
        let base =
            repository::resolve_base(artifact.repository.as_deref(), &self.default_repository);
        repository::artifact_url(&base, &artifact.coordinate, &self.extension)
    }

    /// Makes sure a current copy of `artifact` is on disk and returns where it is.
    ///
    /// Absent file: download. Present file: compare its digest with the remote
    /// sidecar and re-download on mismatch; keep it unverified if the sidecar
    /// cannot be fetched. Blocking; run from `spawn_blocking`.
    pub fn fetch(&self, artifact: &FlatArtifact) -> Result<CacheOutcome, LoadError> {
        let coord = &artifact.coordinate;
        let cache_err = |source| LoadError::Cache {
            coordinate: coord.clone(),
            source,
        };
        let fetch_err = |source| LoadError::Fetch {
            coordinate: coord.clone(),
            source,
        };

        let dir = self.artifact_dir(coord);
        std::fs::create_dir_all(&dir).map_err(cache_err)?;
        let file = self.artifact_file(coord);
        let url = self.artifact_url(artifact).map_err(fetch_err)?;

        if !file.exists() {
            tracing::info!("downloading dependency: {}", coord);
            self.download(&url, &file).map_err(fetch_err)?;
            return Ok(CacheOutcome::Downloaded(file));
        }

        tracing::debug!("checking cached dependency: {}", coord);
        let local = self.algorithm.digest_path(&file).map_err(cache_err)?;
        let sidecar_url = repository::sidecar_url(&url, self.algorithm);
        let sidecar = fetch::fetch_sidecar(&sidecar_url, &self.http);

        match check(&local, sidecar) {
            Freshness::Fresh => Ok(CacheOutcome::Verified(file)),
            Freshness::Unverified { reason } => {
                tracing::warn!("using unverified cached dependency {}: {}", coord, reason);
                Ok(CacheOutcome::Unverified(file))
            }
            Freshness::Stale { expected } => {
                tracing::info!(
                    local = %local,
                    expected = %expected,
                    "redownloading dependency: {}",
                    coord
                );
                self.download(&url, &file).map_err(fetch_err)?;
                let fresh = self.algorithm.digest_path(&file).map_err(cache_err)?;
                if !hashes_match(&fresh, &expected) {
                    tracing::warn!(
                        got = %fresh,
                        expected = %expected,
                        "redownloaded {} still differs from its sidecar",
                        coord
                    );
                }
                Ok(CacheOutcome::Redownloaded(file))
            }
        }
    }

    fn download(&self, url: &Url, file: &Path) -> Result<u64, FetchError> {
        let bytes = run_with_retry(&self.retry, || {
            fetch::download_file(url.as_str(), &self.http, file)
        })?;
        tracing::debug!(bytes, url = %url, "download complete");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_file_mirrors_repository_layout() {
        let cache = ArtifactCache::new("cache");
        let coord = Coordinate::new("org.x", "lib", "1.0");
        assert_eq!(
            cache.artifact_file(&coord),
            Path::new("cache/org/x/lib/1.0/lib-1.0.jar")
        );
        assert_eq!(cache.artifact_dir(&coord), Path::new("cache/org/x/lib/1.0"));
    }

    #[test]
    fn artifact_url_prefers_node_repository() {
        let cache = ArtifactCache::new("cache").with_default_repository("https://default.example/m2");
        let mut artifact = FlatArtifact {
            coordinate: Coordinate::new("org.x", "lib", "1.0"),
            repository: None,
        };
        assert_eq!(
            cache.artifact_url(&artifact).unwrap().as_str(),
            "https://default.example/m2/org/x/lib/1.0/lib-1.0.jar"
        );
        artifact.repository = Some("https://own.example/repo/".into());
        assert_eq!(
            cache.artifact_url(&artifact).unwrap().as_str(),
            "https://own.example/repo/org/x/lib/1.0/lib-1.0.jar"
        );
    }

    #[test]
    fn from_config_uses_config_values() {
        let mut cfg = DeploadConfig::default();
        cfg.cache_dir = PathBuf::from("/tmp/libs");
        cfg.artifact_extension = "so".into();
        let cache = ArtifactCache::from_config(&cfg);
        let coord = Coordinate::new("g", "n", "1");
        assert_eq!(cache.artifact_file(&coord), Path::new("/tmp/libs/g/n/1/n-1.so"));
        assert_eq!(cache.retry, RetryPolicy::default());
    }

    #[test]
    fn outcome_helpers() {
        let p = PathBuf::from("x.jar");
        assert!(CacheOutcome::Downloaded(p.clone()).downloaded());
        assert!(CacheOutcome::Redownloaded(p.clone()).downloaded());
        assert!(!CacheOutcome::Verified(p.clone()).downloaded());
        assert_eq!(CacheOutcome::Unverified(p.clone()).path(), p.as_path());
    }
}
