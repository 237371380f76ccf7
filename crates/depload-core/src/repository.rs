//! Remote repository layout.
//!
//! Artifacts live at `<base>/<group-with-slashes>/<name>/<version>/<name>-<version>.<ext>`,
//! with hash sidecars next to them. The cache mirrors the same segments.

use url::Url;

use crate::checksum::HashAlgorithm;
use crate::fetch::FetchError;
use crate::manifest::Coordinate;

/// Repository used when a node carries no `repo`.
pub const DEFAULT_REPOSITORY: &str = "https://repo.maven.apache.org/maven2/";

/// Default artifact file extension.
pub const DEFAULT_EXTENSION: &str = "jar";

/// `<name>-<version>.<ext>`
pub fn file_name(coord: &Coordinate, extension: &str) -> String {
    format!("{}-{}.{}", coord.name, coord.version, extension)
}

/// Directory segments for a coordinate: group split on `.`, then name and version.
/// Empty group segments are dropped so an empty group cannot produce `//`.
pub fn path_segments(coord: &Coordinate) -> Vec<&str> {
    coord
        .group
        .split('.')
        .filter(|s| !s.is_empty())
        .chain([coord.name.as_str(), coord.version.as_str()])
        .collect()
}

/// Relative layout path, e.g. `org/x/lib/1.0/lib-1.0.jar`.
pub fn artifact_path(coord: &Coordinate, extension: &str) -> String {
    let mut path = path_segments(coord).join("/");
    path.push('/');
    path.push_str(&file_name(coord, extension));
    path
}

/// Picks the repository base: the node's own `repo` unless it is blank,
/// otherwise `default`. Always ends in `/` so joining keeps the base path.
pub fn resolve_base(repository: Option<&str>, default: &str) -> String {
    let base = repository
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(default);
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

/// Full artifact URL under `base`.
pub fn artifact_url(base: &str, coord: &Coordinate, extension: &str) -> Result<Url, FetchError> {
    let base = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;
    base.join(&artifact_path(coord, extension))
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))
}

/// Sidecar hash URL for an artifact URL (`<artifact>.md5` or `.sha256`).
pub fn sidecar_url(artifact: &Url, algorithm: HashAlgorithm) -> String {
    format!("{}{}", artifact, algorithm.sidecar_suffix())
}
