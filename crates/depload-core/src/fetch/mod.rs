//! HTTP GET for artifacts and sidecar hashes, via libcurl.
//!
//! All functions block the current thread; call them from `spawn_blocking`
//! when used from async code.

mod error;

pub use error::FetchError;

use std::path::Path;
use std::str;
use std::time::Duration;

use crate::storage::PartFile;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("depload/", env!("CARGO_PKG_VERSION"));

/// Largest sidecar body we accept; real sidecars are a single hex line.
const MAX_SIDECAR_BYTES: usize = 4 * 1024;

/// Per-request curl settings derived from config.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Whole-transfer timeout. `None` leaves it to curl (no limit).
    pub timeout: Option<Duration>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(30),
            timeout: None,
        }
    }
}

/// GETs `url`, passing each body chunk to `sink`. Returns bytes received.
/// A sink error aborts the transfer and is returned as `FetchError::Storage`.
pub fn get_to_sink<F>(url: &str, opts: &HttpOptions, mut sink: F) -> Result<u64, FetchError>
where
    F: FnMut(&[u8]) -> std::io::Result<()>,
{
    let mut received = 0u64;
    let mut sink_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(&opts.user_agent)?;
    easy.connect_timeout(opts.connect_timeout)?;
    if let Some(t) = opts.timeout {
        easy.timeout(t)?;
    }
    // Body of an error page must not end up in the artifact file.
    easy.fail_on_error(true)?;

    let perform = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match sink(data) {
            Ok(()) => {
                received += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                sink_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = sink_error {
        return Err(FetchError::Storage(e));
    }
    if let Err(e) = perform {
        if e.is_http_returned_error() {
            let code = easy.response_code().unwrap_or(0);
            return Err(FetchError::Http(code));
        }
        return Err(FetchError::Curl(e));
    }

    let code = easy.response_code()?;
    // file:// and similar schemes report 0.
    if code != 0 && !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(received)
}

/// Downloads `url` into `dest` through a `.part` file and an atomic rename.
/// On failure the temp file is removed and any existing `dest` is untouched.
pub fn download_file(url: &str, opts: &HttpOptions, dest: &Path) -> Result<u64, FetchError> {
    let mut part = PartFile::create(dest)?;
    let written = get_to_sink(url, opts, |chunk| part.write_chunk(chunk))?;
    part.sync()?;
    part.finalize()?;
    Ok(written)
}

/// Fetches a sidecar hash file and returns the hash token: the first
/// whitespace-separated word of the first non-empty line.
/// Returns `Ok(None)` when the body holds no token.
pub fn fetch_sidecar(url: &str, opts: &HttpOptions) -> Result<Option<String>, FetchError> {
    let mut body = Vec::new();
    get_to_sink(url, opts, |chunk| {
        if body.len() + chunk.len() > MAX_SIDECAR_BYTES {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "sidecar body too large",
            ));
        }
        body.extend_from_slice(chunk);
        Ok(())
    })?;
    Ok(parse_sidecar(&body))
}

/// Extracts the hash token from a sidecar body.
pub(crate) fn parse_sidecar(body: &[u8]) -> Option<String> {
    let text = str::from_utf8(body).ok()?;
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .and_then(|l| l.split_whitespace().next())
        .map(str::to_string)
}
