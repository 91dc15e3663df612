//! Document retrieval.
//!
//! The parser only ever receives an already-retrieved string. This module is
//! the collaborator that produces that string for callers starting from a
//! URI: `http://` and `https://` go through a blocking HTTP client with an
//! explicit timeout, `file://` URIs and plain paths are read from disk.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to retrieve a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// The request could not be sent or timed out.
    #[error("request to `{uri}` failed: {source}")]
    Request {
        /// The URI that was requested.
        uri: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("`{uri}` answered with HTTP status {status}")]
    Status {
        /// The URI that was requested.
        uri: String,
        /// The status code returned.
        status: u16,
    },
    /// The response body could not be decoded as text.
    #[error("failed to read response body of `{uri}`: {source}")]
    Body {
        /// The URI that was requested.
        uri: String,
        /// Underlying decoding error.
        #[source]
        source: reqwest::Error,
    },
    /// A local file could not be read.
    #[error("failed to read `{}`: {source}", .path.display())]
    File {
        /// The path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns true if `uri` names a remote document.
#[must_use]
pub fn is_remote(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

/// Fetch a document and return its body as text, using [`DEFAULT_TIMEOUT`].
///
/// # Errors
///
/// See [`fetch_text_with_timeout`].
pub fn fetch_text(uri: &str) -> Result<String, FetchError> {
    fetch_text_with_timeout(uri, DEFAULT_TIMEOUT)
}

/// Fetch a document and return its body as text.
///
/// `timeout` bounds the whole HTTP exchange; it is ignored for local files.
///
/// # Errors
///
/// Returns a [`FetchError`] if the HTTP client cannot be created, the request
/// fails or times out, the response has a non-success status, the body cannot
/// be decoded, or a local file cannot be read.
pub fn fetch_text_with_timeout(uri: &str, timeout: Duration) -> Result<String, FetchError> {
    if !is_remote(uri) {
        let path = PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri));
        tracing::debug!(path = %path.display(), "reading local document");
        return fs::read_to_string(&path).map_err(|source| FetchError::File { path, source });
    }

    tracing::debug!(uri, ?timeout, "fetching remote document");
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(FetchError::Client)?;

    let response = client
        .get(uri)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|source| FetchError::Request {
            uri: uri.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            uri: uri.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.text().map_err(|source| FetchError::Body {
        uri: uri.to_string(),
        source,
    })
}
