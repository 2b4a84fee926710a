//! Single-source download: one URL in, one outcome out.
//!
//! A fetch either yields the response body or a [`FetchError`] telling
//! the caller exactly where it went wrong. Errors here are per-source
//! data, never run-level failures; the pool records them and moves on.
//! No retries — retry policy belongs to the operator, not this layer.

use reqwest::{Client, StatusCode};
use tracing::debug;

use listforge_shared::{FetchConfig, ListforgeError};

/// User-Agent string for download requests.
const USER_AGENT: &str = concat!("listforge/", env!("CARGO_PKG_VERSION"));

/// Why a single source failed to download.
///
/// One variant per failure point, in request order: building the
/// request, sending it, the response status, reading the body, and the
/// degenerate empty-body response.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The URL could not be turned into a request.
    #[error("invalid source URL: {0}")]
    RequestConstruction(String),

    /// Connection, send, or timeout failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("bad status: {0}")]
    BadStatus(StatusCode),

    /// The body could not be read to completion.
    #[error("failed to read body: {0}")]
    BodyRead(String),

    /// A success status carrying zero bytes.
    #[error("downloaded file is empty")]
    EmptyBody,
}

/// The result of processing one work item.
///
/// `index` is the source's position in the original list; the pool
/// returns outcomes in completion order, so ordering is reconstructed
/// from this field downstream.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Position of the URL in the submitted source list.
    pub index: usize,
    /// The source URL this outcome belongs to.
    pub url: String,
    /// Downloaded bytes, or why the download failed.
    pub result: Result<Vec<u8>, FetchError>,
}

impl FetchOutcome {
    /// True when the source downloaded successfully.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Build the shared HTTP client used for all downloads in a run.
pub fn build_client(config: &FetchConfig) -> listforge_shared::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(config.timeout)
        .build()
        .map_err(|e| ListforgeError::Network(format!("failed to build HTTP client: {e}")))
}

/// Download one source to memory.
///
/// The per-request timeout comes from the client; a timed-out request
/// surfaces as [`FetchError::Transport`] like any other send failure.
pub async fn fetch_source(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let parsed =
        reqwest::Url::parse(url).map_err(|e| FetchError::RequestConstruction(e.to_string()))?;

    debug!(%url, "downloading source");

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::BadStatus(status));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::BodyRead(e.to_string()))?;

    if body.is_empty() {
        return Err(FetchError::EmptyBody);
    }

    Ok(body.to_vec())
}

/// A client with a short timeout, for tests that exercise slow servers.
#[cfg(test)]
pub(crate) fn test_client(timeout: std::time::Duration) -> Client {
    build_client(&FetchConfig {
        concurrency: 4,
        timeout,
    })
    .expect("build test client")
}
