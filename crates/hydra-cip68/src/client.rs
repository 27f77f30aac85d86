//! HTTP client for a Hydra node's snapshot endpoint.

use crate::snapshot::UtxoSnapshot;

use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for querying a Hydra node's confirmed UTxO snapshot.
///
/// One blocking round trip per call; no retry or backoff. Failures are
/// surfaced verbatim so callers can distinguish "query failed" from
/// "nothing matched".
#[derive(Debug, Clone)]
pub struct HydraClient {
    base_url: String,
    timeout: Duration,
}

impl HydraClient {
    /// Creates a client against `base_url` (e.g. `http://127.0.0.1:4001`).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the node's current UTxO snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the request fails, the node answers
    /// with a non-2xx status, or the body is not a valid snapshot.
    pub fn fetch_snapshot(&self) -> Result<UtxoSnapshot, SnapshotError> {
        let url = format!("{}/snapshot/utxo", self.base_url);

        let response = minreq::get(&url)
            .with_timeout(self.timeout.as_secs())
            .send()?;

        let status = response.status_code;
        if !(200..300).contains(&status) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return Err(SnapshotError::Status {
                status: status as u16, // HTTP status codes are always positive and fit in u16
                url,
                message: response.as_str().unwrap_or("").trim().to_owned(),
            });
        }

        let snapshot = response.json::<UtxoSnapshot>()?;

        tracing::debug!(%url, entries = snapshot.len(), "fetched Hydra UTxO snapshot");

        Ok(snapshot)
    }
}

/// Errors that occur when querying the Hydra node.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Returned when minreq encounters a transport or decode error.
    #[error("HTTP error: {0}")]
    Http(#[from] minreq::Error),

    /// Returned when the node answers with a non-2xx status.
    #[error("Snapshot request failed with HTTP {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },
}
