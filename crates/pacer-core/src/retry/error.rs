//! Fetch error type returned by source adapters.

use std::time::Duration;

/// Error returned by a single source fetch.
///
/// Adapters map transport and payload problems into these variants so the
/// pipeline can decide between waiting, retrying with backoff, or giving up.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The endpoint asked us to slow down. The pipeline sleeps exactly
    /// `wait_for` and does not count the attempt.
    #[error("rate limited, retry after {wait_for:?}")]
    RateLimited { wait_for: Duration },
    /// The request succeeded but the payload lacked the expected structure.
    #[error("malformed content: {0}")]
    MalformedContent(String),
    /// HTTP response had a non-2xx status that is not a throttle signal.
    #[error("HTTP {0}")]
    Http(u32),
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    /// Anything else (task join failure, adapter-specific errors).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FetchError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        FetchError::MalformedContent(msg.into())
    }
}
