//! Retry and backoff policy.
//!
//! This module encapsulates fetch error classification (rate limiting,
//! malformed content, generic failures) and linear backoff decisions so the
//! pipeline's retry loop can branch on an exhaustive `ErrorKind`.

mod classify;
mod error;
mod policy;

pub use classify::{classify, classify_http_status, ErrorKind, StatusClass};
pub use error::FetchError;
pub use policy::{BackoffPolicy, RetryDecision};
