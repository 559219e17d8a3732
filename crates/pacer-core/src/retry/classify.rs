//! Classify HTTP status and fetch errors into retry policy error kinds.

use std::time::Duration;

use super::error::FetchError;

/// What the pipeline should do with a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Endpoint throttled us; wait this long, do not consume the failure budget.
    RateLimited(Duration),
    /// Response arrived but was unusable; consumes the failure budget.
    Malformed,
    /// Transport, HTTP, or adapter failure; consumes the failure budget.
    Failure,
}

/// Coarse class of an HTTP status, used by adapters before building a `FetchError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Retryable server error (other 5xx).
    ServerError,
    Other,
}

/// Classify an HTTP status code.
pub fn classify_http_status(code: u32) -> StatusClass {
    match code {
        200..=299 => StatusClass::Success,
        429 | 503 => StatusClass::Throttled,
        500..=599 => StatusClass::ServerError,
        _ => StatusClass::Other,
    }
}

/// Classify a fetch error into an `ErrorKind`.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::RateLimited { wait_for } => ErrorKind::RateLimited(*wait_for),
        FetchError::MalformedContent(_) => ErrorKind::Malformed,
        FetchError::Http(_) | FetchError::Transport(_) | FetchError::Other(_) => {
            ErrorKind::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), StatusClass::Throttled);
        assert_eq!(classify_http_status(503), StatusClass::Throttled);
    }

    #[test]
    fn http_5xx_server_error() {
        assert_eq!(classify_http_status(500), StatusClass::ServerError);
        assert_eq!(classify_http_status(502), StatusClass::ServerError);
    }

    #[test]
    fn http_2xx_and_4xx() {
        assert_eq!(classify_http_status(200), StatusClass::Success);
        assert_eq!(classify_http_status(204), StatusClass::Success);
        assert_eq!(classify_http_status(404), StatusClass::Other);
        assert_eq!(classify_http_status(403), StatusClass::Other);
    }

    #[test]
    fn rate_limit_carries_wait() {
        let e = FetchError::RateLimited {
            wait_for: Duration::from_secs(7),
        };
        assert_eq!(classify(&e), ErrorKind::RateLimited(Duration::from_secs(7)));
    }

    #[test]
    fn malformed_and_failures() {
        assert_eq!(classify(&FetchError::malformed("no results")), ErrorKind::Malformed);
        assert_eq!(classify(&FetchError::Http(404)), ErrorKind::Failure);
        assert_eq!(
            classify(&FetchError::Other(anyhow::anyhow!("boom"))),
            ErrorKind::Failure
        );
    }
}
