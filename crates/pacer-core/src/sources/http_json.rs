//! Generic JSON-over-HTTP adapter.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::http::{self, HttpResponse};
use crate::pipeline::JsonRecord;
use crate::retry::{classify_http_status, FetchError, StatusClass};

use super::SourceAdapter;

/// Fetches one URL and extracts a JSON array of records.
#[derive(Debug, Clone)]
pub struct HttpJsonSource {
    name: String,
    url: String,
    headers: BTreeMap<String, String>,
    items_pointer: String,
    timeout: Duration,
    overload_delay: Duration,
    reject_empty: bool,
    max_body_bytes: usize,
}

/// Default cap on a buffered response body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

impl HttpJsonSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            headers: BTreeMap::new(),
            items_pointer: String::new(),
            timeout: Duration::from_secs(30),
            overload_delay: Duration::from_secs(60),
            reject_empty: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// JSON pointer to the record array; empty selects the whole document.
    pub fn with_items_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.items_pointer = pointer.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait used on 429/503 when the response carries no usable `Retry-After`.
    pub fn with_overload_delay(mut self, delay: Duration) -> Self {
        self.overload_delay = delay;
        self
    }

    /// Responses larger than this fail as transport errors.
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    pub fn reject_empty(mut self, reject: bool) -> Self {
        self.reject_empty = reject;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Map a completed response to records or a classified error.
    fn interpret(&self, resp: HttpResponse) -> Result<Vec<JsonRecord>, FetchError> {
        match classify_http_status(resp.status) {
            StatusClass::Success => {}
            StatusClass::Throttled => {
                let wait_for = resp.headers.retry_after().unwrap_or(self.overload_delay);
                return Err(FetchError::RateLimited { wait_for });
            }
            StatusClass::ServerError | StatusClass::Other => {
                return Err(FetchError::Http(resp.status));
            }
        }

        let doc: Value = serde_json::from_slice(&resp.body)
            .map_err(|e| FetchError::malformed(format!("invalid JSON: {}", e)))?;
        let items = match doc.pointer(&self.items_pointer) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(FetchError::malformed(format!(
                    "{:?} is not an array",
                    self.items_pointer
                )))
            }
            None => {
                return Err(FetchError::malformed(format!(
                    "{:?} not found",
                    self.items_pointer
                )))
            }
        };
        if items.is_empty() && self.reject_empty {
            return Err(FetchError::malformed("no records in response"));
        }

        Ok(items
            .iter()
            .map(|value| JsonRecord {
                kind: self.name.clone(),
                value: value.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for HttpJsonSource {
    type Record = JsonRecord;

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<JsonRecord>, FetchError> {
        let url = self.url.clone();
        let headers = self.headers.clone();
        let timeout = self.timeout;
        let max_body = self.max_body_bytes;
        tracing::debug!(source = %self.name, %url, "GET");
        let resp = tokio::task::spawn_blocking(move || http::get(&url, &headers, timeout, max_body))
            .await
            .map_err(|e| FetchError::Other(anyhow::anyhow!("fetch task failed: {}", e)))??;
        tracing::debug!(source = %self.name, status = resp.status, bytes = resp.body.len(), "response");
        self.interpret(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_headers;

    fn response(status: u32, headers: &[&str], body: &str) -> HttpResponse {
        let mut lines = vec![format!("HTTP/1.1 {} X", status)];
        lines.extend(headers.iter().map(|h| h.to_string()));
        HttpResponse {
            status,
            headers: parse_headers(&lines),
            body: body.as_bytes().to_vec(),
        }
    }

    fn source() -> HttpJsonSource {
        HttpJsonSource::new("listings", "http://127.0.0.1/")
            .with_items_pointer("/results")
            .with_overload_delay(Duration::from_secs(45))
    }

    #[test]
    fn extracts_records_at_pointer() {
        let records = source()
            .interpret(response(200, &[], r#"{"results":[{"id":1},{"id":2}]}"#))
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, "listings");
        assert_eq!(records[1].value["id"], 2);
    }

    #[test]
    fn empty_pointer_takes_whole_document() {
        let src = HttpJsonSource::new("all", "http://127.0.0.1/");
        let records = src.interpret(response(200, &[], "[1,2,3]")).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn throttle_uses_retry_after_or_overload_delay() {
        match source().interpret(response(429, &["Retry-After: 7"], "")) {
            Err(FetchError::RateLimited { wait_for }) => assert_eq!(wait_for, Duration::from_secs(7)),
            other => panic!("unexpected: {:?}", other),
        }
        match source().interpret(response(503, &[], "")) {
            Err(FetchError::RateLimited { wait_for }) => assert_eq!(wait_for, Duration::from_secs(45)),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn other_statuses_are_http_errors() {
        assert!(matches!(
            source().interpret(response(500, &[], "")),
            Err(FetchError::Http(500))
        ));
        assert!(matches!(
            source().interpret(response(404, &[], "")),
            Err(FetchError::Http(404))
        ));
    }

    #[test]
    fn malformed_payloads() {
        for body in ["not json", r#"{"other":[]}"#, r#"{"results":{"a":1}}"#] {
            assert!(
                matches!(
                    source().interpret(response(200, &[], body)),
                    Err(FetchError::MalformedContent(_))
                ),
                "body {:?}",
                body
            );
        }
    }

    #[test]
    fn empty_array_rejected_only_when_configured() {
        let body = r#"{"results":[]}"#;
        assert!(source().interpret(response(200, &[], body)).unwrap().is_empty());
        assert!(matches!(
            source().reject_empty(true).interpret(response(200, &[], body)),
            Err(FetchError::MalformedContent(_))
        ));
    }
}
