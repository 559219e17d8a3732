//! Blocking HTTP GET via libcurl.
//!
//! Collects the status, the final response's headers, and the body. Runs in
//! the current thread; call from `spawn_blocking` when used from async code.

mod parse;

use std::collections::BTreeMap;
use std::str;
use std::time::Duration;

pub use parse::{parse_headers, ResponseHeaders};

/// Response of a GET: status, headers of the final hop, raw body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

/// Performs a GET request, following redirects.
///
/// Only curl-level failures (DNS, connect, timeout) are errors; any HTTP
/// status is returned for the caller to classify. A body larger than
/// `max_body_bytes` aborts the transfer with a curl write error.
pub fn get(
    url: &str,
    custom_headers: &BTreeMap<String, String>,
    timeout: Duration,
    max_body_bytes: usize,
) -> Result<HttpResponse, curl::Error> {
    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15).min(timeout))?;
    easy.timeout(timeout)?;
    easy.accept_encoding("")?;

    // Build curl list for custom headers (e.g. "Name: value").
    if !custom_headers.is_empty() {
        let mut list = curl::easy::List::new();
        for (k, v) in custom_headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        easy.http_headers(list)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            if body.len().saturating_add(data.len()) > max_body_bytes {
                // Short write makes curl abort with CURLE_WRITE_ERROR.
                return Ok(0);
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(HttpResponse {
        status,
        headers: parse_headers(&header_lines),
        body,
    })
}
