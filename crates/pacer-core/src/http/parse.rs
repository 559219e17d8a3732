//! Parse HTTP response header lines.

use std::time::Duration;

/// Headers of the final response (earlier redirect hops are discarded).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, String)>,
}

impl ResponseHeaders {
    /// First value for `name`, case-insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `Retry-After` in delta-seconds form. HTTP-date values and zero are ignored.
    pub fn retry_after(&self) -> Option<Duration> {
        let secs: u64 = self.get("retry-after")?.trim().parse().ok()?;
        (secs > 0).then(|| Duration::from_secs(secs))
    }
}

/// Parse collected header lines. A status line (`HTTP/...`) starts a new
/// response, so only the last hop's headers survive a redirect chain.
pub fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut entries = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            entries.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            entries.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    ResponseHeaders { entries }
}
