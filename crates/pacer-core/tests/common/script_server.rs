//! Minimal HTTP/1.1 server that replays canned responses for integration tests.
//!
//! Each connection gets the next response from the script; once the script
//! is exhausted the last response repeats. Request lines are recorded.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Canned {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Handle to a running script server.
pub struct ScriptServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptServer {
    /// Request targets (e.g. "/items?start=0&count=2") in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(script: Vec<Canned>) -> ScriptServer {
    assert!(!script.is_empty(), "script needs at least one response");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        let mut next = 0usize;
        for mut stream in listener.incoming().flatten() {
            let canned = script[next.min(script.len() - 1)].clone();
            next += 1;
            if let Some(target) = read_request_target(&mut stream) {
                seen.lock().unwrap().push(target);
            }
            let _ = stream.write_all(&render(&canned));
        }
    });
    ScriptServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn read_request_target(stream: &mut std::net::TcpStream) -> Option<String> {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = stream.read(&mut buf).ok()?;
    let request = std::str::from_utf8(&buf[..n]).ok()?;
    let line = request.lines().next()?;
    line.split_whitespace().nth(1).map(str::to_string)
}

fn render(c: &Canned) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {} Canned\r\n", c.status);
    for (k, v) in &c.headers {
        out.push_str(&format!("{}: {}\r\n", k, v));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        c.body.len(),
        c.body
    ));
    out.into_bytes()
}
