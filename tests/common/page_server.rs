//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every request with the same status line and body and records the
//! request heads it received.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

pub struct PageServer {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl PageServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Raw request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serves `body` with `200 OK` until the process exits.
pub fn start(body: impl Into<Vec<u8>>) -> PageServer {
    start_with_status("200 OK", body)
}

pub fn start_with_status(status: &'static str, body: impl Into<Vec<u8>>) -> PageServer {
    start_with_options(status, None, body)
}

/// Announces `content_length` bytes but sends only `body`, then hangs up.
pub fn start_truncated(content_length: usize, body: impl Into<Vec<u8>>) -> PageServer {
    start_with_options("200 OK", Some(content_length), body)
}

fn start_with_options(
    status: &'static str,
    content_length: Option<usize>,
    body: impl Into<Vec<u8>>,
) -> PageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body.into());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, status, content_length, &body, &seen));
        }
    });
    PageServer {
        base: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// A base URL nothing listens on.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(
    mut stream: std::net::TcpStream,
    status: &str,
    content_length: Option<usize>,
    body: &[u8],
    seen: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    seen.lock()
        .unwrap()
        .push(String::from_utf8_lossy(&buf[..n]).into_owned());
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n",
        status,
        content_length.unwrap_or(body.len())
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
