//! Minimal HTTP/1.1 stub for tests that need real responses.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use reqwest::Url;

pub struct StubResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: content_type.to_string(),
            body,
        }
    }

    pub fn json(body: &str) -> Self {
        Self::ok("application/json", body.as_bytes().to_vec())
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain".to_string(),
            body: Vec::new(),
        }
    }
}

/// Serves `responses` in order, one per connection, and returns the base URL.
pub fn serve(responses: Vec<StubResponse>) -> String {
    serve_recorded(responses).0
}

/// Like [`serve`], but also hands back the request line of every
/// connection (`GET /path?query HTTP/1.1`), sent before the response.
pub fn serve_recorded(responses: Vec<StubResponse>) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            if reader.read_line(&mut line).is_ok() {
                let _ = tx.send(line.trim_end().to_string());
                line.clear();
            }
            while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }

            let head = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                response.status,
                response.content_type,
                response.body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&response.body);
            let _ = stream.flush();
        }
    });

    (format!("http://{addr}"), rx)
}

/// Parses the target of a recorded request line into a URL so tests can
/// inspect its path and decoded query pairs.
pub fn request_url(request_line: &str) -> Url {
    let target = request_line.split_whitespace().nth(1).unwrap();
    Url::parse(&format!("http://stub{target}")).unwrap()
}

/// Decoded query parameters of a recorded request line.
pub fn query_of(request_line: &str) -> Vec<(String, String)> {
    request_url(request_line).query_pairs().into_owned().collect()
}
