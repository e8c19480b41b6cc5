//! Minimal HTTP/1.1 server standing in for Google Drive in tests.
//!
//! Each request's path and query are passed to a routing closure which
//! returns the response. Connections are closed after every response.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub disposition: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn file(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            disposition: None,
            body: body.to_vec(),
        }
    }

    /// An HTML document served as a download, the way Drive serves an
    /// uploaded `.html` file.
    pub fn html_attachment(body: &str, file_name: &'static str) -> Self {
        Self {
            disposition: Some(file_name),
            ..Self::html(body)
        }
    }

    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            disposition: None,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: "text/plain",
            disposition: None,
            body: b"not found".to_vec(),
        }
    }
}

/// A running server. Requests seen so far are kept in `requests`.
pub struct DriveServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl DriveServer {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

/// Starts a server in a background thread. The server runs until the
/// process exits.
pub fn start<F>(route: F) -> DriveServer
where
    F: Fn(&str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    let route = Arc::new(route);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let route = Arc::clone(&route);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, route.as_ref(), &seen));
        }
    });

    DriveServer {
        base_url: format!("http://127.0.0.1:{port}/"),
        requests,
    }
}

fn handle<F>(mut stream: TcpStream, route: &F, seen: &Mutex<Vec<String>>)
where
    F: Fn(&str) -> Reply,
{
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().expect("requests lock").push(target.clone());

    let reply = route(&target);
    let reason = match reply.status {
        200 => "OK",
        404 => "Not Found",
        _ => "Status",
    };
    let disposition = reply
        .disposition
        .map(|name| format!("Content-Disposition: attachment; filename=\"{name}\"\r\n"))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason,
        reply.content_type,
        disposition,
        reply.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
    let _ = stream.flush();
}
