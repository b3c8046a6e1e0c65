//! Minimal HTTP/1.1 archive stand-in for integration tests.
//!
//! Serves a table of paths. HEAD answers 200 for any known path and 404
//! otherwise; GET serves the body, a chosen error status, or hangs up without
//! a response to simulate a network failure. GET hits are counted per path.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// HEAD 200, GET 200 with this body.
    Body(Vec<u8>),
    /// HEAD 200, GET answers with this status and no body.
    Status(u16),
    /// HEAD 200, GET closes the connection without answering.
    HangUp,
}

#[derive(Clone)]
pub struct ArchiveServer {
    pub base_url: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    gets: Arc<Mutex<HashMap<String, usize>>>,
}

impl ArchiveServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            routes: Arc::new(Mutex::new(HashMap::new())),
            gets: Arc::new(Mutex::new(HashMap::new())),
        };
        let shared = server.clone();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let shared = shared.clone();
                thread::spawn(move || shared.handle(stream));
            }
        });
        server
    }

    /// Registers `route` for the path of `url` (scheme and host are ignored).
    pub fn route(&self, url: &str, route: Route) {
        self.routes
            .lock()
            .unwrap()
            .insert(path_of(url), route);
    }

    /// Number of GET requests seen for the path of `url`.
    pub fn get_count(&self, url: &str) -> usize {
        self.gets
            .lock()
            .unwrap()
            .get(&path_of(url))
            .copied()
            .unwrap_or(0)
    }

    fn handle(&self, mut stream: TcpStream) {
        let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
        let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
        let mut buf = [0u8; 8192];
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        let Ok(request) = std::str::from_utf8(&buf[..n]) else {
            return;
        };
        let mut parts = request.lines().next().unwrap_or("").split_whitespace();
        let method = parts.next().unwrap_or("");
        let path = parts.next().unwrap_or("").to_string();
        let route = self.routes.lock().unwrap().get(&path).cloned();

        if method.eq_ignore_ascii_case("HEAD") {
            let response = match route {
                Some(Route::Body(body)) => head(200, "OK", body.len()),
                Some(_) => head(200, "OK", 0),
                None => head(404, "Not Found", 0),
            };
            let _ = stream.write_all(response.as_bytes());
            return;
        }

        if method.eq_ignore_ascii_case("GET") {
            *self.gets.lock().unwrap().entry(path).or_insert(0) += 1;
            match route {
                Some(Route::Body(body)) => {
                    let _ = stream.write_all(head(200, "OK", body.len()).as_bytes());
                    let _ = stream.write_all(&body);
                }
                Some(Route::Status(code)) => {
                    let _ = stream.write_all(head(code, "Error", 0).as_bytes());
                }
                Some(Route::HangUp) => {}
                None => {
                    let _ = stream.write_all(head(404, "Not Found", 0).as_bytes());
                }
            }
            return;
        }

        let _ = stream.write_all(head(405, "Method Not Allowed", 0).as_bytes());
    }
}

fn head(code: u16, reason: &str, len: usize) -> String {
    format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        code, reason, len
    )
}

fn path_of(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}
