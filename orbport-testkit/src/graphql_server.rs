//! A canned-response GraphQL server on a local socket.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// One canned answer. Matches when `needle` occurs in the request body.
#[derive(Debug, Clone)]
pub struct Route {
    needle: String,
    status: u16,
    body: String,
}

impl Route {
    /// `200 OK` with `body`.
    pub fn ok(needle: impl Into<String>, body: impl Into<String>) -> Self {
        Self::status(needle, 200, body)
    }

    pub fn status(needle: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            status,
            body: body.into(),
        }
    }
}

/// Handle on a running server. The listener thread lives until the process exits.
///
/// The first route whose needle appears in a request body answers it;
/// unmatched requests get `404`.
#[derive(Debug, Clone)]
pub struct FakeGraphql {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeGraphql {
    pub fn serve(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake graphql server");
        let url = format!("http://{}", listener.local_addr().expect("local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let Some(body) = read_body(&stream) else { continue };
                recorder.lock().expect("lock").push(body.clone());

                let (status, payload) = routes
                    .iter()
                    .find(|route| body.contains(&route.needle))
                    .map(|route| (route.status, route.body.clone()))
                    .unwrap_or((404, String::from("{}")));
                respond(stream, status, &payload);
            }
        });

        Self { url, requests }
    }

    /// Base URL, `http://127.0.0.1:<port>`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request bodies received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }
}

fn read_body(stream: &TcpStream) -> Option<String> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(String::from_utf8_lossy(&body).into_owned())
}

fn respond(mut stream: TcpStream, status: u16, payload: &str) {
    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
