//! In-process stand-in for the DigitalOcean API and the IP-echo service
//!
//! Serves canned JSON responses over plain HTTP on a loopback port and
//! records every request it receives. One request per connection
//! (`Connection: close`), which is all the sequential client needs.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A canned response for one method and request target
#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn get(path: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            method: "GET",
            path: path.into(),
            status,
            body: body.into(),
        }
    }

    pub fn put(path: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            method: "PUT",
            path: path.into(),
            status,
            body: body.into(),
        }
    }
}

/// A request as received by the fake server
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl SeenRequest {
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

pub struct FakeServer {
    /// `http://127.0.0.1:<port>`
    pub origin: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeServer {
    /// Start a server; `routes` receives the origin so it can build absolute links
    pub async fn start(routes: impl FnOnce(&str) -> Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback listener");
        let origin = format!("http://{}", listener.local_addr().expect("local addr"));
        let routes = routes(&origin);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_server = Arc::clone(&seen);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;

                let (status, body) = routes
                    .iter()
                    .find(|r| r.method == request.method && r.path == request.path)
                    .map(|r| (r.status, r.body.clone()))
                    .unwrap_or_else(|| {
                        (
                            404,
                            r#"{"id":"not_found","message":"The resource you were accessing could not be found."}"#
                                .to_string(),
                        )
                    });

                seen_by_server.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason_phrase(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { origin, seen }
    }

    /// DigitalOcean-style base URL on this server
    pub fn api_base(&self) -> String {
        format!("{}/v2", self.origin)
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Requests with the given method
    pub fn requests_with_method(&self, method: &str) -> Vec<SeenRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

async fn read_request(socket: &mut TcpStream) -> SeenRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    SeenRequest {
        method,
        path,
        authorization,
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

/// JSON for one record as the API returns it
pub fn record_json(id: u64, record_type: &str, name: &str, data: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "type": record_type,
        "name": name,
        "data": data,
        "priority": null,
        "port": null,
        "ttl": 1800,
        "weight": null,
        "flags": null,
        "tag": null
    })
}

/// Body of a records listing page
pub fn records_page(records: Vec<serde_json::Value>, next: Option<&str>) -> String {
    let links = match next {
        Some(next) => serde_json::json!({ "pages": { "next": next } }),
        None => serde_json::json!({}),
    };
    serde_json::json!({
        "domain_records": records,
        "links": links,
        "meta": { "total": 0 }
    })
    .to_string()
}

/// Body of a single-record response
pub fn record_envelope(record: serde_json::Value) -> String {
    serde_json::json!({ "domain_record": record }).to_string()
}
