//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A canned response: status, body.
pub type Reply = (u16, String);

/// What the mock backend saw.
#[derive(Debug, Clone, Default)]
pub struct MockRequest {
    pub method: String,
    /// Request target, query string included.
    pub path: String,
    /// Header names are lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the parsed request and returns the reply.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend serving the fixtures of the demo API.
pub async fn start_demo_backend() -> SocketAddr {
    start_programmable_backend(|req: MockRequest| async move { demo_route(&req.path) }).await
}

/// Fixed replies of the demo API.
pub fn demo_route(path: &str) -> Reply {
    match path {
        "/users" => (200, r#"{"code":200,"data":{"users":[1]}}"#.into()),
        "/users_error" => (200, r#"{"code":300,"errorMsg":"error!"}"#.into()),
        "/users_with_biz_error" => (
            200,
            r#"{"code":200,"errorCode":"ProductNotFound","errorMsg":"error!"}"#.into(),
        ),
        "/users_not_normalized" => (200, r#"{"xcode":200,"xdata":3}"#.into()),
        "/users_not_normalized_error_300" => (200, r#"{"xcode":300,"errorMsg":"error!"}"#.into()),
        "/users_with_status_403" => (403, r#"{"errorMsg":"error!"}"#.into()),
        "/users_numeric_error_code" => (
            200,
            r#"{"code":200,"errorCode":1001,"errorMsg":"stock empty"}"#.into(),
        ),
        "/users_float_code" => (200, r#"{"code":300.0,"errorMsg":"error!"}"#.into()),
        "/users_empty_error_msg" => (200, r#"{"code":200,"data":1,"errorMsg":""}"#.into()),
        "/plain_text_error" => (500, "Cannot GET /plain_text_error".into()),
        _ => (404, r#"{"errorMsg":"no such route"}"#.into()),
    }
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Read the request head and its Content-Length body.
async fn read_request(socket: &mut TcpStream) -> MockRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return MockRequest::default(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or("GET").to_string();
    let path = request_line.next().unwrap_or("/").to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let body_end = buf.len().min(head_end + content_length);
    let body = String::from_utf8_lossy(&buf[head_end..body_end]).to_string();

    MockRequest {
        method,
        path,
        headers,
        body,
    }
}
