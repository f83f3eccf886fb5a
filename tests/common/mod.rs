//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use subdomain_proxy::config::ProxyConfig;
use subdomain_proxy::{HttpServer, Shutdown};

/// Host header routing to `localhost:<port>`.
pub fn backend_host(port: u16) -> String {
    format!("localhost-{port}.example.com")
}

const BACKEND_PORT_BASE: u16 = 7000;
const BACKEND_PORT_SPAN: u16 = 2900;

/// Bind a loopback listener on a free four-digit port.
///
/// Routing only accepts four-digit ports, which the OS never hands out for
/// port 0, so candidates are scanned from a per-process offset instead.
pub async fn bind_backend_listener() -> (TcpListener, u16) {
    static NEXT: AtomicU16 = AtomicU16::new(0);
    let offset = (std::process::id() % BACKEND_PORT_SPAN as u32) as u16;

    for _ in 0..BACKEND_PORT_SPAN {
        let step = NEXT.fetch_add(1, Ordering::SeqCst) % BACKEND_PORT_SPAN;
        let port = BACKEND_PORT_BASE + (offset + step) % BACKEND_PORT_SPAN;
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)).await {
            return (listener, port);
        }
    }
    panic!("no free four-digit port on 127.0.0.1");
}

/// A four-digit port with nothing listening on it.
#[allow(dead_code)]
pub async fn unused_backend_port() -> u16 {
    let (listener, port) = bind_backend_listener().await;
    drop(listener);
    port
}

/// Start a raw backend that answers every request with a fixed status and body.
/// Returns the port it listens on.
#[allow(dead_code)]
pub async fn start_mock_backend(status: u16, body: &'static str) -> u16 {
    let (listener, port) = bind_backend_listener().await;

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;

                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nX-Backend: mock\r\nConnection: close\r\n\r\n{}",
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

    port
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// Start a backend that answers 201 with `"<METHOD> <URI> <HOST> <X-CUSTOM>\n"`
/// followed by the request body.
/// Returns the port it listens on.
#[allow(dead_code)]
pub async fn start_echo_backend() -> u16 {
    let app = Router::new().fallback(echo);
    let (listener, port) = bind_backend_listener().await;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    port
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> (StatusCode, Vec<u8>) {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string()
    };
    let mut out = format!(
        "{} {} {} {}\n",
        method,
        uri,
        header_str(header::HOST.as_str()),
        header_str("x-custom")
    )
    .into_bytes();
    out.extend_from_slice(&body);
    (StatusCode::CREATED, out)
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy() -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&ProxyConfig::default());
    let server_shutdown = shutdown.signalled();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
