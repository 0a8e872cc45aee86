//! Shared mock backends for integration tests.

use rustls::ServerConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_rustls::TlsAcceptor;

pub const CA_PEM: &str = include_str!("../fixtures/ca.crt");
const SERVER_CERT_PEM: &str = include_str!("../fixtures/server.crt");
const SERVER_KEY_PEM: &str = include_str!("../fixtures/server.key");

/// Reads a raw request head, up to and including the blank line.
async fn read_raw_head<S: AsyncRead + Unpin>(socket: &mut S) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];

    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    String::from_utf8_lossy(&head).into_owned()
}

/// Reads a request head, returning its header lines as lowercase `(name, value)` pairs.
async fn read_request_head<S: AsyncRead + Unpin>(socket: &mut S) -> Vec<(String, String)> {
    read_raw_head(socket)
        .await
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect()
}

/// Start a mock control plane on an ephemeral port.
///
/// Every request gets `200 OK` with `Content-Type: application/json`,
/// `x-mock-header: test-value` and a JSON body holding the mock message plus
/// the request headers the server received.
pub async fn start_mock_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move { answer_with_mock_response(&mut socket).await });
        }
    });

    addr
}

async fn answer_with_mock_response<S: AsyncRead + AsyncWrite + Unpin>(socket: &mut S) {
    let received = read_request_head(socket).await;
    let body = serde_json::json!({
        "message": "mock response",
        "received": received,
    })
    .to_string();

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nx-mock-header: test-value\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Start a backend that answers one request with `204 No Content` and hands
/// back the request head exactly as it arrived on the wire.
pub async fn start_recording_backend() -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let head = read_raw_head(&mut socket).await;
        let _ = socket
            .write_all(b"HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n")
            .await;
        let _ = socket.shutdown().await;
        let _ = tx.send(head);
    });

    (addr, rx)
}

fn server_tls_config() -> Arc<ServerConfig> {
    let certs = rustls_pemfile::certs(&mut SERVER_CERT_PEM.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let key = rustls_pemfile::private_key(&mut SERVER_KEY_PEM.as_bytes())
        .unwrap()
        .unwrap();

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .unwrap();

    Arc::new(config)
}

/// Start the mock control plane behind TLS.
///
/// The server certificate is issued by the test CA in `fixtures/ca.crt` for
/// `localhost` and `127.0.0.1`, so it is untrusted by the default root set.
/// Connections whose handshake fails are dropped.
pub async fn start_tls_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let acceptor = TlsAcceptor::from(server_tls_config());

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut stream) = acceptor.accept(socket).await {
                    answer_with_mock_response(&mut stream).await;
                }
            });
        }
    });

    addr
}

/// Start a backend that reads requests but never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_request_head(&mut socket).await;
                // Hold the connection open until the client gives up
                let mut buf = [0u8; 64];
                while let Ok(n) = socket.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    addr
}

/// Start a backend that answers the first read with plaintext and hangs up,
/// whatever the client sent.
pub async fn start_plaintext_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n")
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
