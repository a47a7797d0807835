mod common;

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use beacon::http::connection::{Connection, ConnectionState};
use beacon::site::Router;
use common::TempRoot;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream, ReadBuf, duplex};

/// Sends `raw` over an in-memory connection and returns what the server wrote
/// back together with the outcome of `Connection::run`.
async fn exchange(root: &TempRoot, raw: &[u8]) -> (Vec<u8>, anyhow::Result<()>) {
    let router = Arc::new(Router::new(root.site()));
    let (mut client, server) = duplex(64 * 1024);

    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server, router);
        let result = conn.run().await;
        assert!(matches!(conn.state(), ConnectionState::Closed));
        result
    });

    client.write_all(raw).await.unwrap();
    client.shutdown().await.unwrap();

    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();

    (received, handle.await.unwrap())
}

fn split_response(bytes: &[u8]) -> (String, Vec<u8>) {
    let end = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a blank line");
    (
        String::from_utf8(bytes[..end].to_vec()).unwrap(),
        bytes[end + 4..].to_vec(),
    )
}

#[tokio::test]
async fn test_index_html_scenario() {
    let root = TempRoot::populated();

    let (bytes, result) = exchange(
        &root,
        b"GET /index.html HTTP/1.0\r\nUser-Agent: curl/7.0\r\n\r\n",
    )
    .await;

    result.unwrap();
    let (head, body) = split_response(&bytes);
    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(head.contains("\r\nContent-Type: text/html"));
    assert!(head.contains("\r\nContent-Length: 31"));
    assert!(head.contains("\r\nDate: "));
    assert!(head.contains("\r\nServer: Beacon/"));
    assert_eq!(body, b"<html><body>hello</body></html>");
}

#[tokio::test]
async fn test_missing_file_scenario() {
    let root = TempRoot::populated();

    let (bytes, result) = exchange(
        &root,
        b"GET /missing.html HTTP/1.0\r\nUser-Agent: HTTPie/3.2\r\n\r\n",
    )
    .await;

    result.unwrap();
    let (head, body) = split_response(&bytes);
    assert!(head.starts_with("HTTP/1.0 404 Not Found\r\n"));
    assert!(head.contains("Content-Type: text/plain"));
    assert!(!body.is_empty());
}

#[tokio::test]
async fn test_post_scenario() {
    let root = TempRoot::populated();

    let (bytes, result) = exchange(
        &root,
        b"POST /index.html HTTP/1.0\r\nUser-Agent: curl/7.0\r\nContent-Length: 5\r\n\r\nhello",
    )
    .await;

    result.unwrap();
    assert!(bytes.starts_with(b"HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_directory_scenario() {
    let root = TempRoot::populated();

    let (bytes, result) = exchange(
        &root,
        b"GET /docs/ HTTP/1.0\r\nUser-Agent: Firefox/121.0\r\n\r\n",
    )
    .await;

    result.unwrap();
    let (head, body) = split_response(&bytes);
    let body = String::from_utf8(body).unwrap();
    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(head.contains("Content-Type: text/html"));
    assert_eq!(body.matches("<li>").count(), 2);
}

#[tokio::test]
async fn test_rejected_agent_gets_406() {
    let root = TempRoot::populated();

    let (bytes, result) = exchange(&root, b"GET /index.html HTTP/1.0\r\n\r\n").await;

    result.unwrap();
    assert!(bytes.starts_with(b"HTTP/1.0 406 Not Acceptable\r\n"));
}

#[tokio::test]
async fn test_parse_failure_closes_without_response() {
    let root = TempRoot::populated();

    for raw in [
        &b"GET /\r\n\r\n"[..],
        b"BREW /pot HTTP/1.0\r\n\r\n",
        b"GET / HTTP/1.0\r\nbroken\r\n\r\n",
        b"GET / HTTP/1.0\r\nUser-Agent: curl\r\n",
        b"",
    ] {
        let (bytes, result) = exchange(&root, raw).await;

        assert!(bytes.is_empty());
        assert!(result.is_err());
    }
}

#[tokio::test]
async fn test_unsupported_type_closes_without_response() {
    let root = TempRoot::populated();

    let (bytes, result) = exchange(
        &root,
        b"GET /notes.txt HTTP/1.0\r\nUser-Agent: curl/7.0\r\n\r\n",
    )
    .await;

    assert!(bytes.is_empty());
    let error = format!("{:#}", result.unwrap_err());
    assert!(error.contains("routing request"));
}

/// Duplex end whose shutdown always fails, as a socket does once the peer
/// has already gone away.
struct PeerGone(DuplexStream);

impl AsyncRead for PeerGone {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.0).poll_read(cx, buf)
    }
}

impl AsyncWrite for PeerGone {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.0).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.0).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::ErrorKind::NotConnected.into()))
    }
}

#[tokio::test]
async fn test_failed_close_after_response_is_not_an_error() {
    let root = TempRoot::populated();
    let router = Arc::new(Router::new(root.site()));
    let (mut client, server) = duplex(64 * 1024);

    client
        .write_all(b"GET /date HTTP/1.0\r\nUser-Agent: curl/7.0\r\n\r\n")
        .await
        .unwrap();

    let mut conn = Connection::new(PeerGone(server), router);
    conn.run().await.unwrap();
    assert!(matches!(conn.state(), ConnectionState::Closed));
    drop(conn);

    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    assert!(received.starts_with(b"HTTP/1.0 200 OK\r\n"));
}
