//! HTTP/1.0 protocol implementation.
//!
//! Every connection carries exactly one request and one response; there is
//! no keep-alive, no chunking and request bodies are never read.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection request/response state machine
//! - **`parser`**: Reads a request line and header lines from a buffered stream
//! - **`message`**: Header map and tagged body shared by requests and responses
//! - **`request`**: HTTP request representation and method enumeration
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type lookup based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Parse request line + headers
//!        └──────┬──────┘
//!               │ Request parsed (parse error → Closed, nothing sent)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route to a response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, flush, shut down
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use beacon::config::SiteConfig;
//! use beacon::http::connection::Connection;
//! use beacon::site::Router;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let router = Arc::new(Router::new(SiteConfig::default()));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let router = router.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, router);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {e:#}");
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod message;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
