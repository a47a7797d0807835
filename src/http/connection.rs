use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::site::router::Router;

/// One accepted connection, handled from request line to close.
///
/// Exactly one request is read and at most one response is written.
pub struct Connection<S> {
    stream: BufReader<S>,
    router: Arc<Router>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router>) -> Self {
        Self {
            stream: BufReader::new(stream),
            router,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection to `Closed`.
    ///
    /// Parse and routing failures close the connection without writing
    /// anything and are returned to the caller for logging.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let request = parse_request(&mut self.stream)
                        .await
                        .context("reading request")?;

                    tracing::info!(
                        method = %request.method,
                        path = %request.path,
                        version = %request.version,
                        "Request received"
                    );

                    self.state = ConnectionState::Processing(request);
                }

                ConnectionState::Processing(request) => {
                    let response = self
                        .router
                        .route(&request)
                        .await
                        .context("routing request")?;

                    tracing::info!(
                        method = %request.method,
                        path = %request.path,
                        status = response.status.as_u16(),
                        "Response ready"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer
                        .write_to_stream(self.stream.get_mut())
                        .await
                        .context("writing response")?;

                    tracing::debug!(bytes = writer.len(), "Response written");

                    // Response already delivered.
                    if let Err(e) = self.stream.get_mut().shutdown().await {
                        tracing::debug!(error = %e, "Closing connection failed");
                    }
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }
}
