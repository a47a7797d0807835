use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{Instrument, info};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::server::context::ServerContext;
use crate::site::router::Router;

/// The acceptor: one listening socket feeding a bounded set of workers.
pub struct Listener {
    inner: TcpListener,
    ctx: ServerContext,
}

impl Listener {
    pub async fn bind(cfg: &ServerConfig, shutdown: watch::Receiver<bool>) -> anyhow::Result<Self> {
        let inner = TcpListener::bind(&cfg.listen_addr)
            .await
            .with_context(|| format!("binding {}", cfg.listen_addr))?;

        info!(
            address = %inner.local_addr()?,
            max_workers = cfg.max_workers,
            "Listening"
        );

        Ok(Self {
            inner,
            ctx: ServerContext::new(cfg.max_workers, shutdown),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    pub fn context(&self) -> ServerContext {
        self.ctx.clone()
    }

    /// Accepts connections until shutdown is requested.
    ///
    /// A worker slot is taken before each accept, so once `max_workers`
    /// connections are in flight new clients wait in the OS backlog. Accept
    /// errors are fatal. After shutdown the call returns only once every
    /// in-flight worker has finished.
    pub async fn run(self, router: Arc<Router>) -> anyhow::Result<()> {
        let mut next_worker: u64 = 0;

        while self.ctx.is_active() {
            let permit = tokio::select! {
                permit = self.ctx.admit() => permit?,
                _ = self.ctx.stopped() => break,
            };

            let (socket, peer) = tokio::select! {
                accepted = self.inner.accept() => accepted.context("accepting connection")?,
                _ = self.ctx.stopped() => break,
            };

            let slot = self.ctx.enter_worker(permit);
            let worker = next_worker;
            next_worker += 1;

            info!(
                peer = %peer,
                worker,
                active = self.ctx.active_workers(),
                "Accepted connection"
            );

            let router = Arc::clone(&router);
            let span = tracing::info_span!("worker", id = worker, peer = %peer);

            tokio::spawn(
                async move {
                    let _slot = slot;

                    let mut conn = Connection::new(socket, router);
                    if let Err(e) = conn.run().await {
                        let error = format!("{e:#}");
                        tracing::warn!(%error, "Connection abandoned");
                    }

                    tracing::debug!("Worker stopped");
                }
                .instrument(span),
            );
        }

        info!(active = self.ctx.active_workers(), "Acceptor stopped, draining workers");
        self.ctx.drain().await?;
        info!("All workers finished");
        Ok(())
    }
}
