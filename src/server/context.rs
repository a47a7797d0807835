//! State shared between the acceptor loop and its workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore, watch};

/// Flips the server's shutdown signal.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Stops the acceptor loop. Workers already running are left to finish.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Creates a shutdown trigger and the signal handed to [`ServerContext`].
pub fn shutdown_channel() -> (ShutdownTrigger, watch::Receiver<bool>) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, rx)
}

/// Admission gate plus shutdown signal.
///
/// At most `max_workers` permits are out at any time. A worker holds its
/// permit for its whole life and dropping it is the only way to release it,
/// so every exit path frees exactly one slot.
#[derive(Debug, Clone)]
pub struct ServerContext {
    gate: Arc<Semaphore>,
    max_workers: usize,
    shutdown: watch::Receiver<bool>,
    workers: Arc<WorkerCount>,
}

#[derive(Debug, Default)]
struct WorkerCount {
    active: AtomicUsize,
    peak: AtomicUsize,
}

/// A running worker's hold on the server: its admission permit plus its
/// entry in the active-worker count. Both are given back on drop.
#[derive(Debug)]
pub struct WorkerSlot {
    _permit: OwnedSemaphorePermit,
    workers: Arc<WorkerCount>,
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.workers.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ServerContext {
    pub fn new(max_workers: usize, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            gate: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            shutdown,
            workers: Arc::default(),
        }
    }

    /// Waits for a free worker slot.
    pub async fn admit(&self) -> anyhow::Result<OwnedSemaphorePermit> {
        self.gate
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| anyhow::anyhow!("admission gate closed"))
    }

    /// Registers a worker that owns `permit` for its whole life.
    pub fn enter_worker(&self, permit: OwnedSemaphorePermit) -> WorkerSlot {
        let active = self.workers.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.workers.peak.fetch_max(active, Ordering::SeqCst);

        WorkerSlot {
            _permit: permit,
            workers: Arc::clone(&self.workers),
        }
    }

    /// Waits until every worker has given its permit back.
    pub async fn drain(&self) -> anyhow::Result<()> {
        let all = u32::try_from(self.max_workers)?;
        let _all = self
            .gate
            .acquire_many(all)
            .await
            .map_err(|_| anyhow::anyhow!("admission gate closed"))?;
        Ok(())
    }

    /// Resolves once shutdown has been requested.
    ///
    /// If the trigger is dropped without firing, this never resolves.
    pub async fn stopped(&self) {
        let mut rx = self.shutdown.clone();
        let fired = rx.wait_for(|stopped| *stopped).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }

    pub fn is_active(&self) -> bool {
        !*self.shutdown.borrow()
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn available_permits(&self) -> usize {
        self.gate.available_permits()
    }

    /// Workers currently running.
    pub fn active_workers(&self) -> usize {
        self.workers.active.load(Ordering::SeqCst)
    }

    /// Most workers that were ever running at the same time.
    pub fn peak_workers(&self) -> usize {
        self.workers.peak.load(Ordering::SeqCst)
    }
}
