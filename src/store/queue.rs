//! Single-writer persistence queue
//!
//! One tokio task owns the store and applies commands strictly in send order,
//! so rapid add/delete bursts resolve last-write-wins. Saves are
//! fire-and-forget; their failures are logged and published as
//! [`StoreStatus`] for the UI.

use anyhow::{Context, Result, anyhow};
use std::thread;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info};

use super::BarcodeStore;
use crate::types::BarcodeEntry;

enum StoreCommand {
    Load(oneshot::Sender<Result<Vec<BarcodeEntry>>>),
    Save(Vec<BarcodeEntry>),
    Upsert(Vec<BarcodeEntry>),
    Flush(oneshot::Sender<()>),
}

/// Outcome of the most recent store operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreStatus {
    #[default]
    Ok,
    Failed(String),
}

/// Create a connected handle/worker pair; run the worker on a tokio runtime
pub fn channel(store: Box<dyn BarcodeStore>) -> (StoreHandle, StoreWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = watch::channel(StoreStatus::Ok);
    (
        StoreHandle {
            tx,
            status: status_rx,
        },
        StoreWorker {
            store,
            rx,
            status: status_tx,
        },
    )
}

/// Cloneable sender side used by the registry and UI
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<StoreCommand>,
    status: watch::Receiver<StoreStatus>,
}

impl StoreHandle {
    /// Queue a full-list save
    pub fn save(&self, entries: Vec<BarcodeEntry>) {
        let count = entries.len();
        if self.tx.send(StoreCommand::Save(entries)).is_err() {
            error!(count, "Store worker is not running, dropping save");
        }
    }

    /// Queue a save that only inserts or replaces, never removing stored keys
    pub fn upsert(&self, entries: Vec<BarcodeEntry>) {
        let count = entries.len();
        if self.tx.send(StoreCommand::Upsert(entries)).is_err() {
            error!(count, "Store worker is not running, dropping upsert");
        }
    }

    /// Queue a load; poll the receiver with `try_recv` or await it
    pub fn request_load(&self) -> oneshot::Receiver<Result<Vec<BarcodeEntry>>> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(StoreCommand::Load(reply)).is_err() {
            error!("Store worker is not running, load will not complete");
        }
        rx
    }

    pub async fn load(&self) -> Result<Vec<BarcodeEntry>> {
        self.request_load()
            .await
            .context("Store worker stopped before load completed")?
    }

    /// Resolve once every command queued before this call has been applied
    pub async fn flush(&self) -> Result<()> {
        let rx = self.queue_flush()?;
        rx.await.context("Store worker stopped before flush completed")
    }

    /// Blocking [`flush`](Self::flush) for callers outside the runtime
    pub fn flush_blocking(&self) -> Result<()> {
        let rx = self.queue_flush()?;
        rx.blocking_recv()
            .context("Store worker stopped before flush completed")
    }

    fn queue_flush(&self) -> Result<oneshot::Receiver<()>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::Flush(reply))
            .map_err(|_| anyhow!("Store worker is not running"))?;
        Ok(rx)
    }

    pub fn status(&self) -> StoreStatus {
        self.status.borrow().clone()
    }
}

/// Owns the store; exits once every handle is dropped and the queue drains
pub struct StoreWorker {
    store: Box<dyn BarcodeStore>,
    rx: mpsc::UnboundedReceiver<StoreCommand>,
    status: watch::Sender<StoreStatus>,
}

impl StoreWorker {
    pub async fn run(mut self) {
        info!("Store worker started");
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        info!("Store worker stopped");
    }

    fn handle(&mut self, command: StoreCommand) {
        match command {
            StoreCommand::Load(reply) => {
                let result = self.store.load_all();
                match &result {
                    Ok(entries) => {
                        debug!(count = entries.len(), "Store load complete");
                        self.status.send_replace(StoreStatus::Ok);
                    }
                    Err(e) => {
                        error!(error = ?e, "Failed to load barcodes");
                        self.status.send_replace(StoreStatus::Failed(format!("{e:#}")));
                    }
                }
                let _ = reply.send(result);
            }
            StoreCommand::Save(entries) => {
                let result = self.store.save_all(&entries);
                self.publish_save(result, entries.len());
            }
            StoreCommand::Upsert(entries) => {
                let result = self.store.upsert_all(&entries);
                self.publish_save(result, entries.len());
            }
            StoreCommand::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }

    fn publish_save(&self, result: Result<()>, count: usize) {
        match result {
            Ok(()) => {
                debug!(count, "Store save complete");
                self.status.send_replace(StoreStatus::Ok);
            }
            Err(e) => {
                error!(error = ?e, count, "Failed to save barcodes");
                self.status.send_replace(StoreStatus::Failed(format!("{e:#}")));
            }
        }
    }

    /// Run on a dedicated thread with its own current-thread runtime
    pub fn spawn_thread(self) -> Result<thread::JoinHandle<()>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .context("Failed to build store runtime")?;
        thread::Builder::new()
            .name("store-writer".to_string())
            .spawn(move || runtime.block_on(self.run()))
            .context("Failed to spawn store writer thread")
    }
}
