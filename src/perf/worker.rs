//! Background worker for loading sources and boundary files
//!
//! Keeps the UI responsive while CSV files are parsed or the boundary file is
//! fetched over the network.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::data::{DataReady, DataStore, GeoCollection, GeoSource, SourceSpec};
use crate::error::DashError;

/// Requests that can be sent to the background worker
pub enum WorkerRequest {
    /// Parse every configured source into a fresh store
    LoadData {
        sources: Vec<SourceSpec>,
        base_dir: PathBuf,
    },
    /// Read or download the boundary file
    LoadGeo { source: GeoSource },
    /// Shutdown the worker
    Shutdown,
}

/// Results returned from the background worker
pub enum WorkerResult {
    /// Every source parsed; sent at most once per load request
    DataLoaded { store: DataStore, ready: DataReady },
    DataFailed(DashError),
    GeoLoaded(GeoCollection),
    GeoFailed(DashError),
}

/// Background worker that processes requests off the main thread
pub struct BackgroundWorker {
    tx: Sender<WorkerRequest>,
    rx: Receiver<WorkerResult>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundWorker {
    /// Spawn a new background worker thread
    pub fn spawn() -> Self {
        let (req_tx, req_rx) = channel::<WorkerRequest>();
        let (res_tx, res_rx) = channel::<WorkerResult>();

        let handle = thread::Builder::new()
            .name("roadwatch-loader".into())
            .spawn(move || Self::worker_loop(req_rx, res_tx))
            .inspect_err(|e| tracing::error!(error = %e, "failed to spawn loader thread"))
            .ok();

        Self {
            tx: req_tx,
            rx: res_rx,
            handle,
        }
    }

    fn worker_loop(rx: Receiver<WorkerRequest>, tx: Sender<WorkerResult>) {
        while let Ok(request) = rx.recv() {
            let result = match request {
                WorkerRequest::LoadData { sources, base_dir } => {
                    let mut store = DataStore::new();
                    match store.load(&sources, &base_dir) {
                        Ok(ready) => WorkerResult::DataLoaded { store, ready },
                        Err(e) => WorkerResult::DataFailed(e),
                    }
                }
                WorkerRequest::LoadGeo { source } => {
                    tracing::info!(source = %source, "loading boundaries");
                    match source.load() {
                        Ok(geo) => WorkerResult::GeoLoaded(geo),
                        Err(e) => {
                            tracing::warn!(source = %source, error = %e, "boundary file unavailable");
                            WorkerResult::GeoFailed(e)
                        }
                    }
                }
                WorkerRequest::Shutdown => break,
            };

            if tx.send(result).is_err() {
                break;
            }
        }
    }

    /// Send a request to the worker (non-blocking)
    pub fn request(&self, req: WorkerRequest) {
        if self.tx.send(req).is_err() {
            tracing::warn!("loader thread has exited; request dropped");
        }
    }

    /// Poll for completed work (non-blocking)
    pub fn poll(&self) -> Option<WorkerResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for BackgroundWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(WorkerRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Default for BackgroundWorker {
    fn default() -> Self {
        Self::spawn()
    }
}
