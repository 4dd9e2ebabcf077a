use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::detect::messages::{DetectorEvent, DetectorRequest};
use crate::detect::model::DetectorLoader;
use crate::detect::worker::detection_worker;
use crate::source::Frame;

/// Owning handle to the detection worker thread.
///
/// The request channel has capacity 1: request/response correlation is
/// implicit because only one request is ever in flight, and a full channel is
/// how "drop the newest frame while busy" falls out for free.
pub struct DetectorHandle {
    tx: mpsc::Sender<DetectorRequest>,
    thread: thread::JoinHandle<()>,
}

impl DetectorHandle {
    /// Spawn the worker thread. The returned receiver carries every
    /// `DetectorEvent`; the caller must drain it.
    pub fn spawn(loader: DetectorLoader) -> Result<(Self, mpsc::UnboundedReceiver<DetectorEvent>)> {
        let (tx, rx) = mpsc::channel(1);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let thread = thread::Builder::new()
            .name("detector".to_string())
            .spawn(move || detection_worker(loader, rx, event_tx))
            .context("failed to spawn detection worker thread")?;

        Ok((Self { tx, thread }, event_rx))
    }

    /// Queue the one-time model load. Must precede any prediction; the
    /// outcome arrives on the event channel.
    pub async fn request_load(&self) -> Result<()> {
        self.tx
            .send(DetectorRequest::LoadModel)
            .await
            .context("detection worker is gone")
    }

    /// Sender clone for the sampling loop.
    pub fn requests(&self) -> mpsc::Sender<DetectorRequest> {
        self.tx.clone()
    }

    /// Close the channel and wait for the worker to wind down. Any queued
    /// prediction is still served; its result is simply never read.
    pub async fn shutdown(self) {
        let Self { tx, thread } = self;
        drop(tx);
        let _ = tokio::task::spawn_blocking(move || thread.join()).await;
    }
}

/// Submit a frame unless the single request slot is taken. Returns false when
/// the frame was dropped (slot occupied or worker gone).
pub fn try_predict(tx: &mpsc::Sender<DetectorRequest>, frame: Frame, mirrored: bool) -> bool {
    tx.try_send(DetectorRequest::Predict { frame, mirrored })
        .is_ok()
}
