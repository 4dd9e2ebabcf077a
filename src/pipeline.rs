use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::sync::Mutex;

use crate::artifact::{self, Artifact, ArtifactSink};
use crate::audio::CueSink;
use crate::detect::{DetectorEvent, DetectorHandle, DetectorLoader};
use crate::error::PipelineError;
use crate::overlay::OverlaySurface;
use crate::recording::{
    RecordingController, RecordingSnapshot, StartReason, StopReason, VideoRecorder,
};
use crate::sampling::{SamplerController, SamplingContext};
use crate::settings::SettingsStore;
use crate::source::FrameSource;

const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// What a manual record toggle did, so the boundary can toast accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordToggle {
    Started,
    Saved,
}

/// Owns the whole pipeline: detection worker, sampling task, recording
/// manager, and the collaborator handles. Construction wires everything;
/// `start` brings the model up and begins sampling; `teardown` cancels every
/// timer and closes the computation channel. Nothing here is process-global.
pub struct PipelineController {
    settings: Arc<SettingsStore>,
    source: Arc<dyn FrameSource>,
    sink: Arc<dyn ArtifactSink>,
    cue: Arc<dyn CueSink>,
    surface: Arc<StdMutex<Box<dyn OverlaySurface>>>,
    recorder: RecordingController,
    sample_interval: Duration,
    sampler: Mutex<SamplerController>,
    detector: Mutex<Option<DetectorHandle>>,
}

impl PipelineController {
    pub fn new(
        source: Arc<dyn FrameSource>,
        surface: Box<dyn OverlaySurface>,
        recorder: Box<dyn VideoRecorder>,
        sink: Arc<dyn ArtifactSink>,
        cue: Arc<dyn CueSink>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let auto_cooldown = Duration::from_millis(settings.auto_record().cooldown_ms);
        let recorder = RecordingController::new(recorder, sink.clone(), cue.clone())
            .with_auto_cooldown(auto_cooldown);

        Self {
            settings,
            source,
            sink,
            cue,
            surface: Arc::new(StdMutex::new(surface)),
            recorder,
            sample_interval: SAMPLE_INTERVAL,
            sampler: Mutex::new(SamplerController::new()),
            detector: Mutex::new(None),
        }
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Load the model, then begin sampling. Load failure is fatal: nothing
    /// is spawned and the error carries `ModelLoadFailed`.
    pub async fn start(&self, loader: DetectorLoader) -> Result<()> {
        let mut sampler = self.sampler.lock().await;
        let mut detector_slot = self.detector.lock().await;
        if sampler.is_running() {
            bail!("pipeline already active");
        }

        let (handle, mut events) = DetectorHandle::spawn(loader)?;
        info!("loading detection model");
        handle.request_load().await?;

        match events.recv().await {
            Some(DetectorEvent::ModelLoaded) => info!("model ready, sampling begins"),
            Some(DetectorEvent::ModelLoadFailed { reason }) => {
                handle.shutdown().await;
                return Err(PipelineError::ModelLoadFailed(reason).into());
            }
            _ => {
                handle.shutdown().await;
                return Err(PipelineError::ModelLoadFailed(
                    "detection worker exited during load".to_string(),
                )
                .into());
            }
        }

        let ctx = SamplingContext {
            interval: self.sample_interval,
            source: Arc::clone(&self.source),
            requests: handle.requests(),
            events,
            surface: Arc::clone(&self.surface),
            settings: Arc::clone(&self.settings),
            recorder: self.recorder.clone(),
        };
        sampler.start(ctx)?;
        *detector_slot = Some(handle);

        Ok(())
    }

    /// Cancel the tick loop, force-stop any active session, and close the
    /// detection channel. Safe to call twice; everything in here is
    /// idempotent.
    pub async fn teardown(&self) -> Result<()> {
        self.sampler.lock().await.stop().await?;

        if let Err(err) = self.recorder.stop(StopReason::Forced).await {
            // Teardown presses on; the session still ended Idle.
            warn!("forced stop during teardown: {err:#}");
        }

        if let Some(handle) = self.detector.lock().await.take() {
            handle.shutdown().await;
        }

        Ok(())
    }

    // ---- inbound command surface -------------------------------------

    pub fn toggle_mirrored(&self) -> Result<bool> {
        self.settings.toggle_mirrored()
    }

    pub fn toggle_auto_record(&self) -> Result<bool> {
        self.settings.toggle_auto_record()
    }

    /// Store the clamped volume and play a preview cue at the new level.
    pub fn set_volume(&self, volume: f32) -> Result<f32> {
        let volume = self.settings.set_volume(volume)?;
        self.cue.play(volume);
        Ok(volume)
    }

    /// Capture one frame and emit it as a PNG artifact. With no frame
    /// available this is `FrameSourceUnavailable` and nothing is emitted.
    pub async fn take_screenshot(&self) -> Result<()> {
        let source = Arc::clone(&self.source);
        let frame = tokio::task::spawn_blocking(move || source.capture())
            .await
            .context("screenshot capture worker join failed")??;

        let bytes = artifact::encode_frame_png(&frame)?;
        self.sink
            .emit(Artifact::png(bytes, Utc::now()))
            .map_err(|err| PipelineError::ArtifactEmit(err.to_string()))?;
        Ok(())
    }

    /// Manual record control: start when idle (no cue), save when active.
    pub async fn toggle_recording(&self) -> Result<RecordToggle> {
        if self.recorder.is_recording().await {
            self.recorder.stop(StopReason::Manual).await?;
            Ok(RecordToggle::Saved)
        } else {
            self.recorder.start(StartReason::Manual, None).await?;
            Ok(RecordToggle::Started)
        }
    }

    pub async fn is_recording(&self) -> bool {
        self.recorder.is_recording().await
    }

    pub async fn recording_snapshot(&self) -> RecordingSnapshot {
        self.recorder.snapshot().await
    }
}
