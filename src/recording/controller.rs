use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{error, info};
use tokio::sync::Mutex;

use crate::artifact::{Artifact, ArtifactSink};
use crate::audio::CueSink;
use crate::error::PipelineError;
use crate::recording::recorder::VideoRecorder;
use crate::recording::state::{
    RecordingSession, RecordingSnapshot, RecordingState, RecordingStatus, StartReason, StopReason,
};

/// Maximum length of one recording session.
const MAX_SESSION_DURATION: Duration = Duration::from_secs(30);

/// Owner of the single recording resource.
///
/// All transitions serialize on the state mutex, held across the whole
/// transition: a start arriving while a stop is mid-flight waits for the stop
/// to finish before its idempotence check. Every exit path, including
/// failures, leaves the state `Idle`.
#[derive(Clone)]
pub struct RecordingController {
    state: Arc<Mutex<RecordingState>>,
    recorder: Arc<Mutex<Box<dyn VideoRecorder>>>,
    sink: Arc<dyn ArtifactSink>,
    cue: Arc<dyn CueSink>,
    max_duration: Duration,
    auto_cooldown: Duration,
}

impl RecordingController {
    pub fn new(
        recorder: Box<dyn VideoRecorder>,
        sink: Arc<dyn ArtifactSink>,
        cue: Arc<dyn CueSink>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(RecordingState::new())),
            recorder: Arc::new(Mutex::new(recorder)),
            sink,
            cue,
            max_duration: MAX_SESSION_DURATION,
            auto_cooldown: Duration::ZERO,
        }
    }

    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Minimum gap between the end of one session and the next `Auto` start.
    pub fn with_auto_cooldown(mut self, cooldown: Duration) -> Self {
        self.auto_cooldown = cooldown;
        self
    }

    pub async fn is_recording(&self) -> bool {
        self.state.lock().await.status == RecordingStatus::Recording
    }

    pub async fn snapshot(&self) -> RecordingSnapshot {
        RecordingSnapshot::from(&*self.state.lock().await)
    }

    /// Begin a session. A no-op while one is already active, so callers may
    /// fire it on every matching detection batch without debouncing.
    pub async fn start(&self, reason: StartReason, cue_volume: Option<f32>) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.status == RecordingStatus::Recording {
            return Ok(());
        }

        if reason == StartReason::Auto {
            if let Some(stopped_at) = state.last_stopped_at {
                if stopped_at.elapsed() < self.auto_cooldown {
                    return Ok(());
                }
            }
        }

        self.recorder
            .lock()
            .await
            .begin()
            .map_err(|err| PipelineError::Recorder(err.to_string()))?;

        let session = RecordingSession::new(reason);
        self.arm_watchdog(&session);
        info!("recording started ({reason:?}) session {}", session.id);
        state.begin_session(session);

        if let Some(volume) = cue_volume {
            self.cue.play(volume);
        }

        Ok(())
    }

    /// End the active session. A no-op while Idle. Exactly one artifact is
    /// emitted per session that ever started, regardless of which exit path
    /// wins.
    pub async fn stop(&self, reason: StopReason) -> Result<()> {
        self.stop_session(reason, None).await
    }

    /// `only_session` restricts the stop to a specific session id; a stale
    /// watchdog that lost the cancellation race must not touch a newer
    /// session.
    async fn stop_session(&self, reason: StopReason, only_session: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().await;

        match (state.session.as_ref(), only_session) {
            (None, _) => return Ok(()),
            (Some(current), Some(id)) if current.id != id => return Ok(()),
            _ => {}
        }

        let Some(session) = state.finish_session() else {
            return Ok(());
        };
        session.watchdog.cancel();
        info!("recording stopped ({reason:?}) session {}", session.id);

        let bytes = self
            .recorder
            .lock()
            .await
            .finish()
            .map_err(|err| PipelineError::Recorder(err.to_string()))?;

        self.sink
            .emit(Artifact::webm(bytes, session.started_at))
            .map_err(|err| PipelineError::ArtifactEmit(err.to_string()))?;

        Ok(())
    }

    /// One watchdog task per session. Either the session token is cancelled
    /// first (any stop path) or the deadline fires and routes through the
    /// same stop entry point; both sides are idempotent.
    fn arm_watchdog(&self, session: &RecordingSession) {
        let controller = self.clone();
        let token = session.watchdog.clone();
        let session_id = session.id.clone();
        let deadline = self.max_duration;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(deadline) => {
                    info!("session {session_id} reached max duration");
                    if let Err(err) = controller
                        .stop_session(StopReason::Timeout, Some(session_id.as_str()))
                        .await
                    {
                        error!("watchdog stop failed: {err:#}");
                    }
                }
            }
        });
    }
}
