use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecordingStatus {
    Idle,
    Recording,
}

impl Default for RecordingStatus {
    fn default() -> Self {
        RecordingStatus::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StartReason {
    Manual,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    Manual,
    Timeout,
    Forced,
}

/// The one active recording session. Cancelling `watchdog` is how any stop
/// path disarms the deadline timer.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    pub id: String,
    pub reason: StartReason,
    pub started_at: DateTime<Utc>,
    pub watchdog: CancellationToken,
}

impl RecordingSession {
    pub fn new(reason: StartReason) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reason,
            started_at: Utc::now(),
            watchdog: CancellationToken::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingState {
    pub status: RecordingStatus,
    pub session: Option<RecordingSession>,
    /// When the previous session ended; drives the auto-start cooldown.
    pub last_stopped_at: Option<Instant>,
}

impl RecordingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_session(&mut self, session: RecordingSession) {
        self.status = RecordingStatus::Recording;
        self.session = Some(session);
    }

    /// Transition to Idle, handing the finished session to the caller.
    pub fn finish_session(&mut self) -> Option<RecordingSession> {
        let session = self.session.take();
        if session.is_some() {
            self.status = RecordingStatus::Idle;
            self.last_stopped_at = Some(Instant::now());
        }
        session
    }
}

/// Boundary-facing view of the recording state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSnapshot {
    pub status: RecordingStatus,
    pub session_id: Option<String>,
    pub reason: Option<StartReason>,
    pub started_at: Option<DateTime<Utc>>,
}

impl From<&RecordingState> for RecordingSnapshot {
    fn from(state: &RecordingState) -> Self {
        Self {
            status: state.status,
            session_id: state.session.as_ref().map(|s| s.id.clone()),
            reason: state.session.as_ref().map(|s| s.reason),
            started_at: state.session.as_ref().map(|s| s.started_at),
        }
    }
}
