pub mod controller;
pub mod recorder;
pub mod state;

pub use controller::RecordingController;
pub use recorder::VideoRecorder;
pub use state::{RecordingSession, RecordingSnapshot, RecordingStatus, StartReason, StopReason};
