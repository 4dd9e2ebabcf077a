pub mod artifact;
pub mod audio;
pub mod detect;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod policy;
pub mod recording;
pub mod sampling;
pub mod settings;
pub mod source;
mod utils;

pub use artifact::{Artifact, ArtifactSink};
pub use audio::{CuePlayer, CueSink, SilentCue};
pub use detect::{BoundingBox, Detection, DetectionBatch, Detector, DetectorLoader};
pub use error::{PipelineError, PipelineResult};
pub use overlay::{OverlaySurface, PixelSurface};
pub use pipeline::{PipelineController, RecordToggle};
pub use recording::{RecordingSnapshot, RecordingStatus, StartReason, StopReason, VideoRecorder};
pub use settings::{AutoRecordConfig, CaptureSettings, SettingsStore};
pub use source::{Frame, FrameSource};
