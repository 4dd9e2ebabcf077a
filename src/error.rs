//! Error types and handling
//!
//! Typed failures that cross the pipeline boundary. Everything else flows
//! through `anyhow` with context.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The classifier never became usable; sampling must not start.
    #[error("detection model failed to load: {0}")]
    ModelLoadFailed(String),

    /// No frame could be captured right now. Surfaced as a user-visible
    /// notice; never a crash.
    #[error("camera not found")]
    FrameSourceUnavailable,

    /// A single detection call failed; the next tick proceeds normally.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The sink rejected an artifact. The session still ends Idle.
    #[error("artifact emit rejected: {0}")]
    ArtifactEmit(String),

    /// The recorder resource refused to start or finalize.
    #[error("recorder error: {0}")]
    Recorder(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
