use anyhow::Result;

/// The single clip-recorder resource (MediaRecorder analog). Implementations
/// typically tap the same stream the frame source reads from.
///
/// The Recording Manager is the only caller and serializes `begin`/`finish`
/// pairs; implementations never see overlapping sessions.
pub trait VideoRecorder: Send {
    /// Start buffering a new clip.
    fn begin(&mut self) -> Result<()>;

    /// Stop buffering and hand back the finished clip bytes (webm).
    fn finish(&mut self) -> Result<Vec<u8>>;
}
