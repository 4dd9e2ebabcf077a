use crate::error::{PipelineError, PipelineResult};

/// One sampled image from the video source.
///
/// Tightly packed RGBA8, row-major. A frame is owned by the sampling tick
/// that captured it and is moved into the detection request; nothing retains
/// it past that tick.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> PipelineResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(PipelineError::FrameSourceUnavailable);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

/// The camera boundary. Produces frames on demand; may block briefly, so the
/// scheduler calls it under `spawn_blocking`.
///
/// `capture` fails with `FrameSourceUnavailable` whenever no frame can be
/// produced right now (device missing, stream not ready). Callers treat that
/// as a per-call condition, never as fatal.
pub trait FrameSource: Send + Sync {
    fn capture(&self) -> PipelineResult<Frame>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rejects_mismatched_buffer() {
        assert!(Frame::new(4, 4, vec![0u8; 64]).is_ok());
        assert!(Frame::new(4, 4, vec![0u8; 63]).is_err());
        assert!(Frame::new(0, 0, Vec::new()).is_ok());
    }
}
