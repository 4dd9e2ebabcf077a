use serde::{Deserialize, Serialize};

use crate::source::Frame;

/// Axis-aligned box in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub class: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// All detections for one frame, tagged with the mirrored flag that was
/// active at capture time so the renderer never has to track it separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionBatch {
    pub detections: Vec<Detection>,
    pub mirrored: bool,
}

impl DetectionBatch {
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Requests into the detection worker. The channel carrying these is bounded
/// to one slot, which is the whole backpressure story: a second `Predict`
/// while one is queued fails `try_send` and the frame is dropped.
#[derive(Debug)]
pub enum DetectorRequest {
    LoadModel,
    Predict { frame: Frame, mirrored: bool },
}

/// Replies out of the detection worker. Failures cross the boundary as
/// events, never as panics.
#[derive(Debug, Clone)]
pub enum DetectorEvent {
    ModelLoaded,
    ModelLoadFailed { reason: String },
    Predictions { batch: DetectionBatch },
    InferenceFailed { reason: String },
}
