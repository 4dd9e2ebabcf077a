pub mod handle;
pub mod messages;
pub mod model;
mod worker;

pub use handle::DetectorHandle;
pub use messages::{BoundingBox, Detection, DetectionBatch, DetectorEvent, DetectorRequest};
pub use model::{Detector, DetectorLoader};
