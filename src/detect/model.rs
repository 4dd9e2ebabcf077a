use anyhow::Result;

use crate::detect::messages::Detection;
use crate::source::Frame;

/// The classifier boundary. Implementations run entirely on the detection
/// worker thread, so they may hold non-`Send` state and block.
pub trait Detector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;
}

/// Constructs the classifier on the worker thread. Heavy model loading
/// happens exactly once, before any prediction is served.
pub type DetectorLoader = Box<dyn FnOnce() -> Result<Box<dyn Detector>> + Send>;
