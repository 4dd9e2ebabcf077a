pub mod controller;
pub mod loop_worker;

pub use controller::SamplerController;
pub use loop_worker::{sampling_loop, SamplingContext};
