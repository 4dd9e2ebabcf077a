pub mod draw;
pub mod surface;

pub use draw::render;
pub use surface::{LabelPlacement, OverlaySurface, PixelSurface};
