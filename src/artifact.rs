use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::source::Frame;

pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBM: &str = "video/webm";

/// A finished output: screenshot or recorded clip. The sink decides how it is
/// persisted or downloaded; the pipeline only names it.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub suggested_name: String,
    pub mime_type: &'static str,
}

impl Artifact {
    pub fn png(bytes: Vec<u8>, taken_at: DateTime<Utc>) -> Self {
        Self {
            bytes,
            suggested_name: format!("{}.png", timestamp_name(taken_at)),
            mime_type: MIME_PNG,
        }
    }

    pub fn webm(bytes: Vec<u8>, started_at: DateTime<Utc>) -> Self {
        Self {
            bytes,
            suggested_name: format!("{}.webm", timestamp_name(started_at)),
            mime_type: MIME_WEBM,
        }
    }
}

/// Output boundary for finished artifacts.
pub trait ArtifactSink: Send + Sync {
    fn emit(&self, artifact: Artifact) -> Result<()>;
}

/// `MM-DD-YYYY HH-MM-SS`, filesystem-safe.
pub fn timestamp_name(at: DateTime<Utc>) -> String {
    at.format("%m-%d-%Y %H-%M-%S").to_string()
}

/// Encode a raw RGBA frame as PNG for the screenshot artifact.
pub fn encode_frame_png(frame: &Frame) -> Result<Vec<u8>> {
    let buffer = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .context("frame buffer does not match its dimensions")?;

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .context("png encoding failed")?;
    Ok(bytes)
}
