//! Demonstration binary: runs the full pipeline against a synthetic camera
//! and a scripted detector, dropping artifacts into ./captures. Ctrl-C tears
//! everything down.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use vigilcam::detect::{BoundingBox, Detection};
use vigilcam::{
    Artifact, ArtifactSink, CuePlayer, Detector, Frame, FrameSource, PipelineController,
    PipelineResult, PixelSurface, SettingsStore, VideoRecorder,
};

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;

/// Synthetic camera: a gray field with a brighter band that drifts across it.
struct SyntheticCamera {
    ticks: AtomicUsize,
}

impl FrameSource for SyntheticCamera {
    fn capture(&self) -> PipelineResult<Frame> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as u32;
        let band_x = (tick * 8) % FRAME_WIDTH;

        let mut data = vec![60u8; (FRAME_WIDTH * FRAME_HEIGHT * 4) as usize];
        for y in 0..FRAME_HEIGHT {
            for x in band_x..(band_x + 40).min(FRAME_WIDTH) {
                let i = ((y * FRAME_WIDTH + x) * 4) as usize;
                data[i] = 200;
                data[i + 1] = 200;
                data[i + 2] = 200;
            }
        }
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }

        Frame::new(FRAME_WIDTH, FRAME_HEIGHT, data)
    }
}

/// Scripted stand-in for a real classifier: a person walks through the scene
/// periodically, a chair is always there.
struct ScriptedDetector {
    calls: usize,
}

impl Detector for ScriptedDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        self.calls += 1;

        let mut detections = vec![Detection {
            class: "chair".to_string(),
            bbox: BoundingBox {
                x: 40.0,
                y: 300.0,
                width: 120.0,
                height: 140.0,
            },
            confidence: 0.72,
        }];

        // Roughly four seconds between appearances at the 100 ms cadence.
        if self.calls % 40 < 10 {
            detections.push(Detection {
                class: "person".to_string(),
                bbox: BoundingBox {
                    x: (self.calls % 40) as f32 * 30.0,
                    y: 80.0,
                    width: 90.0,
                    height: frame.height as f32 * 0.6,
                },
                confidence: 0.91,
            });
        }

        Ok(detections)
    }
}

/// Placeholder recorder: remembers how long the session ran and hands back a
/// stub clip. A real deployment plugs an encoder in here.
struct StubClipRecorder {
    started: Option<std::time::Instant>,
}

impl VideoRecorder for StubClipRecorder {
    fn begin(&mut self) -> Result<()> {
        self.started = Some(std::time::Instant::now());
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let elapsed = self
            .started
            .take()
            .map(|at| at.elapsed())
            .unwrap_or_default();
        // EBML magic plus a note about what would have been encoded.
        let mut bytes = vec![0x1A, 0x45, 0xDF, 0xA3];
        bytes.extend_from_slice(format!("stub clip, {}ms", elapsed.as_millis()).as_bytes());
        Ok(bytes)
    }
}

/// Writes every artifact into a directory, keeping the suggested name.
struct DirectorySink {
    dir: PathBuf,
}

impl ArtifactSink for DirectorySink {
    fn emit(&self, artifact: Artifact) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(&artifact.suggested_name);
        std::fs::write(&path, &artifact.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("saved {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("vigilcam starting up...");

    let settings = Arc::new(SettingsStore::with_path(PathBuf::from(
        "vigilcam-settings.json",
    ))?);
    if !settings.auto_record().enabled {
        settings.toggle_auto_record()?;
        info!("auto-record enabled for the demo");
    }

    let pipeline = PipelineController::new(
        Arc::new(SyntheticCamera {
            ticks: AtomicUsize::new(0),
        }),
        Box::new(PixelSurface::new(FRAME_WIDTH, FRAME_HEIGHT)),
        Box::new(StubClipRecorder { started: None }),
        Arc::new(DirectorySink {
            dir: PathBuf::from("captures"),
        }),
        Arc::new(CuePlayer::new()),
        settings,
    );

    pipeline
        .start(Box::new(|| {
            Ok(Box::new(ScriptedDetector { calls: 0 }) as Box<dyn Detector>)
        }))
        .await
        .context("pipeline failed to start")?;

    pipeline.take_screenshot().await?;
    info!("running; press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    pipeline.teardown().await?;

    Ok(())
}
