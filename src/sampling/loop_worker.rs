use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::detect::handle::try_predict;
use crate::detect::{DetectorEvent, DetectorRequest};
use crate::error::PipelineError;
use crate::overlay::{self, OverlaySurface};
use crate::policy;
use crate::recording::{RecordingController, StartReason};
use crate::settings::SettingsStore;
use crate::source::FrameSource;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Everything the sampling loop needs. Built once by the pipeline
/// controller; the loop owns it for its whole life.
pub struct SamplingContext {
    pub interval: Duration,
    pub source: Arc<dyn FrameSource>,
    pub requests: mpsc::Sender<DetectorRequest>,
    pub events: mpsc::UnboundedReceiver<DetectorEvent>,
    pub surface: Arc<Mutex<Box<dyn OverlaySurface>>>,
    pub settings: Arc<SettingsStore>,
    pub recorder: RecordingController,
}

/// Periodic sampling tick plus detection-result dispatch, on one task.
///
/// Backpressure is drop-newest: a tick that lands while a detection is in
/// flight is skipped outright, never buffered, so results always arrive in
/// submission order and the renderer only ever sees the latest batch.
/// Settings are read fresh every tick, so mirrored/auto-record toggles apply
/// without a restart.
pub async fn sampling_loop(ctx: SamplingContext, cancel_token: CancellationToken) {
    let SamplingContext {
        interval,
        source,
        requests,
        mut events,
        surface,
        settings,
        recorder,
    } = ctx;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut in_flight = false;

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                log_info!("sampling loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                if in_flight {
                    log::debug!("tick skipped: detection in flight");
                    continue;
                }

                let captured = {
                    let source = Arc::clone(&source);
                    tokio::task::spawn_blocking(move || source.capture()).await
                };

                let frame = match captured {
                    Ok(Ok(frame)) => frame,
                    Ok(Err(err)) => {
                        // Camera gone or not ready; try again next tick.
                        log::debug!("no frame this tick: {err}");
                        continue;
                    }
                    Err(err) => {
                        log_error!("capture worker join failed: {err}");
                        continue;
                    }
                };

                let mirrored = settings.mirrored();
                if try_predict(&requests, frame, mirrored) {
                    in_flight = true;
                } else {
                    log::debug!("detector busy; frame dropped");
                }
            }
            event = events.recv() => {
                let Some(event) = event else {
                    log_error!("detection worker channel closed");
                    break;
                };

                match event {
                    DetectorEvent::Predictions { batch } => {
                        in_flight = false;

                        let config = settings.auto_record();
                        {
                            let mut surface = surface.lock().unwrap();
                            overlay::render(&batch, &config.trigger_class, surface.as_mut());
                        }

                        if policy::should_trigger(&batch, &config) {
                            let volume = settings.volume();
                            if let Err(err) = recorder
                                .start(StartReason::Auto, Some(volume))
                                .await
                            {
                                log_error!("auto-record start failed: {err:#}");
                            }
                        }
                    }
                    DetectorEvent::InferenceFailed { reason } => {
                        in_flight = false;
                        log_warn!("{}; sampling continues", PipelineError::Inference(reason));
                    }
                    DetectorEvent::ModelLoaded => {
                        // Redundant ack after the startup handshake.
                    }
                    DetectorEvent::ModelLoadFailed { reason } => {
                        log_error!("model reported lost after startup: {reason}");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Artifact, ArtifactSink};
    use crate::audio::CueSink;
    use crate::detect::model::Detector;
    use crate::detect::{BoundingBox, Detection, DetectorHandle};
    use crate::error::PipelineResult;
    use crate::recording::VideoRecorder;
    use crate::sampling::SamplerController;
    use crate::source::Frame;
    use anyhow::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    const TEST_INTERVAL: Duration = Duration::from_millis(5);

    struct CountingSource {
        captures: Arc<AtomicUsize>,
    }

    impl FrameSource for CountingSource {
        fn capture(&self) -> PipelineResult<Frame> {
            self.captures.fetch_add(1, Ordering::SeqCst);
            Frame::new(4, 4, vec![0u8; 64])
        }
    }

    /// Returns one person box per call; blocks on the gate first when one is
    /// installed.
    struct PersonDetector {
        gate: Option<std::sync::mpsc::Receiver<()>>,
    }

    impl Detector for PersonDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
            if let Some(gate) = &self.gate {
                gate.recv().ok();
            }
            Ok(vec![Detection {
                class: "person".to_string(),
                bbox: BoundingBox {
                    x: 10.0,
                    y: 10.0,
                    width: 20.0,
                    height: 40.0,
                },
                confidence: 0.9,
            }])
        }
    }

    struct NullRecorder;

    impl VideoRecorder for NullRecorder {
        fn begin(&mut self) -> Result<()> {
            Ok(())
        }

        fn finish(&mut self) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct MemorySink {
        artifacts: StdMutex<Vec<Artifact>>,
    }

    impl ArtifactSink for MemorySink {
        fn emit(&self, artifact: Artifact) -> Result<()> {
            self.artifacts.lock().unwrap().push(artifact);
            Ok(())
        }
    }

    struct SilentTestCue;

    impl CueSink for SilentTestCue {
        fn play(&self, _volume: f32) {}
    }

    /// Records the x of every box it is asked to fill; rendering history is
    /// kept across clears so tests can watch it evolve.
    struct ProbeSurface {
        rect_xs: Arc<StdMutex<Vec<f32>>>,
    }

    impl OverlaySurface for ProbeSurface {
        fn width(&self) -> u32 {
            640
        }

        fn height(&self) -> u32 {
            480
        }

        fn clear(&mut self) {}

        fn fill_round_rect(
            &mut self,
            x: f32,
            _y: f32,
            _width: f32,
            _height: f32,
            _radius: f32,
            _color: [u8; 3],
            _alpha: f32,
        ) {
            self.rect_xs.lock().unwrap().push(x);
        }

        fn draw_label(&mut self, _text: &str, _x: f32, _y: f32) {}
    }

    fn test_recorder(sink: Arc<MemorySink>) -> RecordingController {
        RecordingController::new(Box::new(NullRecorder), sink, Arc::new(SilentTestCue))
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    struct LoopFixture {
        sampler: SamplerController,
        // Keeps the request channel open for the loop's whole life.
        detector: DetectorHandle,
        captures: Arc<AtomicUsize>,
        rect_xs: Arc<StdMutex<Vec<f32>>>,
        settings: Arc<SettingsStore>,
        recorder: RecordingController,
        sink: Arc<MemorySink>,
    }

    impl LoopFixture {
        async fn teardown(mut self) {
            self.sampler.stop().await.unwrap();
            self.detector.shutdown().await;
        }
    }

    async fn start_loop(gate: Option<std::sync::mpsc::Receiver<()>>) -> LoopFixture {
        let captures = Arc::new(AtomicUsize::new(0));
        let rect_xs = Arc::new(StdMutex::new(Vec::new()));
        let settings = Arc::new(SettingsStore::new());
        let sink = Arc::new(MemorySink::default());
        let recorder = test_recorder(sink.clone());

        let (handle, mut events) = DetectorHandle::spawn(Box::new(move || {
            Ok(Box::new(PersonDetector { gate }) as Box<dyn Detector>)
        }))
        .unwrap();
        // Same handshake the pipeline does: the request slot is free once the
        // load is acknowledged.
        handle.request_load().await.unwrap();
        assert!(matches!(
            events.recv().await,
            Some(DetectorEvent::ModelLoaded)
        ));

        let ctx = SamplingContext {
            interval: TEST_INTERVAL,
            source: Arc::new(CountingSource {
                captures: captures.clone(),
            }),
            requests: handle.requests(),
            events,
            surface: Arc::new(Mutex::new(Box::new(ProbeSurface {
                rect_xs: rect_xs.clone(),
            }) as Box<dyn OverlaySurface>)),
            settings: settings.clone(),
            recorder: recorder.clone(),
        };

        let mut sampler = SamplerController::new();
        sampler.start(ctx).unwrap();

        LoopFixture {
            sampler,
            detector: handle,
            captures,
            rect_xs,
            settings,
            recorder,
            sink,
        }
    }

    #[tokio::test]
    async fn ticks_are_skipped_while_a_detection_is_in_flight() {
        let (permit_tx, permit_rx) = std::sync::mpsc::channel();
        let fixture = start_loop(Some(permit_rx)).await;

        // Exactly one frame goes out; the gated detector pins it in flight
        // while further ticks elapse.
        wait_until(|| fixture.captures.load(Ordering::SeqCst) == 1).await;
        tokio::time::sleep(TEST_INTERVAL * 10).await;
        assert_eq!(fixture.captures.load(Ordering::SeqCst), 1);

        // Dropping the gate resolves the in-flight detection (and every later
        // one), so submission resumes on the next tick and shutdown cannot
        // wedge on a parked worker.
        drop(permit_tx);
        wait_until(|| fixture.captures.load(Ordering::SeqCst) >= 2).await;

        fixture.teardown().await;
    }

    #[tokio::test]
    async fn person_batch_starts_one_auto_session() {
        let fixture = start_loop(None).await;
        fixture.settings.toggle_auto_record().unwrap();

        let recorder = fixture.recorder.clone();
        tokio::time::timeout(Duration::from_secs(5), async {
            while !recorder.is_recording().await {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("auto-record never started");

        let first = fixture.recorder.snapshot().await;

        // More person batches arrive while the session is active; none of
        // them start a second session.
        tokio::time::sleep(TEST_INTERVAL * 20).await;
        let later = fixture.recorder.snapshot().await;
        assert_eq!(first.session_id, later.session_id);
        assert_eq!(first.started_at, later.started_at);
        assert!(fixture.sink.artifacts.lock().unwrap().is_empty());

        fixture.teardown().await;
    }

    #[tokio::test]
    async fn disabled_auto_record_never_starts_a_session() {
        let fixture = start_loop(None).await;

        // Person batches flow, config stays disabled.
        let rect_xs = fixture.rect_xs.clone();
        wait_until(move || !rect_xs.lock().unwrap().is_empty()).await;
        tokio::time::sleep(TEST_INTERVAL * 20).await;

        assert!(!fixture.recorder.is_recording().await);
        fixture.teardown().await;
    }

    #[tokio::test]
    async fn mirrored_toggle_applies_without_a_restart() {
        let fixture = start_loop(None).await;

        // Default mirrored=true: x' = 640 - 10 - 20.
        let xs = fixture.rect_xs.clone();
        wait_until(move || xs.lock().unwrap().contains(&610.0)).await;

        fixture.settings.toggle_mirrored().unwrap();
        let xs = fixture.rect_xs.clone();
        wait_until(move || xs.lock().unwrap().contains(&10.0)).await;

        fixture.teardown().await;
    }
}
