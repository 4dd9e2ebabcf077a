use tokio::sync::mpsc;

use crate::detect::messages::{DetectionBatch, DetectorEvent, DetectorRequest};
use crate::detect::model::{Detector, DetectorLoader};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Body of the detection worker thread.
///
/// Requests are served strictly in order from the bounded channel, so at most
/// one `Predict` can ever wait behind `LoadModel`. The loop exits when the
/// request channel closes or when model loading fails (fatal).
pub(crate) fn detection_worker(
    loader: DetectorLoader,
    mut requests: mpsc::Receiver<DetectorRequest>,
    events: mpsc::UnboundedSender<DetectorEvent>,
) {
    let mut loader = Some(loader);
    let mut model: Option<Box<dyn Detector>> = None;

    while let Some(request) = requests.blocking_recv() {
        match request {
            DetectorRequest::LoadModel => {
                if model.is_some() {
                    // Redundant load request; re-acknowledge.
                    let _ = events.send(DetectorEvent::ModelLoaded);
                    continue;
                }

                let Some(load) = loader.take() else {
                    break;
                };

                match load() {
                    Ok(loaded) => {
                        model = Some(loaded);
                        log_info!("detection model loaded");
                        let _ = events.send(DetectorEvent::ModelLoaded);
                    }
                    Err(err) => {
                        log_error!("detection model failed to load: {err:?}");
                        let _ = events.send(DetectorEvent::ModelLoadFailed {
                            reason: err.to_string(),
                        });
                        break;
                    }
                }
            }
            DetectorRequest::Predict { frame, mirrored } => {
                let Some(detector) = model.as_mut() else {
                    let _ = events.send(DetectorEvent::InferenceFailed {
                        reason: "model not loaded".to_string(),
                    });
                    continue;
                };

                match detector.detect(&frame) {
                    Ok(detections) => {
                        let _ = events.send(DetectorEvent::Predictions {
                            batch: DetectionBatch {
                                detections,
                                mirrored,
                            },
                        });
                    }
                    Err(err) => {
                        log_warn!("inference failed: {err}");
                        let _ = events.send(DetectorEvent::InferenceFailed {
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
    }

    log_info!("detection worker shutting down");
}
