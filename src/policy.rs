//! Auto-record trigger policy.
//!
//! Deliberately stateless: a pure function of the batch and the current
//! config, so its behavior never depends on scheduling jitter. Re-trigger
//! suppression lives in the Recording Manager (start is idempotent while a
//! session is active).

use crate::detect::DetectionBatch;
use crate::settings::AutoRecordConfig;

/// True when this batch should start an automatic recording.
pub fn should_trigger(batch: &DetectionBatch, config: &AutoRecordConfig) -> bool {
    config.enabled
        && batch
            .detections
            .iter()
            .any(|detection| detection.class == config.trigger_class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{BoundingBox, Detection};

    fn batch_of(classes: &[&str]) -> DetectionBatch {
        DetectionBatch {
            detections: classes
                .iter()
                .map(|class| Detection {
                    class: class.to_string(),
                    bbox: BoundingBox {
                        x: 0.0,
                        y: 0.0,
                        width: 1.0,
                        height: 1.0,
                    },
                    confidence: 0.5,
                })
                .collect(),
            mirrored: false,
        }
    }

    #[test]
    fn disabled_config_never_triggers() {
        let config = AutoRecordConfig {
            enabled: false,
            ..AutoRecordConfig::default()
        };
        assert!(!should_trigger(&batch_of(&["person"]), &config));
        assert!(!should_trigger(&batch_of(&["person", "person"]), &config));
    }

    #[test]
    fn trigger_class_anywhere_in_the_batch_fires() {
        let config = AutoRecordConfig {
            enabled: true,
            ..AutoRecordConfig::default()
        };
        assert!(should_trigger(&batch_of(&["chair", "person", "dog"]), &config));
        assert!(!should_trigger(&batch_of(&["chair", "dog"]), &config));
        assert!(!should_trigger(&batch_of(&[]), &config));
    }

    #[test]
    fn trigger_class_is_configurable_and_exact() {
        let config = AutoRecordConfig {
            enabled: true,
            trigger_class: "cat".to_string(),
            cooldown_ms: 0,
        };
        assert!(should_trigger(&batch_of(&["cat"]), &config));
        assert!(!should_trigger(&batch_of(&["person"]), &config));
        assert!(!should_trigger(&batch_of(&["Cat"]), &config));
    }
}
