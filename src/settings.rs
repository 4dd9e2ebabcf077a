use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Auto-record trigger policy knobs. Read fresh on every detection batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRecordConfig {
    pub enabled: bool,
    pub trigger_class: String,
    /// Minimum gap between the end of one auto session and the start of the
    /// next. Zero means retrigger immediately. Manual starts ignore this.
    pub cooldown_ms: u64,
}

impl Default for AutoRecordConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trigger_class: "person".into(),
            cooldown_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSettings {
    pub mirrored: bool,
    pub volume: f32,
    pub auto_record: AutoRecordConfig,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            mirrored: true,
            volume: 0.8,
            auto_record: AutoRecordConfig::default(),
        }
    }
}

/// Shared mutable settings. Toggles come from the UI boundary; the sampling
/// loop snapshots on every tick so changes apply without a restart.
pub struct SettingsStore {
    path: Option<PathBuf>,
    data: RwLock<CaptureSettings>,
}

impl SettingsStore {
    /// In-memory store with defaults; nothing is written to disk.
    pub fn new() -> Self {
        Self {
            path: None,
            data: RwLock::new(CaptureSettings::default()),
        }
    }

    /// Store backed by a JSON file. Unreadable or missing files fall back to
    /// defaults rather than failing startup.
    pub fn with_path(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            CaptureSettings::default()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> CaptureSettings {
        self.data.read().unwrap().clone()
    }

    pub fn mirrored(&self) -> bool {
        self.data.read().unwrap().mirrored
    }

    pub fn toggle_mirrored(&self) -> Result<bool> {
        let mut guard = self.data.write().unwrap();
        guard.mirrored = !guard.mirrored;
        self.persist(&guard)?;
        Ok(guard.mirrored)
    }

    pub fn auto_record(&self) -> AutoRecordConfig {
        self.data.read().unwrap().auto_record.clone()
    }

    pub fn toggle_auto_record(&self) -> Result<bool> {
        let mut guard = self.data.write().unwrap();
        guard.auto_record.enabled = !guard.auto_record.enabled;
        self.persist(&guard)?;
        Ok(guard.auto_record.enabled)
    }

    pub fn volume(&self) -> f32 {
        self.data.read().unwrap().volume
    }

    pub fn set_volume(&self, volume: f32) -> Result<f32> {
        let clamped = volume.clamp(0.0, 1.0);
        let mut guard = self.data.write().unwrap();
        guard.volume = clamped;
        self.persist(&guard)?;
        Ok(clamped)
    }

    fn persist(&self, data: &CaptureSettings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
