use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Limit advertised by the full upload page ("up to 100MB per file").
pub const STANDARD_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Limit advertised by the compact upload surface.
pub const COMPACT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

const DEFAULT_PREVIEW_MAX_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_TICK_STEP: f32 = 20.0;
const MAX_TICK_INTERVAL_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderConfig {
    pub max_file_size: u64,
    pub preview_max_bytes: u64,
    pub simulation: SimulationConfig,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: STANDARD_MAX_FILE_SIZE,
            preview_max_bytes: DEFAULT_PREVIEW_MAX_BYTES,
            simulation: SimulationConfig::default(),
        }
    }
}

impl UploaderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("share-uploader")
            .join("config.json")
    }
}

/// Pacing of the simulated transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    pub max_tick_step: f32,
    pub completion_base_ms: u64,
    pub completion_stagger_ms: u64,
    /// Chance per tick that the transfer fails instead of advancing.
    pub failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            max_tick_step: DEFAULT_MAX_TICK_STEP,
            completion_base_ms: 2000,
            completion_stagger_ms: 500,
            failure_rate: 0.0,
        }
    }
}

// Accessors below keep any deserialized value usable by the driver.
impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(1, MAX_TICK_INTERVAL_MS))
    }

    /// Upper bound of one progress step; the default when not finite and positive.
    pub fn tick_step(&self) -> f32 {
        if self.max_tick_step.is_finite() && self.max_tick_step > 0.0 {
            self.max_tick_step
        } else {
            DEFAULT_MAX_TICK_STEP
        }
    }

    pub fn failure_chance(&self) -> f64 {
        if self.failure_rate.is_finite() {
            self.failure_rate.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn completion_after(&self, batch_index: usize) -> Duration {
        let stagger = self
            .completion_stagger_ms
            .saturating_mul(u64::try_from(batch_index).unwrap_or(u64::MAX));
        Duration::from_millis(self.completion_base_ms.saturating_add(stagger))
    }
}
