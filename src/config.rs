//! Top-level configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmConfig;
use crate::error::{Error, Result};
use crate::integration::PipelineConfig;
use crate::tracker::TrackerConfig;

/// All tunables of an intrusion pipeline.
///
/// Every section is optional in the JSON form; missing fields take their
/// defaults:
///
/// ```json
/// {
///   "tracker": { "min_hits": 2, "max_age": 40, "iou_threshold": 0.25 },
///   "alarm": { "cooldown_seconds": 3.0 },
///   "pipeline": { "process_every_n_frames": 2 },
///   "zones_file": "restricted_zones.json"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrusionConfig {
    pub tracker: TrackerConfig,
    pub alarm: AlarmConfig,
    /// Used by [`IntrusionPipeline::from_config`](crate::integration::IntrusionPipeline::from_config)
    pub pipeline: PipelineConfig,
    /// Where zone definitions are persisted; loaded by
    /// [`IntrusionPipeline::from_config`](crate::integration::IntrusionPipeline::from_config)
    pub zones_file: PathBuf,
}

impl Default for IntrusionConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            alarm: AlarmConfig::default(),
            pipeline: PipelineConfig::default(),
            zones_file: PathBuf::from("restricted_zones.json"),
        }
    }
}

impl IntrusionConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| Error::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()?;
        self.alarm.validate()?;
        self.pipeline.validate()
    }
}
