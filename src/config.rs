//! Processing configuration with explicit defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ChainageError;

/// Default spacing between chainage markers.
pub const DEFAULT_INTERVAL_M: f64 = 500.0;

/// Default search radius around the axis.
pub const DEFAULT_RADIUS_M: f64 = 70_000.0;

/// Name given to features that carry none.
pub const DEFAULT_UNNAMED_LABEL: &str = "unnamed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainageConfig {
    /// Distance between markers in meters.
    pub interval_m: f64,
    /// Chainage of the first marker in meters.
    pub start_m: f64,
}

impl Default for ChainageConfig {
    fn default() -> Self {
        Self {
            interval_m: DEFAULT_INTERVAL_M,
            start_m: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Maximum perpendicular offset kept by the annotate pipeline.
    pub radius_m: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
        }
    }
}

/// Complete corridor processing configuration.
///
/// Every field has a default, so a partial JSON document such as
/// `{"filter": {"radius_m": 1000}}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    pub chainage: ChainageConfig,
    pub filter: FilterConfig,
    /// Project features on the rayon thread pool.
    pub parallel: bool,
    pub unnamed_label: String,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            chainage: ChainageConfig::default(),
            filter: FilterConfig::default(),
            parallel: false,
            unnamed_label: DEFAULT_UNNAMED_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ChainageError),
}

impl CorridorConfig {
    /// Loads and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the numeric settings before any processing starts.
    pub fn validate(&self) -> Result<(), ChainageError> {
        if !self.chainage.interval_m.is_finite() || self.chainage.interval_m <= 0.0 {
            return Err(ChainageError::InvalidInterval(self.chainage.interval_m));
        }
        if !self.chainage.start_m.is_finite() || self.chainage.start_m < 0.0 {
            return Err(ChainageError::InvalidDistance(self.chainage.start_m));
        }
        if self.filter.radius_m.is_nan() || self.filter.radius_m < 0.0 {
            return Err(ChainageError::InvalidRadius(self.filter.radius_m));
        }
        Ok(())
    }
}
