//! Runtime configuration.
//!
//! The artifact was fit under assumptions that are not recorded in it: the
//! unit of the duration column and whether its output needs a ×10 correction.
//! Both are explicit settings here instead of being guessed.

use crate::dataset::DEFAULT_DATASET_PATH;
use crate::error::{Result, RevenueError};
use crate::pipeline::DEFAULT_MODEL_PATH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Unit the pipeline expects for video duration. Values are passed through unconverted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Seconds,
    Minutes,
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Seconds => write!(f, "seconds"),
            DurationUnit::Minutes => write!(f, "minutes"),
        }
    }
}

impl FromStr for DurationUnit {
    type Err = RevenueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seconds" | "s" => Ok(DurationUnit::Seconds),
            "minutes" | "m" => Ok(DurationUnit::Minutes),
            other => Err(RevenueError::config(format!(
                "unknown duration unit '{other}', expected 'seconds' or 'minutes'"
            ))),
        }
    }
}

/// Settings shared by the prediction and evaluation commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the pipeline artifact
    pub model_path: PathBuf,

    /// Path to the labeled CSV used for evaluation
    pub dataset_path: PathBuf,

    /// Duration unit the pipeline was fit with
    pub duration_unit: DurationUnit,

    /// Multiplier applied to each pipeline output (1.0 leaves it unchanged)
    pub prediction_scale: f64,

    /// Fraction of rows held out for evaluation
    pub test_size: f64,

    /// Seed for the train/test shuffle
    pub seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            duration_unit: DurationUnit::Seconds,
            prediction_scale: 1.0,
            test_size: 0.2,
            seed: 42,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| RevenueError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.prediction_scale.is_finite() || self.prediction_scale <= 0.0 {
            return Err(RevenueError::config(format!(
                "prediction_scale must be a positive number, got {}",
                self.prediction_scale
            )));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(RevenueError::config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}
