//! Forecast configuration
//!
//! Every field has a default, so a JSON file only needs the keys it
//! changes:
//!
//! ```json
//! { "svr": { "kernel": "rbf", "C": 10.0, "gamma": 0.05 }, "training_window": 120 }
//! ```

use crate::calendar::Frequency;
use crate::engine::DEFAULT_MAX_HORIZON;
use crate::error::{ForecastError, Result};
use crate::models::{GridSearch, ModelKind};
use crate::preparation::{PreparationOptions, MIN_OBSERVATIONS};
use forecast_math::SvrParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of trailing observations used for training
pub const DEFAULT_TRAINING_WINDOW: usize = 60;

/// Default share of the training window held back for validation
pub const DEFAULT_HOLDOUT_RATIO: f64 = 0.1;

/// Fixed configuration of the forecasting core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Which regressor to fit
    pub model: ModelKind,
    /// SVR hyper-parameters; for grid search, the kernel, tolerance and
    /// iteration cap shared by every candidate
    pub svr: SvrParams,
    /// Candidates for [`ModelKind::GridSearch`]
    pub grid: GridSearch,
    /// Trailing observations to train on; `None` trains on the whole series
    pub training_window: Option<usize>,
    /// Share of the training window held back for validation; `None` skips it
    pub holdout_ratio: Option<f64>,
    pub max_horizon: usize,
    /// Fixed observation frequency; detected from the series when `None`
    pub frequency: Option<Frequency>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::Svr,
            svr: SvrParams::default(),
            grid: GridSearch::default(),
            training_window: Some(DEFAULT_TRAINING_WINDOW),
            holdout_ratio: Some(DEFAULT_HOLDOUT_RATIO),
            max_horizon: DEFAULT_MAX_HORIZON,
            frequency: None,
        }
    }
}

impl ForecastConfig {
    /// Parse a configuration from JSON text and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every field for a usable value
    pub fn validate(&self) -> Result<()> {
        self.svr
            .validate()
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        if self.model == ModelKind::GridSearch {
            self.grid.validate()?;
        }

        if let Some(window) = self.training_window {
            if window < MIN_OBSERVATIONS {
                return Err(ForecastError::InvalidParameter(format!(
                    "training_window must be at least {}, got {}",
                    MIN_OBSERVATIONS, window
                )));
            }
        }

        if let Some(ratio) = self.holdout_ratio {
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(ForecastError::InvalidParameter(format!(
                    "holdout_ratio must be between 0 and 1, got {}",
                    ratio
                )));
            }
        }

        if self.max_horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_horizon must be at least 1".to_string(),
            ));
        }

        if let Some(freq) = self.frequency {
            freq.validate()?;
        }

        Ok(())
    }

    pub fn preparation_options(&self) -> PreparationOptions {
        PreparationOptions {
            training_window: self.training_window,
            frequency: self.frequency,
        }
    }
}
