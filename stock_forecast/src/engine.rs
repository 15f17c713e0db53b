//! Forecast engine: fit, extrapolate, date the predictions

use crate::error::{ForecastError, Result};
use crate::models::{FittedModel, Regressor};
use crate::preparation::{PreparedData, TrainingSet, MIN_OBSERVATIONS};
use crate::series::PricePoint;
use chrono::NaiveDate;
use forecast_math::{forecast_accuracy, ForecastAccuracy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default upper bound on the horizon
pub const DEFAULT_MAX_HORIZON: usize = 365;

/// Predicted prices for the periods after the last observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<PricePoint>", try_from = "Vec<PricePoint>")]
pub struct ForecastResult {
    points: Vec<PricePoint>,
}

impl From<ForecastResult> for Vec<PricePoint> {
    fn from(result: ForecastResult) -> Self {
        result.points
    }
}

impl TryFrom<Vec<PricePoint>> for ForecastResult {
    type Error = ForecastError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self> {
        let horizon = points.len();
        Self::new(points, horizon)
    }
}

impl ForecastResult {
    /// Create a forecast result, checking its length and date order
    pub fn new(points: Vec<PricePoint>, horizon: usize) -> Result<Self> {
        if points.len() != horizon {
            return Err(ForecastError::InvalidHorizon(format!(
                "Values length ({}) doesn't match horizon ({})",
                points.len(),
                horizon
            )));
        }
        if points.windows(2).any(|w| w[1].date <= w[0].date) {
            return Err(ForecastError::MalformedSeries(
                "forecast dates must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Get the forecasted values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Everything one engine run produces
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub forecast: ForecastResult,
    /// Name of the fitted model
    pub model: String,
    /// Hold-out accuracy, when validation ran
    pub validation: Option<ForecastAccuracy>,
}

/// Fits a regressor and extrapolates it over a horizon
#[derive(Debug, Clone)]
pub struct ForecastEngine<R: Regressor> {
    regressor: R,
    max_horizon: usize,
    holdout_ratio: Option<f64>,
}

impl<R: Regressor> ForecastEngine<R> {
    pub fn new(regressor: R) -> Self {
        Self {
            regressor,
            max_horizon: DEFAULT_MAX_HORIZON,
            holdout_ratio: None,
        }
    }

    pub fn with_max_horizon(mut self, max_horizon: usize) -> Self {
        self.max_horizon = max_horizon;
        self
    }

    /// Hold back the trailing share of the training set to measure accuracy
    pub fn with_holdout(mut self, ratio: Option<f64>) -> Self {
        self.holdout_ratio = ratio;
        self
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }

    /// Accept horizons in `1..=max_horizon`
    pub fn validate_horizon(&self, horizon: i64) -> Result<usize> {
        validate_horizon(horizon, self.max_horizon)
    }

    /// Fit on the prepared data and predict `horizon` periods ahead.
    ///
    /// Predictions are evaluated at day indices `N..N+H-1`, directly after
    /// the training range, and dated by stepping the axis frequency from the
    /// last observed date.
    pub fn forecast(&self, prepared: &PreparedData, horizon: i64) -> Result<(ForecastResult, R::Fitted)> {
        let horizon = self.validate_horizon(horizon)?;
        let fitted = self.regressor.fit(&prepared.training)?;

        let start = prepared.training.len();
        let dates = prepared.axis.future_dates(horizon)?;
        let mut points = Vec::with_capacity(horizon);
        for (offset, date) in dates.into_iter().enumerate() {
            let index = start + offset;
            let value = fitted.evaluate(index as f64);
            if !value.is_finite() {
                return Err(ForecastError::ModelFit(format!(
                    "{} produced a non-finite prediction at index {}",
                    fitted.name(),
                    index
                )));
            }
            points.push(PricePoint::new(date, value));
        }

        debug!(model = fitted.name(), horizon, "forecast complete");
        Ok((ForecastResult::new(points, horizon)?, fitted))
    }

    /// Fit on the leading part of the training set and measure accuracy on
    /// the held-out tail. `None` when no ratio is set, the split leaves
    /// too little data on either side, or the leading part cannot be fitted.
    pub fn holdout_accuracy(&self, training: &TrainingSet) -> Result<Option<ForecastAccuracy>> {
        let ratio = match self.holdout_ratio {
            Some(r) => r,
            None => return Ok(None),
        };

        let n = training.len();
        // tolerance keeps 60 * 0.1 from rounding up to 7
        let test = ((n as f64) * ratio - 1e-9).ceil().max(0.0) as usize;
        let train = n.saturating_sub(test);
        if test == 0 || train < MIN_OBSERVATIONS {
            warn!(samples = n, ratio, "training set too short for hold-out validation");
            return Ok(None);
        }

        match self.score_tail(training, train) {
            Ok(accuracy) => {
                debug!(train, test, mae = accuracy.mae, "hold-out validation");
                Ok(Some(accuracy))
            }
            // the full-window forecast does not depend on this fit
            Err(err) => {
                warn!(train, test, error = %err, "hold-out fit failed, skipping validation");
                Ok(None)
            }
        }
    }

    fn score_tail(&self, training: &TrainingSet, train: usize) -> Result<ForecastAccuracy> {
        let fitted = self.regressor.fit(&training.slice(0..train)?)?;
        let predicted: Vec<f64> = training.features()[train..]
            .iter()
            .map(|&x| fitted.evaluate(x))
            .collect();
        Ok(forecast_accuracy(&predicted, &training.targets()[train..])?)
    }

    /// Forecast plus optional hold-out validation
    pub fn run(&self, prepared: &PreparedData, horizon: i64) -> Result<EngineOutput> {
        let (forecast, fitted) = self.forecast(prepared, horizon)?;
        let validation = self.holdout_accuracy(&prepared.training)?;

        Ok(EngineOutput {
            forecast,
            model: fitted.name().to_string(),
            validation,
        })
    }
}

/// Accept horizons in `1..=max_horizon`
pub fn validate_horizon(horizon: i64, max_horizon: usize) -> Result<usize> {
    if horizon <= 0 {
        return Err(ForecastError::InvalidHorizon(format!(
            "horizon must be positive, got {}",
            horizon
        )));
    }
    match usize::try_from(horizon) {
        Ok(h) if h <= max_horizon => Ok(h),
        _ => Err(ForecastError::InvalidHorizon(format!(
            "horizon {} exceeds the maximum of {}",
            horizon, max_horizon
        ))),
    }
}
