//! Linear trend regression

use crate::error::Result;
use crate::models::{ensure_distinct_features, FittedModel, Regressor};
use crate::preparation::TrainingSet;
use forecast_math::LeastSquaresLine;

/// Least squares trend line over the day index
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    name: String,
}

/// Fitted trend line
#[derive(Debug, Clone)]
pub struct FittedLinear {
    name: String,
    line: LeastSquaresLine,
}

impl LinearRegressor {
    pub fn new() -> Self {
        Self {
            name: "Linear Regression".to_string(),
        }
    }
}

impl Default for LinearRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for LinearRegressor {
    type Fitted = FittedLinear;

    fn fit(&self, training: &TrainingSet) -> Result<FittedLinear> {
        ensure_distinct_features(training)?;
        let line = LeastSquaresLine::fit(training.features(), training.targets())?;

        Ok(FittedLinear {
            name: format!(
                "{} (slope={:.4}, intercept={:.4})",
                self.name,
                line.slope(),
                line.intercept()
            ),
            line,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedLinear {
    pub fn slope(&self) -> f64 {
        self.line.slope()
    }

    pub fn r_squared(&self) -> f64 {
        self.line.r_squared()
    }
}

impl FittedModel for FittedLinear {
    fn evaluate(&self, index: f64) -> f64 {
        self.line.predict(index)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
