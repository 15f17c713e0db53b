//! Support vector regression on the day index
//!
//! Targets are standardised before fitting (`z = (price - mean) / std`, with
//! a zero standard deviation replaced by 1) and every prediction is mapped
//! back to price units, so `C` and `epsilon` are expressed relative to the
//! spread of the training prices. Features are used as-is; `gamma` is in
//! inverse squared days.

use crate::error::{ForecastError, Result};
use crate::models::{ensure_distinct_features, FittedModel, Regressor};
use crate::preparation::TrainingSet;
use forecast_math::kernel::KernelKind;
use forecast_math::{StandardScaler, SvrModel, SvrParams};
use tracing::debug;

/// Epsilon-SVR with fixed hyper-parameters
#[derive(Debug, Clone)]
pub struct SvrRegressor {
    /// Name of the model
    name: String,
    params: SvrParams,
}

/// Fitted SVR model together with its target scaling
#[derive(Debug, Clone)]
pub struct FittedSvr {
    name: String,
    params: SvrParams,
    model: SvrModel,
    scaler: StandardScaler,
}

impl SvrRegressor {
    /// Create a new SVR regressor
    pub fn new(params: SvrParams) -> Result<Self> {
        params
            .validate()
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        Ok(Self {
            name: describe(&params),
            params,
        })
    }

    pub fn params(&self) -> &SvrParams {
        &self.params
    }
}

impl Default for SvrRegressor {
    fn default() -> Self {
        let params = SvrParams::default();
        Self {
            name: describe(&params),
            params,
        }
    }
}

impl Regressor for SvrRegressor {
    type Fitted = FittedSvr;

    fn fit(&self, training: &TrainingSet) -> Result<FittedSvr> {
        ensure_distinct_features(training)?;

        let scaler = StandardScaler::fit(training.targets())?;
        let scaled = scaler.transform_all(training.targets());
        let model = SvrModel::fit(training.features(), &scaled, &self.params)?;

        debug!(
            model = %self.name,
            samples = training.len(),
            support_vectors = model.support_vector_count(),
            iterations = model.iterations(),
            "fitted SVR"
        );

        Ok(FittedSvr {
            name: self.name.clone(),
            params: self.params,
            model,
            scaler,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedSvr {
    pub fn params(&self) -> &SvrParams {
        &self.params
    }

    pub fn support_vector_count(&self) -> usize {
        self.model.support_vector_count()
    }
}

impl FittedModel for FittedSvr {
    fn evaluate(&self, index: f64) -> f64 {
        self.scaler.inverse_transform(self.model.predict(index))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub(crate) fn describe(params: &SvrParams) -> String {
    match params.kernel {
        KernelKind::Rbf => format!(
            "SVR (kernel=rbf, C={}, gamma={}, epsilon={})",
            params.c, params.gamma, params.epsilon
        ),
        KernelKind::Linear => format!(
            "SVR (kernel=linear, C={}, epsilon={})",
            params.c, params.epsilon
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_flat_prices_predict_constant() {
        let training = TrainingSet::new(vec![0.0, 1.0, 2.0, 3.0], vec![42.5; 4]).unwrap();
        let fitted = SvrRegressor::default().fit(&training).unwrap();

        for index in [4.0, 10.0, 100.0] {
            assert_approx_eq!(fitted.evaluate(index), 42.5);
        }
    }

    #[test]
    fn test_fit_tracks_training_prices() {
        let targets: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 / 4.0).sin() * 5.0).collect();
        let features: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let training = TrainingSet::new(features, targets.clone()).unwrap();

        let regressor = SvrRegressor::new(SvrParams::rbf(10.0, 0.1, 0.05)).unwrap();
        let fitted = regressor.fit(&training).unwrap();

        for (i, target) in targets.iter().enumerate() {
            assert!((fitted.evaluate(i as f64) - target).abs() < 1.0);
        }
        assert!(fitted.support_vector_count() > 0);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = SvrRegressor::new(SvrParams {
            c: -1.0,
            ..SvrParams::default()
        });
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn test_name_lists_hyper_parameters() {
        let regressor = SvrRegressor::new(SvrParams::rbf(10.0, 0.5, 0.1)).unwrap();
        assert_eq!(regressor.name(), "SVR (kernel=rbf, C=10, gamma=0.5, epsilon=0.1)");
    }
}
