//! Regression strategies behind a common interface
//!
//! A [`Regressor`] is the fixed configuration of a model. Fitting it to a
//! [`TrainingSet`] produces a [`FittedModel`] that maps a day index to a
//! price. Fitted models are owned by a single request and never cached.

use crate::error::{ForecastError, Result};
use crate::preparation::TrainingSet;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod grid_search;
pub mod linear;
pub mod svr;

pub use grid_search::{GridSearch, GridSearchSvr};
pub use linear::{FittedLinear, LinearRegressor};
pub use svr::{FittedSvr, SvrRegressor};

/// A regression function fitted to one training set
pub trait FittedModel: Debug {
    /// Predicted price at a (possibly fractional) day index
    fn evaluate(&self, index: f64) -> f64;

    /// Name of the model, including its parameters
    fn name(&self) -> &str;
}

/// Regression model that can be fitted to a training set
pub trait Regressor: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Fit the model to the training set
    fn fit(&self, training: &TrainingSet) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Which regressor a configuration selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Support vector regression with fixed hyper-parameters
    #[default]
    Svr,
    /// Ordinary least squares trend line
    Linear,
    /// Support vector regression with grid-searched hyper-parameters
    GridSearch,
}

/// Reject training sets whose features cannot separate observations
pub(crate) fn ensure_distinct_features(training: &TrainingSet) -> Result<()> {
    let features = training.features();
    let first = features[0];
    if features.iter().all(|&f| f == first) {
        return Err(ForecastError::ModelFit(format!(
            "all {} feature values are identical ({})",
            features.len(),
            first
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_features_rejected() {
        let training = TrainingSet::new(vec![4.0, 4.0, 4.0], vec![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            ensure_distinct_features(&training),
            Err(ForecastError::ModelFit(_))
        ));

        let training = TrainingSet::new(vec![0.0, 1.0], vec![1.0, 1.0]).unwrap();
        assert!(ensure_distinct_features(&training).is_ok());
    }

    #[test]
    fn test_model_kind_names() {
        let kind: ModelKind = serde_json::from_str("\"grid_search\"").unwrap();
        assert_eq!(kind, ModelKind::GridSearch);
        assert_eq!(serde_json::to_string(&ModelKind::Svr).unwrap(), "\"svr\"");
    }
}
