//! # Forecast Math
//!
//! Numerical building blocks used by the stock forecasting pipeline.
//! This crate knows nothing about dates or tickers; it works on plain
//! `f64` samples.
//!
//! - [`kernel`]: kernel functions for kernel regression
//! - [`svr`]: epsilon-insensitive support vector regression (SMO solver)
//! - [`regression`]: ordinary least squares line fit
//! - [`scaling`]: target standardisation
//! - [`accuracy`]: forecast error metrics

use thiserror::Error;

pub mod accuracy;
pub mod kernel;
pub mod regression;
pub mod scaling;
pub mod svr;

pub use accuracy::{forecast_accuracy, ForecastAccuracy};
pub use kernel::{Kernel, KernelKind};
pub use regression::LeastSquaresLine;
pub use scaling::StandardScaler;
pub use svr::{SvrModel, SvrParams};

/// Errors that can occur in forecasting math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Solver did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::NotConverged { iterations: 42 };
        assert_eq!(err.to_string(), "Solver did not converge after 42 iterations");

        let err = MathError::InvalidInput("gamma must be positive".to_string());
        assert!(err.to_string().contains("gamma must be positive"));
    }
}
