//! Error types for the stock_forecast crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the stock_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few observations to fit a model
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Dates out of order, duplicated, or prices that are not numbers
    #[error("Malformed series: {0}")]
    MalformedSeries(String),

    /// Horizon outside `1..=max_horizon`
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(String),

    /// The regressor could not be fitted to otherwise valid input
    #[error("Model fit failed: {0}")]
    ModelFit(String),

    /// Error from invalid configuration parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The price source has no data for this ticker
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV decoding
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON encoding or decoding
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ForecastError {
    /// True for errors caused by the request itself, detected before any
    /// model is fitted.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientData(_)
                | ForecastError::MalformedSeries(_)
                | ForecastError::InvalidHorizon(_)
                | ForecastError::InvalidParameter(_)
                | ForecastError::UnknownSymbol(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::ModelFit(err.to_string())
    }
}
