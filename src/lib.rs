//! # Stock predictor
//!
//! Umbrella crate for the workspace. The numerical core lives in
//! [`forecast_math`]; series handling, models and the `prediction`
//! operation live in [`stock_forecast`].
//!
//! ## Example
//!
//! ```
//! use stock_predictor_workspace::stock_forecast::{forecast_series, ForecastConfig, HistoricalSeries};
//! use chrono::NaiveDate;
//!
//! let dates: Vec<NaiveDate> = (1..=5)
//!     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
//!     .collect();
//! let series = HistoricalSeries::from_columns(dates, vec![100.0, 102.0, 101.0, 105.0, 107.0]).unwrap();
//!
//! let chart = forecast_series("ACME", &series, 3, &ForecastConfig::default()).unwrap();
//! assert_eq!(chart.forecast.horizons(), 3);
//! ```

pub use forecast_math;
pub use stock_forecast;

/// Version of the workspace crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
