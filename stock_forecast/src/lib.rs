//! # Stock Forecast
//!
//! Short-horizon closing price forecasts from historical stock data.
//!
//! A request runs two stages:
//!
//! - **Data preparation** ([`preparation`]): the historical series becomes a
//!   training set whose feature is the day index `0..N-1` and whose target
//!   is the closing price, plus the date axis used to label forecasts.
//! - **Forecast engine** ([`engine`]): a [`Regressor`] (RBF support vector
//!   regression by default) is fitted to the training set and evaluated at
//!   indices `N..N+H-1`; the predictions are dated by continuing the
//!   series' own frequency.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stock_forecast::{prediction, CsvDirectorySource, ForecastConfig};
//!
//! let source = CsvDirectorySource::new("data");
//! let chart = prediction(&source, "AAPL", 5, &ForecastConfig::default())?;
//!
//! for point in chart.forecast.points() {
//!     println!("{} {:.2}", point.date, point.price);
//! }
//! # Ok::<(), stock_forecast::ForecastError>(())
//! ```

pub mod calendar;
pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod preparation;
pub mod series;
pub mod source;

// Re-export commonly used types
pub use crate::calendar::Frequency;
pub use crate::chart::ForecastChart;
pub use crate::config::ForecastConfig;
pub use crate::engine::{ForecastEngine, ForecastResult};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{FittedModel, ModelKind, Regressor};
pub use crate::pipeline::{forecast_series, prediction};
pub use crate::preparation::{prepare, DateAxis, PreparedData, TrainingSet};
pub use crate::series::{HistoricalSeries, PricePoint};
pub use crate::source::{CsvDirectorySource, InMemorySource, PriceSource};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
