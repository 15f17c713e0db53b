//! Data preparation: historical series to regression samples
//!
//! Each observation of the (optionally windowed) series gets an integer day
//! index `0..N-1` in chronological order. The index is the regression
//! feature and the closing price, unmodified, is the target. The
//! [`DateAxis`] keeps the way back from an index to a calendar date.

use crate::calendar::Frequency;
use crate::error::{ForecastError, Result};
use crate::series::HistoricalSeries;
use chrono::NaiveDate;
use std::ops::Range;
use tracing::debug;

/// Minimum number of observations that can support a fit
pub const MIN_OBSERVATIONS: usize = 2;

/// `(feature, target)` samples in chronological order
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    features: Vec<f64>,
    targets: Vec<f64>,
}

impl TrainingSet {
    /// Create a training set from explicit samples
    pub fn new(features: Vec<f64>, targets: Vec<f64>) -> Result<Self> {
        if features.len() != targets.len() {
            return Err(ForecastError::MalformedSeries(format!(
                "Features length ({}) doesn't match targets length ({})",
                features.len(),
                targets.len()
            )));
        }
        if features.len() < MIN_OBSERVATIONS {
            return Err(insufficient(features.len()));
        }
        if features.iter().chain(targets.iter()).any(|v| !v.is_finite()) {
            return Err(ForecastError::MalformedSeries(
                "Training samples contain non-finite values".to_string(),
            ));
        }

        Ok(Self { features, targets })
    }

    /// Day index `i` paired with the close of the `i`-th observation
    pub fn from_series(series: &HistoricalSeries) -> Result<Self> {
        let features = (0..series.len()).map(|i| i as f64).collect();
        Self::new(features, series.prices())
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Sub-range of samples, at least [`MIN_OBSERVATIONS`] long
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.end > self.len() || range.start > range.end {
            return Err(ForecastError::InvalidParameter(format!(
                "Range {:?} out of bounds for {} samples",
                range,
                self.len()
            )));
        }
        Self::new(
            self.features[range.clone()].to_vec(),
            self.targets[range].to_vec(),
        )
    }
}

/// Mapping from day index to calendar date
#[derive(Debug, Clone, PartialEq)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
    frequency: Frequency,
}

impl DateAxis {
    pub fn new(dates: Vec<NaiveDate>, frequency: Frequency) -> Result<Self> {
        frequency.validate()?;
        if dates.is_empty() {
            return Err(insufficient(0));
        }
        Ok(Self { dates, frequency })
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_date(&self) -> NaiveDate {
        // non-empty by construction
        self.dates[self.dates.len() - 1]
    }

    /// Calendar date of a day index, extending past the observed range by
    /// stepping the frequency
    pub fn date_of(&self, index: usize) -> Result<NaiveDate> {
        match self.dates.get(index) {
            Some(date) => Ok(*date),
            None => {
                let steps = index + 1 - self.dates.len();
                let extended = self.frequency.extend(self.last_date(), steps)?;
                extended
                    .last()
                    .copied()
                    .ok_or_else(|| ForecastError::InvalidHorizon("empty extension".to_string()))
            }
        }
    }

    /// Dates for the `count` indices right after the observed range
    pub fn future_dates(&self, count: usize) -> Result<Vec<NaiveDate>> {
        self.frequency.extend(self.last_date(), count)
    }
}

/// Output of data preparation
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub training: TrainingSet,
    pub axis: DateAxis,
}

/// Options that shape preparation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreparationOptions {
    /// Keep only the trailing observations for training
    pub training_window: Option<usize>,
    /// Fixed frequency; detected from the series when `None`
    pub frequency: Option<Frequency>,
}

/// Turn a historical series into a training set and its date axis.
///
/// The frequency is detected over the full series so that a short training
/// window does not change how forecast dates advance.
pub fn prepare(series: &HistoricalSeries, options: PreparationOptions) -> Result<PreparedData> {
    if series.len() < MIN_OBSERVATIONS {
        return Err(insufficient(series.len()));
    }

    let frequency = match options.frequency {
        Some(freq) => freq,
        None => Frequency::detect(&series.dates())?,
    };

    let window = match options.training_window {
        Some(w) if w < MIN_OBSERVATIONS => {
            return Err(ForecastError::InvalidParameter(format!(
                "training window must be at least {}, got {}",
                MIN_OBSERVATIONS, w
            )))
        }
        Some(w) => series.tail(w),
        None => series.clone(),
    };

    let training = TrainingSet::from_series(&window)?;
    let axis = DateAxis::new(window.dates(), frequency)?;

    debug!(
        observations = series.len(),
        training = training.len(),
        ?frequency,
        "prepared training set"
    );

    Ok(PreparedData { training, axis })
}

fn insufficient(len: usize) -> ForecastError {
    ForecastError::InsufficientData(format!(
        "Need at least {} observations, got {}",
        MIN_OBSERVATIONS, len
    ))
}
