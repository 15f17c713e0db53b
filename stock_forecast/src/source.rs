//! Price sources: resolve a ticker symbol to its historical series
//!
//! Fetching quotes from a market-data service belongs to the caller. The
//! core only needs something that implements [`PriceSource`]; this module
//! provides a CSV directory reader and an in-memory map.

use crate::error::{ForecastError, Result};
use crate::series::{HistoricalSeries, PricePoint};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Anything that can produce the closing price history of a ticker
pub trait PriceSource {
    fn history(&self, symbol: &str) -> Result<HistoricalSeries>;
}

/// One row of a price CSV. Columns other than date and close are ignored.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(alias = "Date", alias = "DATE")]
    date: String,
    #[serde(alias = "Close", alias = "CLOSE")]
    close: Option<f64>,
}

/// Read a `Date,Close` CSV (header required) into a series.
///
/// Dates may carry a time suffix (`2024-01-02 00:00:00-05:00`); only the
/// calendar day is kept. Rows with an empty close are skipped. The rows must
/// already be in strictly increasing date order.
pub fn read_price_csv<R: Read>(reader: R) -> Result<HistoricalSeries> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for (row, record) in csv_reader.deserialize::<PriceRecord>().enumerate() {
        let record = record?;
        let date = parse_date(&record.date).ok_or_else(|| {
            ForecastError::MalformedSeries(format!(
                "row {}: cannot parse date '{}'",
                row + 1,
                record.date
            ))
        })?;
        match record.close {
            Some(price) => points.push(PricePoint::new(date, price)),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "skipped rows without a close price");
    }
    HistoricalSeries::new(points)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let day = text.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Reads `<root>/<SYMBOL>.csv`
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the CSV file for a symbol, `None` if the symbol could not be
    /// a file name on its own
    pub fn path_for(&self, symbol: &str) -> Option<PathBuf> {
        let valid = !symbol.is_empty()
            && !symbol.starts_with('.')
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '^' | '='));
        valid.then(|| self.root.join(format!("{}.csv", symbol)))
    }
}

impl PriceSource for CsvDirectorySource {
    fn history(&self, symbol: &str) -> Result<HistoricalSeries> {
        let path = self
            .path_for(symbol)
            .ok_or_else(|| ForecastError::UnknownSymbol(symbol.to_string()))?;
        if !path.is_file() {
            return Err(ForecastError::UnknownSymbol(symbol.to_string()));
        }

        debug!(symbol, path = %path.display(), "loading price history");
        read_price_csv(File::open(&path)?)
    }
}

/// Series held in memory, keyed by symbol
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, HistoricalSeries>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, series: HistoricalSeries) -> Self {
        self.insert(symbol, series);
        self
    }

    pub fn insert(&mut self, symbol: &str, series: HistoricalSeries) {
        self.series.insert(symbol.to_string(), series);
    }
}

impl PriceSource for InMemorySource {
    fn history(&self, symbol: &str) -> Result<HistoricalSeries> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| ForecastError::UnknownSymbol(symbol.to_string()))
    }
}
