//! Historical price series

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated price, used for both observed and predicted values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Closing prices ordered by strictly increasing date
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct HistoricalSeries {
    points: Vec<PricePoint>,
}

impl HistoricalSeries {
    /// Create a series, rejecting anything that is not already clean.
    ///
    /// Dates must be strictly increasing (so no duplicates) and every price
    /// must be finite. An empty series is accepted here; its length is
    /// checked when it is prepared for training.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        check_prices(&points)?;

        if let Some(pos) = points.windows(2).position(|w| w[1].date <= w[0].date) {
            let (prev, next) = (points[pos].date, points[pos + 1].date);
            let reason = if prev == next {
                format!("duplicate date {} at position {}", next, pos + 1)
            } else {
                format!("date {} at position {} comes after {}", next, pos + 1, prev)
            };
            return Err(ForecastError::MalformedSeries(reason));
        }

        Ok(Self { points })
    }

    /// Create a series from points in any order.
    ///
    /// Points are sorted by date; when a date appears more than once the
    /// last occurrence in the input wins. Non-finite prices are still
    /// rejected.
    pub fn normalized(mut points: Vec<PricePoint>) -> Result<Self> {
        check_prices(&points)?;

        // stable sort keeps input order within a date
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Ok(Self { points: deduped })
    }

    /// Create a series from parallel date and price columns
    pub fn from_columns(dates: Vec<NaiveDate>, prices: Vec<f64>) -> Result<Self> {
        if dates.len() != prices.len() {
            return Err(ForecastError::MalformedSeries(format!(
                "Dates length ({}) doesn't match prices length ({})",
                dates.len(),
                prices.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(prices)
                .map(|(date, price)| PricePoint::new(date, price))
                .collect(),
        )
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The trailing `n` observations (the whole series if shorter)
    pub fn tail(&self, n: usize) -> Self {
        let start = self.points.len().saturating_sub(n);
        Self {
            points: self.points[start..].to_vec(),
        }
    }

    /// Lowest and highest price, `None` for an empty series
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.price, p.price)),
            Some((lo, hi)) => Some((lo.min(p.price), hi.max(p.price))),
        })
    }
}

fn check_prices(points: &[PricePoint]) -> Result<()> {
    match points.iter().find(|p| !p.price.is_finite()) {
        Some(bad) => Err(ForecastError::MalformedSeries(format!(
            "price on {} is not a finite number",
            bad.date
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_tail_and_range() {
        let series =
            HistoricalSeries::from_columns(vec![day(1), day(4), day(5)], vec![10.0, 8.0, 12.0])
                .unwrap();

        assert_eq!(series.price_range(), Some((8.0, 12.0)));
        assert_eq!(series.tail(2).dates(), vec![day(4), day(5)]);
        assert_eq!(series.tail(10).len(), 3);
        assert_eq!(HistoricalSeries::default().price_range(), None);
    }

    #[test]
    fn test_column_length_mismatch() {
        let result = HistoricalSeries::from_columns(vec![day(1)], vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::MalformedSeries(_))));
    }
}
