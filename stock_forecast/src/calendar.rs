//! Observation frequency detection and date extension

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Spacing between consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// One Monday-to-Friday trading day per step
    BusinessDay,
    /// A fixed number of calendar days per step
    Days(u32),
}

impl Frequency {
    /// Infer the frequency of a date sequence.
    ///
    /// A sequence made only of weekdays whose most common gap is one
    /// business day is treated as business-daily (holiday gaps are
    /// tolerated). Anything else uses its most common calendar gap, with
    /// ties going to the shorter gap.
    pub fn detect(dates: &[NaiveDate]) -> Result<Self> {
        if dates.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least 2 dates to detect a frequency, got {}",
                dates.len()
            )));
        }

        if dates.iter().all(|d| is_weekday(*d)) {
            let gaps = dates
                .windows(2)
                .map(|w| business_days_between(w[0], w[1]));
            if most_common(gaps) == Some(1) {
                return Ok(Frequency::BusinessDay);
            }
        }

        let gaps = dates.windows(2).map(|w| (w[1] - w[0]).num_days());
        match most_common(gaps) {
            Some(days) if days > 0 => u32::try_from(days)
                .map(Frequency::Days)
                .map_err(|_| {
                    ForecastError::MalformedSeries(format!("gap of {} days is too large", days))
                }),
            _ => Err(ForecastError::MalformedSeries(
                "dates must be strictly increasing".to_string(),
            )),
        }
    }

    /// Check that the frequency advances time
    pub fn validate(&self) -> Result<()> {
        match self {
            Frequency::Days(0) => Err(ForecastError::InvalidParameter(
                "frequency must be at least one day".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// The date one period after `date`
    pub fn next(&self, date: NaiveDate) -> Result<NaiveDate> {
        let overflow = || ForecastError::InvalidHorizon(format!("date overflow after {}", date));
        match *self {
            Frequency::BusinessDay => {
                let mut next = date.succ_opt().ok_or_else(overflow)?;
                while !is_weekday(next) {
                    next = next.succ_opt().ok_or_else(overflow)?;
                }
                Ok(next)
            }
            Frequency::Days(n) => date
                .checked_add_days(Days::new(u64::from(n)))
                .ok_or_else(overflow),
        }
    }

    /// `count` consecutive dates following `last`
    pub fn extend(&self, last: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::with_capacity(count);
        let mut current = last;
        for _ in 0..count {
            current = self.next(current)?;
            dates.push(current);
        }
        Ok(dates)
    }
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of weekdays in `(from, to]`
pub fn business_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    if to <= from {
        return 0;
    }
    let total = (to - from).num_days();
    let weeks = total / 7;
    let mut count = weeks * 5;
    let mut current = from + chrono::Duration::days(weeks * 7);
    while current < to {
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if is_weekday(current) {
            count += 1;
        }
    }
    count
}

/// Mode of a sequence, smallest value on ties
fn most_common(values: impl Iterator<Item = i64>) -> Option<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mut best: Option<(i64, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[rstest]
    #[case("2024-01-05", "2024-01-08")] // Friday -> Monday
    #[case("2024-01-08", "2024-01-09")]
    #[case("2024-01-06", "2024-01-08")] // Saturday -> Monday
    fn test_next_business_day(#[case] from: &str, #[case] expected: &str) {
        assert_eq!(Frequency::BusinessDay.next(date(from)).unwrap(), date(expected));
    }

    #[test]
    fn test_business_days_between() {
        assert_eq!(business_days_between(date("2024-01-05"), date("2024-01-08")), 1);
        assert_eq!(business_days_between(date("2024-01-01"), date("2024-01-15")), 10);
        assert_eq!(business_days_between(date("2024-01-08"), date("2024-01-08")), 0);
    }

    #[test]
    fn test_detect_business_days_with_holiday() {
        // 2024-01-15 is skipped as a market holiday
        let dates: Vec<NaiveDate> = [
            "2024-01-10", "2024-01-11", "2024-01-12", "2024-01-16", "2024-01-17", "2024-01-18",
        ]
        .iter()
        .map(|s| date(s))
        .collect();
        assert_eq!(Frequency::detect(&dates).unwrap(), Frequency::BusinessDay);
    }

    #[rstest]
    #[case(&["2023-01-01", "2023-01-02", "2023-01-03"], Frequency::Days(1))]
    #[case(&["2024-01-01", "2024-01-08", "2024-01-15"], Frequency::Days(7))]
    #[case(&["2024-01-06", "2024-01-08", "2024-01-10"], Frequency::Days(2))]
    fn test_detect_calendar_days(#[case] input: &[&str], #[case] expected: Frequency) {
        let dates: Vec<NaiveDate> = input.iter().map(|s| date(s)).collect();
        assert_eq!(Frequency::detect(&dates).unwrap(), expected);
    }

    #[test]
    fn test_detect_errors() {
        assert!(matches!(
            Frequency::detect(&[date("2024-01-01")]),
            Err(ForecastError::InsufficientData(_))
        ));
        assert!(matches!(
            Frequency::detect(&[date("2024-01-02"), date("2024-01-01")]),
            Err(ForecastError::MalformedSeries(_))
        ));
    }

    #[test]
    fn test_extend() {
        let dates = Frequency::Days(7).extend(date("2024-02-26"), 2).unwrap();
        assert_eq!(dates, vec![date("2024-03-04"), date("2024-03-11")]);
        assert!(Frequency::Days(1).extend(NaiveDate::MAX, 1).is_err());
        assert!(Frequency::Days(0).validate().is_err());
    }
}
