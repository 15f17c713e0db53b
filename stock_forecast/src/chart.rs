//! Chart-ready forecast output

use crate::engine::ForecastResult;
use crate::error::Result;
use crate::series::PricePoint;
use forecast_math::ForecastAccuracy;
use serde::{Deserialize, Serialize};

/// Historical and predicted series for one ticker, ready to plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastChart {
    pub symbol: String,
    /// Name of the fitted model
    pub model: String,
    /// Observed closing prices
    pub historical: Vec<PricePoint>,
    /// Predicted prices after the last observation
    pub forecast: ForecastResult,
    /// Hold-out accuracy of the model, when validation ran
    pub validation: Option<ForecastAccuracy>,
}

impl ForecastChart {
    /// Chart title
    pub fn title(&self) -> String {
        format!(
            "Predicted Close Price of next {} days",
            self.forecast.horizons()
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_json_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let chart = ForecastChart {
            symbol: "ACME".to_string(),
            model: "Linear Regression".to_string(),
            historical: vec![PricePoint::new(date.pred_opt().unwrap(), 10.0)],
            forecast: ForecastResult::new(vec![PricePoint::new(date, 11.5)], 1).unwrap(),
            validation: None,
        };

        let value: serde_json::Value = serde_json::from_str(&chart.to_json().unwrap()).unwrap();
        assert_eq!(value["symbol"], "ACME");
        assert_eq!(value["forecast"][0]["date"], "2024-01-08");
        assert_eq!(value["forecast"][0]["price"], 11.5);
        assert!(value["validation"].is_null());
        assert_eq!(chart.title(), "Predicted Close Price of next 1 days");

        let parsed: ForecastChart = serde_json::from_str(&chart.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, chart);
    }
}
