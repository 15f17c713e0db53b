//! Target standardisation

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Standard deviations below this are treated as a constant series
const MIN_SCALE: f64 = 1e-12;

/// Z-score scaler: `z = (v - mean) / scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    scale: f64,
}

impl StandardScaler {
    /// Fit the scaler to a set of values.
    ///
    /// A constant input gets a scale of 1 so that it maps to all zeros
    /// instead of dividing by zero.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a scaler on an empty sample".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Sample contains non-finite values".to_string(),
            ));
        }

        let mean = values.mean();
        let std_dev = values.population_std_dev();
        let scale = if std_dev.is_finite() && std_dev > MIN_SCALE {
            std_dev
        } else {
            1.0
        };

        Ok(Self { mean, scale })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }

    pub fn inverse_transform(&self, value: f64) -> f64 {
        value * self.scale + self.mean
    }

    /// Transform a whole slice
    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_round_trip() {
        let scaler = StandardScaler::fit(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_approx_eq!(scaler.mean(), 5.0);
        assert_approx_eq!(scaler.scale(), 2.0);
        assert_approx_eq!(scaler.transform(9.0), 2.0);
        assert_approx_eq!(scaler.inverse_transform(scaler.transform(3.3)), 3.3);
    }

    #[test]
    fn test_constant_input() {
        let scaler = StandardScaler::fit(&[101.5; 4]).unwrap();
        assert_eq!(scaler.scale(), 1.0);
        assert_eq!(scaler.transform_all(&[101.5, 101.5]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            StandardScaler::fit(&[]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            StandardScaler::fit(&[1.0, f64::NAN]),
            Err(MathError::InvalidInput(_))
        ));
    }
}
