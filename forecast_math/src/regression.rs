//! Ordinary least squares line fit

use crate::{MathError, Result};

/// `y = slope * x + intercept` fitted by least squares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeastSquaresLine {
    slope: f64,
    intercept: f64,
    r_squared: f64,
}

impl LeastSquaresLine {
    /// Fit a line through `(x, y)` samples
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature length ({}) doesn't match target length ({})",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for linear regression. Need at least 2 points.".to_string(),
            ));
        }

        let n = x.len() as f64;
        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            numerator += (xi - x_mean) * (yi - y_mean);
            denominator += (xi - x_mean) * (xi - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            ss_total += (yi - y_mean).powi(2);
            ss_residual += (yi - (slope * xi + intercept)).powi(2);
        }
        // a flat target is explained perfectly by a flat line
        let r_squared = if ss_total.abs() < 1e-10 {
            1.0
        } else {
            1.0 - ss_residual / ss_total
        };

        if !slope.is_finite() || !intercept.is_finite() {
            return Err(MathError::CalculationError(
                "Regression parameters are not finite".to_string(),
            ));
        }

        Ok(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of determination on the fitted samples
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_perfect_line() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [10.0, 12.0, 14.0, 16.0, 18.0];
        let line = LeastSquaresLine::fit(&x, &y).unwrap();

        assert_approx_eq!(line.slope(), 2.0);
        assert_approx_eq!(line.intercept(), 10.0);
        assert_approx_eq!(line.r_squared(), 1.0);
        assert_approx_eq!(line.predict(7.0), 24.0);
    }

    #[test]
    fn test_noisy_line() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [100.0, 102.0, 101.0, 105.0, 107.0];
        let line = LeastSquaresLine::fit(&x, &y).unwrap();

        assert_approx_eq!(line.slope(), 1.7);
        assert!(line.r_squared() > 0.8 && line.r_squared() < 1.0);
    }

    #[test]
    fn test_degenerate_features() {
        let result = LeastSquaresLine::fit(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(MathError::CalculationError(_))));

        let result = LeastSquaresLine::fit(&[1.0], &[1.0]);
        assert!(matches!(result, Err(MathError::InsufficientData(_))));
    }
}
