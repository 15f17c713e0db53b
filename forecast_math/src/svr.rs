//! Epsilon-insensitive support vector regression
//!
//! The dual problem is solved with sequential minimal optimisation using
//! second-order working set selection. Variables `0..l` hold the `alpha`
//! multipliers and `l..2l` hold `alpha*`, so the model coefficient of sample
//! `i` is `alpha[i] - alpha[i + l]`.
//!
//! The solver has no randomised step: the same samples and parameters always
//! give the same model.

use crate::kernel::{Kernel, KernelKind};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Substitute for a non-positive curvature in the two-variable subproblem
const TAU: f64 = 1e-12;

/// Hyper-parameters of an epsilon-SVR model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvrParams {
    /// Kernel family
    pub kernel: KernelKind,
    /// Regularisation strength
    #[serde(rename = "C")]
    pub c: f64,
    /// RBF kernel coefficient, ignored by the linear kernel
    pub gamma: f64,
    /// Half width of the insensitive tube
    pub epsilon: f64,
    /// Stopping tolerance on the KKT violation
    pub tolerance: f64,
    /// Maximum number of SMO iterations before giving up
    pub max_iter: usize,
}

impl Default for SvrParams {
    fn default() -> Self {
        Self {
            kernel: KernelKind::Rbf,
            c: 1.0,
            gamma: 0.1,
            epsilon: 0.1,
            tolerance: 1e-3,
            max_iter: 1_000_000,
        }
    }
}

impl SvrParams {
    /// RBF parameters with the given `C`, `gamma` and `epsilon`
    pub fn rbf(c: f64, gamma: f64, epsilon: f64) -> Self {
        Self {
            kernel: KernelKind::Rbf,
            c,
            gamma,
            epsilon,
            ..Self::default()
        }
    }

    /// Check that every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(MathError::InvalidInput(format!(
                "C must be positive, got {}",
                self.c
            )));
        }
        if self.kernel == KernelKind::Rbf && !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(MathError::InvalidInput(format!(
                "gamma must be positive, got {}",
                self.gamma
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(MathError::InvalidInput(format!(
                "epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MathError::InvalidInput(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iter == 0 {
            return Err(MathError::InvalidInput(
                "max_iter must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The kernel function these parameters describe
    pub fn kernel(&self) -> Kernel {
        match self.kernel {
            KernelKind::Rbf => Kernel::Rbf { gamma: self.gamma },
            KernelKind::Linear => Kernel::Linear,
        }
    }
}

/// A fitted SVR model
#[derive(Debug, Clone)]
pub struct SvrModel {
    kernel: Kernel,
    /// Support vectors (samples with a non-zero coefficient)
    support: Vec<f64>,
    /// `alpha - alpha*` for each support vector
    coefficients: Vec<f64>,
    rho: f64,
    iterations: usize,
}

impl SvrModel {
    /// Fit an epsilon-SVR model to `(x, y)` samples
    pub fn fit(x: &[f64], y: &[f64], params: &SvrParams) -> Result<Self> {
        params.validate()?;

        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature length ({}) doesn't match target length ({})",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(MathError::InsufficientData(
                "SVR needs at least 2 samples".to_string(),
            ));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Samples contain non-finite values".to_string(),
            ));
        }

        let kernel = params.kernel();
        let l = x.len();
        let gram = kernel.gram_matrix(x);
        let mut solver = Solver::new(&gram, y, params);
        let iterations = solver.solve(params.max_iter, params.tolerance)?;
        let rho = solver.rho();

        let mut support = Vec::new();
        let mut coefficients = Vec::new();
        for i in 0..l {
            let beta = solver.alpha[i] - solver.alpha[i + l];
            if beta != 0.0 {
                support.push(x[i]);
                coefficients.push(beta);
            }
        }

        if !rho.is_finite() || coefficients.iter().any(|b| !b.is_finite()) {
            return Err(MathError::CalculationError(
                "SVR solution is not finite".to_string(),
            ));
        }

        Ok(Self {
            kernel,
            support,
            coefficients,
            rho,
            iterations,
        })
    }

    /// Evaluate the decision function at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.support
            .iter()
            .zip(self.coefficients.iter())
            .map(|(&sv, &beta)| beta * self.kernel.eval(sv, x))
            .sum::<f64>()
            - self.rho
    }

    pub fn support_vector_count(&self) -> usize {
        self.support.len()
    }

    /// Number of SMO iterations the fit took
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Intercept term (the decision function subtracts it)
    pub fn rho(&self) -> f64 {
        self.rho
    }
}

/// SMO state for the `2l`-variable dual
struct Solver<'a> {
    gram: &'a [f64],
    l: usize,
    c: f64,
    alpha: Vec<f64>,
    grad: Vec<f64>,
}

impl<'a> Solver<'a> {
    fn new(gram: &'a [f64], y: &[f64], params: &SvrParams) -> Self {
        let l = y.len();
        // gradient at alpha = 0 is the linear term
        let grad = (0..2 * l)
            .map(|t| {
                if t < l {
                    params.epsilon - y[t]
                } else {
                    params.epsilon + y[t - l]
                }
            })
            .collect();

        Self {
            gram,
            l,
            c: params.c,
            alpha: vec![0.0; 2 * l],
            grad,
        }
    }

    fn sign(&self, t: usize) -> f64 {
        if t < self.l {
            1.0
        } else {
            -1.0
        }
    }

    fn k(&self, s: usize, t: usize) -> f64 {
        self.gram[(s % self.l) * self.l + t % self.l]
    }

    fn q(&self, s: usize, t: usize) -> f64 {
        self.sign(s) * self.sign(t) * self.k(s, t)
    }

    fn is_upper_bound(&self, t: usize) -> bool {
        self.alpha[t] >= self.c
    }

    fn is_lower_bound(&self, t: usize) -> bool {
        self.alpha[t] <= 0.0
    }

    fn solve(&mut self, max_iter: usize, tolerance: f64) -> Result<usize> {
        let mut iterations = 0;
        while let Some((i, j)) = self.select_working_set(tolerance) {
            if iterations >= max_iter {
                return Err(MathError::NotConverged { iterations });
            }
            iterations += 1;
            self.update_pair(i, j);

            if self.grad.iter().any(|g| !g.is_finite()) {
                return Err(MathError::CalculationError(
                    "SVR gradient became non-finite".to_string(),
                ));
            }
        }
        Ok(iterations)
    }

    /// Pick the maximal violating pair, `None` once the KKT gap is below
    /// `tolerance`.
    fn select_working_set(&self, tolerance: f64) -> Option<(usize, usize)> {
        let n = 2 * self.l;

        let mut gmax = f64::NEG_INFINITY;
        let mut gmax_idx = None;
        for t in 0..n {
            if self.sign(t) > 0.0 {
                if !self.is_upper_bound(t) && -self.grad[t] >= gmax {
                    gmax = -self.grad[t];
                    gmax_idx = Some(t);
                }
            } else if !self.is_lower_bound(t) && self.grad[t] >= gmax {
                gmax = self.grad[t];
                gmax_idx = Some(t);
            }
        }
        let i = gmax_idx?;

        let mut gmax2 = f64::NEG_INFINITY;
        let mut gmin_idx = None;
        let mut obj_diff_min = f64::INFINITY;
        for j in 0..n {
            let (grad_diff, quad_coef) = if self.sign(j) > 0.0 {
                if self.is_lower_bound(j) {
                    continue;
                }
                gmax2 = gmax2.max(self.grad[j]);
                (
                    gmax + self.grad[j],
                    self.k(i, i) + self.k(j, j) - 2.0 * self.sign(i) * self.q(i, j),
                )
            } else {
                if self.is_upper_bound(j) {
                    continue;
                }
                gmax2 = gmax2.max(-self.grad[j]);
                (
                    gmax - self.grad[j],
                    self.k(i, i) + self.k(j, j) + 2.0 * self.sign(i) * self.q(i, j),
                )
            };

            if grad_diff > 0.0 {
                let curvature = if quad_coef > 0.0 { quad_coef } else { TAU };
                let obj_diff = -(grad_diff * grad_diff) / curvature;
                if obj_diff <= obj_diff_min {
                    gmin_idx = Some(j);
                    obj_diff_min = obj_diff;
                }
            }
        }

        if gmax + gmax2 < tolerance {
            return None;
        }
        gmin_idx.map(|j| (i, j))
    }

    /// Solve the two-variable subproblem analytically and update the gradient
    fn update_pair(&mut self, i: usize, j: usize) {
        let c = self.c;
        let q_ij = self.q(i, j);
        let old_alpha_i = self.alpha[i];
        let old_alpha_j = self.alpha[j];

        if self.sign(i) != self.sign(j) {
            let quad_coef = self.k(i, i) + self.k(j, j) + 2.0 * q_ij;
            let quad_coef = if quad_coef > 0.0 { quad_coef } else { TAU };
            let delta = (-self.grad[i] - self.grad[j]) / quad_coef;
            let diff = self.alpha[i] - self.alpha[j];
            self.alpha[i] += delta;
            self.alpha[j] += delta;

            if diff > 0.0 {
                if self.alpha[j] < 0.0 {
                    self.alpha[j] = 0.0;
                    self.alpha[i] = diff;
                }
            } else if self.alpha[i] < 0.0 {
                self.alpha[i] = 0.0;
                self.alpha[j] = -diff;
            }
            // both variables share the same upper bound C
            if diff > 0.0 {
                if self.alpha[i] > c {
                    self.alpha[i] = c;
                    self.alpha[j] = c - diff;
                }
            } else if self.alpha[j] > c {
                self.alpha[j] = c;
                self.alpha[i] = c + diff;
            }
        } else {
            let quad_coef = self.k(i, i) + self.k(j, j) - 2.0 * q_ij;
            let quad_coef = if quad_coef > 0.0 { quad_coef } else { TAU };
            let delta = (self.grad[i] - self.grad[j]) / quad_coef;
            let sum = self.alpha[i] + self.alpha[j];
            self.alpha[i] -= delta;
            self.alpha[j] += delta;

            if sum > c {
                if self.alpha[i] > c {
                    self.alpha[i] = c;
                    self.alpha[j] = sum - c;
                }
            } else if self.alpha[j] < 0.0 {
                self.alpha[j] = 0.0;
                self.alpha[i] = sum;
            }
            if sum > c {
                if self.alpha[j] > c {
                    self.alpha[j] = c;
                    self.alpha[i] = sum - c;
                }
            } else if self.alpha[i] < 0.0 {
                self.alpha[i] = 0.0;
                self.alpha[j] = sum;
            }
        }

        let delta_i = self.alpha[i] - old_alpha_i;
        let delta_j = self.alpha[j] - old_alpha_j;
        for t in 0..self.grad.len() {
            let update = self.q(i, t) * delta_i + self.q(j, t) * delta_j;
            self.grad[t] += update;
        }
    }

    /// Intercept from the free variables, or the midpoint of the feasible
    /// interval when every variable sits at a bound.
    fn rho(&self) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_count = 0usize;
        let mut free_sum = 0.0;

        for t in 0..self.grad.len() {
            let y = self.sign(t);
            let yg = y * self.grad[t];
            if self.is_upper_bound(t) {
                if y < 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else if self.is_lower_bound(t) {
                if y > 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else {
                free_count += 1;
                free_sum += yg;
            }
        }

        if free_count > 0 {
            free_sum / free_count as f64
        } else {
            (upper + lower) / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn sine_samples() -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y = x.iter().map(|v| (v / 3.0).sin()).collect();
        (x, y)
    }

    #[test]
    fn test_rbf_fits_within_tube() {
        let (x, y) = sine_samples();
        let params = SvrParams::rbf(10.0, 0.5, 0.01);
        let model = SvrModel::fit(&x, &y, &params).unwrap();

        for (xi, yi) in x.iter().zip(y.iter()) {
            assert!((model.predict(*xi) - yi).abs() < 0.05);
        }
        assert!(model.support_vector_count() > 0);
        assert!(model.iterations() > 0);
    }

    #[test]
    fn test_linear_kernel_recovers_line() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let params = SvrParams {
            kernel: KernelKind::Linear,
            c: 100.0,
            epsilon: 0.01,
            ..SvrParams::default()
        };
        let model = SvrModel::fit(&x, &y, &params).unwrap();
        assert!((model.predict(5.0) - 11.0).abs() < 0.1);
    }

    #[test]
    fn test_constant_targets_give_constant_model() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0; 4];
        let model = SvrModel::fit(&x, &y, &SvrParams::default()).unwrap();
        assert_eq!(model.support_vector_count(), 0);
        assert_approx_eq!(model.predict(10.0), 0.0);
    }

    #[test]
    fn test_deterministic() {
        let (x, y) = sine_samples();
        let params = SvrParams::default();
        let a = SvrModel::fit(&x, &y, &params).unwrap();
        let b = SvrModel::fit(&x, &y, &params).unwrap();
        for v in [0.0, 7.5, 25.0] {
            assert_eq!(a.predict(v), b.predict(v));
        }
    }

    #[test]
    fn test_iteration_cap() {
        let (x, y) = sine_samples();
        let params = SvrParams {
            max_iter: 1,
            ..SvrParams::rbf(10.0, 0.5, 0.01)
        };
        assert!(matches!(
            SvrModel::fit(&x, &y, &params),
            Err(MathError::NotConverged { iterations: 1 })
        ));
    }

    #[test]
    fn test_invalid_params() {
        let x = [0.0, 1.0];
        let y = [1.0, 2.0];
        let bad = [
            SvrParams { c: 0.0, ..SvrParams::default() },
            SvrParams { gamma: -1.0, ..SvrParams::default() },
            SvrParams { epsilon: f64::NAN, ..SvrParams::default() },
            SvrParams { max_iter: 0, ..SvrParams::default() },
        ];
        for params in bad {
            assert!(matches!(
                SvrModel::fit(&x, &y, &params),
                Err(MathError::InvalidInput(_))
            ));
        }
        assert!(matches!(
            SvrModel::fit(&[0.0], &[1.0], &SvrParams::default()),
            Err(MathError::InsufficientData(_))
        ));
    }
}
