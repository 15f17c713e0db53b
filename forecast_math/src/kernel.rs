//! Kernel functions for kernel-based regression
//!
//! Features in this workspace are one-dimensional (a day index), so kernels
//! operate on scalar inputs.

use serde::{Deserialize, Serialize};

/// Kernel family selector, as it appears in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    /// Radial basis function kernel
    #[default]
    Rbf,
    /// Linear (dot product) kernel
    Linear,
}

/// A concrete kernel function with its coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// `exp(-gamma * (a - b)^2)`
    Rbf { gamma: f64 },
    /// `a * b`
    Linear,
}

impl Kernel {
    /// Evaluate the kernel for two samples
    pub fn eval(&self, a: f64, b: f64) -> f64 {
        match *self {
            Kernel::Rbf { gamma } => {
                let d = a - b;
                (-gamma * d * d).exp()
            }
            Kernel::Linear => a * b,
        }
    }

    /// Build the full Gram matrix for a sample set, row-major
    pub fn gram_matrix(&self, samples: &[f64]) -> Vec<f64> {
        let n = samples.len();
        let mut matrix = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let v = self.eval(samples[i], samples[j]);
                matrix[i * n + j] = v;
                matrix[j * n + i] = v;
            }
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_rbf_kernel() {
        let kernel = Kernel::Rbf { gamma: 0.5 };
        assert_approx_eq!(kernel.eval(3.0, 3.0), 1.0);
        assert_approx_eq!(kernel.eval(0.0, 2.0), (-2.0f64).exp());
        // symmetric
        assert_approx_eq!(kernel.eval(1.0, 4.0), kernel.eval(4.0, 1.0));
    }

    #[test]
    fn test_gram_matrix() {
        let kernel = Kernel::Linear;
        let gram = kernel.gram_matrix(&[1.0, 2.0, 3.0]);
        assert_eq!(gram, vec![1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 3.0, 6.0, 9.0]);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(1.0, 0.9048374180359595)]
    #[case(10.0, 4.5399929762484854e-5)]
    fn test_rbf_decays_with_distance(#[case] distance: f64, #[case] expected: f64) {
        let kernel = Kernel::Rbf { gamma: 0.1 };
        assert_approx_eq!(kernel.eval(5.0, 5.0 + distance), expected, 1e-12);
    }
}
