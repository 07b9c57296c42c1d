//! Unimodal test functions
//!
//! A single basin of attraction; used to check that an optimizer makes
//! steady progress and converges.

use ndarray::Array1;

/// Sphere function
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-100, 100]
pub fn sphere(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

/// Shifted quadratic, minimum away from the origin
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-10, 10]
pub fn quadratic(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| (xi - 1.0).powi(2)).sum()
}

/// Rosenbrock function, a narrow curved valley
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-5, 10]
pub fn rosenbrock(x: &Array1<f64>) -> f64 {
    x.windows(2)
        .into_iter()
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Ellipsoid with condition number 1e6
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-100, 100]
pub fn elliptic(x: &Array1<f64>) -> f64 {
    let n = x.len();
    if n < 2 {
        return x.iter().map(|&xi| xi * xi).sum();
    }
    x.iter()
        .enumerate()
        .map(|(i, &xi)| 1e6f64.powf(i as f64 / (n - 1) as f64) * xi * xi)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_unimodal_minima() {
        assert_eq!(sphere(&array![0.0, 0.0, 0.0]), 0.0);
        assert_eq!(quadratic(&array![1.0, 1.0]), 0.0);
        assert_eq!(rosenbrock(&array![1.0, 1.0, 1.0]), 0.0);
        assert_eq!(elliptic(&array![0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rosenbrock_value() {
        // 100 * (1 - 0)^2 + (1 - 0)^2
        assert_eq!(rosenbrock(&array![0.0, 1.0]), 101.0);
    }
}
