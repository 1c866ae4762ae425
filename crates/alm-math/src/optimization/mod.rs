//! Optimization algorithms.
//!
//! Derivative-free minimization for the non-linear parameters of curve fits.

use std::cell::Cell;

use crate::error::{MathError, MathResult};

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationConfig {
    /// Tolerance on both simplex size and objective spread.
    pub tolerance: f64,
    /// Maximum number of iterations; `0` selects `200 · n` iterations and
    /// evaluations.
    pub max_iterations: u32,
    /// Relative perturbation used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 0,
            initial_step: 0.05,
        }
    }
}

impl OptimizationConfig {
    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration limit.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Iteration and evaluation limits for a problem of the given dimension.
    ///
    /// The default caps both at `200 · n`; an explicit iteration limit
    /// leaves evaluations unbounded.
    fn limits(&self, dimension: usize) -> (u32, u32) {
        if self.max_iterations == 0 {
            let limit = 200 * dimension as u32;
            (limit, limit)
        } else {
            (self.max_iterations, u32::MAX)
        }
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best parameters found.
    pub parameters: Vec<f64>,
    /// Objective value at `parameters`.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Number of objective evaluations.
    pub evaluations: u32,
    /// Whether the tolerance was met before the iteration limit.
    pub converged: bool,
}

// Reflection, expansion, contraction and shrink coefficients
const RHO: f64 = 1.0;
const CHI: f64 = 2.0;
const PSI: f64 = 0.5;
const SIGMA: f64 = 0.5;

// Perturbation for zero coordinates of the starting point
const ZERO_STEP: f64 = 0.00025;

/// Nelder-Mead simplex minimizer.
///
/// Starts from a simplex built by scaling each coordinate of `initial` by
/// `1 + initial_step`. Stops when every vertex lies within `tolerance` of
/// the best one and every vertex value lies within `tolerance` of the
/// best value, or when the iteration or evaluation limit is reached. An
/// exhausted limit is reported through `converged = false`, never as an
/// error.
///
/// The objective may return `f64::INFINITY` to reject a point.
///
/// # Errors
///
/// Returns `MathError::InvalidInput` if `initial` is empty or contains
/// non-finite values.
pub fn nelder_mead<F>(
    f: F,
    initial: &[f64],
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::invalid_input("starting point is empty"));
    }
    if initial.iter().any(|x| !x.is_finite()) {
        return Err(MathError::invalid_input("starting point must be finite"));
    }

    let (max_iterations, max_evaluations) = config.limits(n);
    let evaluations = Cell::new(0u32);
    let eval = |x: &[f64]| {
        evaluations.set(evaluations.get() + 1);
        let value = f(x);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(initial.to_vec());
    for k in 0..n {
        let mut vertex = initial.to_vec();
        vertex[k] = if vertex[k] == 0.0 {
            ZERO_STEP
        } else {
            (1.0 + config.initial_step) * vertex[k]
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();
    sort_simplex(&mut simplex, &mut values);

    let mut iterations = 1u32;
    while evaluations.get() < max_evaluations && iterations < max_iterations {
        if has_converged(&simplex, &values, config.tolerance) {
            break;
        }

        let center = centroid(&simplex[..n]);
        let worst = simplex[n].clone();
        let reflected = affine(&center, &worst, 1.0 + RHO, -RHO);
        let f_reflected = eval(&reflected);

        let mut shrink = false;
        if f_reflected < values[0] {
            let expanded = affine(&center, &worst, 1.0 + RHO * CHI, -RHO * CHI);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
        } else if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
        } else if f_reflected < values[n] {
            let contracted = affine(&center, &worst, 1.0 + PSI * RHO, -PSI * RHO);
            let f_contracted = eval(&contracted);
            if f_contracted <= f_reflected {
                simplex[n] = contracted;
                values[n] = f_contracted;
            } else {
                shrink = true;
            }
        } else {
            let contracted = affine(&center, &worst, 1.0 - PSI, PSI);
            let f_contracted = eval(&contracted);
            if f_contracted < values[n] {
                simplex[n] = contracted;
                values[n] = f_contracted;
            } else {
                shrink = true;
            }
        }

        if shrink {
            let best = simplex[0].clone();
            for j in 1..=n {
                simplex[j] = affine(&best, &simplex[j], 1.0 - SIGMA, SIGMA);
                values[j] = eval(&simplex[j]);
            }
        }

        sort_simplex(&mut simplex, &mut values);
        iterations += 1;
    }

    let evaluations = evaluations.get();
    let converged = evaluations < max_evaluations && iterations < max_iterations;
    if !converged {
        log::warn!(
            "Nelder-Mead stopped after {iterations} iterations and {evaluations} evaluations without converging"
        );
    }

    Ok(OptimizationResult {
        parameters: simplex.swap_remove(0),
        objective_value: values[0],
        iterations,
        evaluations,
        converged,
    })
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

fn has_converged(simplex: &[Vec<f64>], values: &[f64], tolerance: f64) -> bool {
    let best = &simplex[0];
    let x_spread = simplex[1..]
        .iter()
        .flat_map(|v| v.iter().zip(best).map(|(a, b)| (a - b).abs()))
        .fold(0.0_f64, f64::max);
    let f_spread = values[1..]
        .iter()
        .map(|v| (v - values[0]).abs())
        .fold(0.0_f64, f64::max);
    x_spread <= tolerance && f_spread <= tolerance
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let count = vertices.len() as f64;
    let mut c = vec![0.0; vertices[0].len()];
    for v in vertices {
        for (ci, vi) in c.iter_mut().zip(v) {
            *ci += vi;
        }
    }
    c.iter_mut().for_each(|ci| *ci /= count);
    c
}

/// a·x + b·y, coordinate-wise.
fn affine(x: &[f64], y: &[f64], a: f64, b: f64) -> Vec<f64> {
    x.iter().zip(y).map(|(xi, yi)| a * xi + b * yi).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_bowl() {
        // Minimize (x-2)^2 + (y-3)^2
        let f = |p: &[f64]| (p[0] - 2.0).powi(2) + (p[1] - 3.0).powi(2);

        let config = OptimizationConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(1000);
        let result = nelder_mead(f, &[0.0, 0.0], &config).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(result.parameters[1], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rosenbrock() {
        let f = |p: &[f64]| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2);

        let config = OptimizationConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(2000);
        let result = nelder_mead(f, &[-1.2, 1.0], &config).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(result.parameters[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_infinite_region_is_avoided() {
        // Minimum at x = 1, everything below 0.5 rejected
        let f = |p: &[f64]| {
            if p[0] < 0.5 {
                f64::INFINITY
            } else {
                (p[0] - 1.0).powi(2)
            }
        };

        let result = nelder_mead(f, &[3.0], &OptimizationConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_iteration_limit_reports_non_convergence() {
        let f = |p: &[f64]| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2);

        let config = OptimizationConfig::default()
            .with_tolerance(1e-14)
            .with_max_iterations(5);
        let result = nelder_mead(f, &[-1.2, 1.0], &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 5);
    }

    #[test]
    fn test_empty_start_rejected() {
        let f = |_: &[f64]| 0.0;
        assert!(nelder_mead(f, &[], &OptimizationConfig::default()).is_err());
        assert!(nelder_mead(f, &[f64::NAN], &OptimizationConfig::default()).is_err());
    }
}
