//! Nelson-Siegel-Svensson parametric curve.
//!
//! ```text
//! z(t) = β₀ + β₁ * ((1 - e^(-t/τ₁)) / (t/τ₁))
//!           + β₂ * ((1 - e^(-t/τ₁)) / (t/τ₁) - e^(-t/τ₁))
//!           + β₃ * ((1 - e^(-t/τ₂)) / (t/τ₂) - e^(-t/τ₂))
//! ```
//!
//! The model is unit-agnostic: it returns values in whatever unit the betas
//! were fitted in (basis points throughout this workspace).

use crate::error::{MathError, MathResult};

/// Svensson yield curve model.
///
/// # Example
///
/// ```rust
/// use alm_math::svensson::Svensson;
///
/// let sv = Svensson::new(45.0, -20.0, 10.0, -5.0, 2.0, 8.0).unwrap();
///
/// // Short end tends to β₀ + β₁, long end to β₀
/// assert!((sv.value(0.0) - 25.0).abs() < 1e-12);
/// assert!((sv.value(500.0) - 45.0).abs() < 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svensson {
    beta0: f64,
    beta1: f64,
    beta2: f64,
    beta3: f64,
    tau1: f64,
    tau2: f64,
}

impl Svensson {
    /// Creates a new Svensson curve.
    ///
    /// # Errors
    ///
    /// Returns an error if either tau is not positive or any parameter is
    /// not finite.
    pub fn new(
        beta0: f64,
        beta1: f64,
        beta2: f64,
        beta3: f64,
        tau1: f64,
        tau2: f64,
    ) -> MathResult<Self> {
        if tau1 <= 0.0 || !tau1.is_finite() {
            return Err(MathError::invalid_input(format!(
                "tau1 must be positive, got {tau1}"
            )));
        }
        if tau2 <= 0.0 || !tau2.is_finite() {
            return Err(MathError::invalid_input(format!(
                "tau2 must be positive, got {tau2}"
            )));
        }
        if [beta0, beta1, beta2, beta3].iter().any(|b| !b.is_finite()) {
            return Err(MathError::invalid_input("betas must be finite"));
        }

        Ok(Self {
            beta0,
            beta1,
            beta2,
            beta3,
            tau1,
            tau2,
        })
    }

    /// Builds the curve from betas `[β₀, β₁, β₂, β₃]` and taus `(τ₁, τ₂)`.
    pub fn from_parts(betas: [f64; 4], taus: (f64, f64)) -> MathResult<Self> {
        Self::new(betas[0], betas[1], betas[2], betas[3], taus.0, taus.1)
    }

    /// Curve value at time `t` (years).
    ///
    /// Non-positive times return the short-end limit β₀ + β₁.
    pub fn value(&self, t: f64) -> f64 {
        let [l0, l1, l2, l3] = Self::loadings(t, self.tau1, self.tau2);
        self.beta0 * l0 + self.beta1 * l1 + self.beta2 * l2 + self.beta3 * l3
    }

    /// Curve values at each time, in input order.
    pub fn values(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.value(t)).collect()
    }

    /// Returns the instantaneous forward rate at time t.
    pub fn forward_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta0 + self.beta1;
        }

        let x1 = t / self.tau1;
        let x2 = t / self.tau2;
        let exp_x1 = (-x1).exp();
        let exp_x2 = (-x2).exp();

        self.beta0 + self.beta1 * exp_x1 + self.beta2 * x1 * exp_x1 + self.beta3 * x2 * exp_x2
    }

    /// Returns the betas `[β₀, β₁, β₂, β₃]`.
    pub fn betas(&self) -> [f64; 4] {
        [self.beta0, self.beta1, self.beta2, self.beta3]
    }

    /// Returns the decay factors `(τ₁, τ₂)`.
    pub fn taus(&self) -> (f64, f64) {
        (self.tau1, self.tau2)
    }

    /// Factor loadings of the four betas at time `t` for the given taus.
    ///
    /// These are the regressor columns of the least-squares beta fit.
    pub fn loadings(t: f64, tau1: f64, tau2: f64) -> [f64; 4] {
        if t <= 0.0 {
            return [1.0, 1.0, 0.0, 0.0];
        }
        let x1 = t / tau1;
        let x2 = t / tau2;
        [
            1.0,
            loading_factor_1(x1),
            loading_factor_2(x1),
            loading_factor_2(x2),
        ]
    }
}

/// (1 - e^(-x)) / x
fn loading_factor_1(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        1.0 - x / 2.0 + x * x / 6.0
    } else {
        (1.0 - (-x).exp()) / x
    }
}

/// (1 - e^(-x)) / x - e^(-x)
fn loading_factor_2(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        x / 2.0 - x * x / 3.0
    } else {
        loading_factor_1(x) - (-x).exp()
    }
}
