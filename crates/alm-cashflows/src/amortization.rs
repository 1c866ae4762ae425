//! Principal amortization schedules.
//!
//! Three repayment conventions are supported:
//!
//! - **Bullet**: interest only, full principal in the final period
//! - **Linear**: equal principal instalments
//! - **Annuity**: level payments recomputed each period on the running balance
//!
//! Rates are per-period decimals (a 2% annual rate paid monthly is
//! `0.02 / 12`).

use alm_core::types::Repayment;
use serde::{Deserialize, Serialize};

use crate::error::{CashflowError, CashflowResult};

/// Per-period interest rates for a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RatePath {
    /// The same rate in every period.
    Flat(f64),
    /// One rate per period.
    Periodic(Vec<f64>),
}

impl RatePath {
    fn expand(&self, tenor: usize) -> CashflowResult<Vec<f64>> {
        let rates = match self {
            Self::Flat(rate) => vec![*rate; tenor],
            Self::Periodic(rates) => {
                if rates.len() != tenor {
                    return Err(CashflowError::invalid_argument(format!(
                        "rate path has {} periods but tenor is {tenor}",
                        rates.len()
                    )));
                }
                rates.clone()
            }
        };
        if rates.iter().any(|r| !r.is_finite()) {
            return Err(CashflowError::invalid_argument("rates must be finite"));
        }
        Ok(rates)
    }
}

impl From<f64> for RatePath {
    fn from(rate: f64) -> Self {
        Self::Flat(rate)
    }
}

impl From<Vec<f64>> for RatePath {
    fn from(rates: Vec<f64>) -> Self {
        Self::Periodic(rates)
    }
}

/// Period-by-period amortization of a principal.
///
/// All four columns have one entry per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Principal repaid in each period.
    pub capital: Vec<f64>,
    /// Interest paid in each period.
    pub interest: Vec<f64>,
    /// Total payment in each period (capital + interest).
    pub cashflow: Vec<f64>,
    /// Outstanding balance reported for each period.
    pub remaining: Vec<f64>,
}

impl AmortizationSchedule {
    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capital.len()
    }

    /// Returns true for an empty schedule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capital.is_empty()
    }

    /// Total principal repaid.
    #[must_use]
    pub fn total_capital(&self) -> f64 {
        self.capital.iter().sum()
    }

    /// Total interest paid.
    #[must_use]
    pub fn total_interest(&self) -> f64 {
        self.interest.iter().sum()
    }

    fn from_columns(capital: Vec<f64>, interest: Vec<f64>, remaining: Vec<f64>) -> Self {
        let cashflow = capital.iter().zip(&interest).map(|(c, i)| c + i).collect();
        Self {
            capital,
            interest,
            cashflow,
            remaining,
        }
    }
}

/// Amortizes `principal` over `tenor` periods.
///
/// Remaining balance conventions differ by repayment type: bullet and
/// annuity report the balance after the period's payment, linear reports
/// the balance before it.
///
/// # Errors
///
/// Returns `CashflowError::InvalidArgument` if `tenor` is zero, a periodic
/// rate path does not have `tenor` entries, or an input is not finite.
///
/// # Example
///
/// ```rust
/// use alm_cashflows::amortization::{amortization_schedule, RatePath};
/// use alm_core::types::Repayment;
///
/// let schedule = amortization_schedule(&RatePath::Flat(0.0), 4, 1_000.0, Repayment::Linear).unwrap();
/// assert_eq!(schedule.capital, vec![250.0; 4]);
/// assert_eq!(schedule.remaining, vec![1_000.0, 750.0, 500.0, 250.0]);
/// ```
pub fn amortization_schedule(
    rate_path: &RatePath,
    tenor: usize,
    principal: f64,
    repayment: Repayment,
) -> CashflowResult<AmortizationSchedule> {
    if tenor == 0 {
        return Err(CashflowError::invalid_argument(
            "tenor must be at least one period",
        ));
    }
    if !principal.is_finite() {
        return Err(CashflowError::invalid_argument(format!(
            "principal must be finite, got {principal}"
        )));
    }
    let rates = rate_path.expand(tenor)?;

    Ok(match repayment {
        Repayment::Bullet => bullet(&rates, principal),
        Repayment::Linear => linear(&rates, principal),
        Repayment::Annuity => annuity(&rates, principal),
    })
}

fn bullet(rates: &[f64], principal: f64) -> AmortizationSchedule {
    let tenor = rates.len();
    let mut capital = vec![0.0; tenor];
    capital[tenor - 1] = principal;

    let interest = rates.iter().map(|r| r * principal).collect();
    let remaining = capital.iter().map(|c| principal - c).collect();

    AmortizationSchedule::from_columns(capital, interest, remaining)
}

fn linear(rates: &[f64], principal: f64) -> AmortizationSchedule {
    let tenor = rates.len();
    let instalment = principal / tenor as f64;
    let capital = vec![instalment; tenor];

    let mut remaining = Vec::with_capacity(tenor);
    let mut repaid = 0.0;
    for c in &capital {
        remaining.push(principal - repaid);
        repaid += c;
    }
    let interest = remaining.iter().zip(rates).map(|(b, r)| b * r).collect();

    AmortizationSchedule::from_columns(capital, interest, remaining)
}

/// Level payment recomputed on the running balance with `n + 1` periods
/// to go, where `n = tenor - i`.
fn annuity(rates: &[f64], principal: f64) -> AmortizationSchedule {
    let tenor = rates.len();
    let mut capital = Vec::with_capacity(tenor);
    let mut interest = Vec::with_capacity(tenor);
    let mut remaining = Vec::with_capacity(tenor);

    let mut balance = principal;
    for (i, &rate) in rates.iter().enumerate() {
        let periods = (tenor - i + 1) as f64;
        let payment = if rate == 0.0 {
            balance / periods
        } else {
            balance * rate / (1.0 - (1.0 + rate).powf(-periods))
        };
        let period_interest = balance * rate;
        let period_capital = payment - period_interest;
        balance -= period_capital;

        capital.push(period_capital);
        interest.push(period_interest);
        remaining.push(balance);
    }

    AmortizationSchedule::from_columns(capital, interest, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bullet() {
        let s = amortization_schedule(&RatePath::Flat(0.01), 3, 1_000.0, Repayment::Bullet).unwrap();

        assert_eq!(s.capital, vec![0.0, 0.0, 1_000.0]);
        assert_eq!(s.interest, vec![10.0, 10.0, 10.0]);
        assert_eq!(s.cashflow, vec![10.0, 10.0, 1_010.0]);
        assert_eq!(s.remaining, vec![1_000.0, 1_000.0, 0.0]);
    }

    #[test]
    fn test_linear_interest_on_opening_balance() {
        let s = amortization_schedule(&RatePath::Flat(0.1), 4, 400.0, Repayment::Linear).unwrap();

        assert_eq!(s.capital, vec![100.0; 4]);
        assert_eq!(s.remaining, vec![400.0, 300.0, 200.0, 100.0]);
        for (i, expected) in [40.0, 30.0, 20.0, 10.0].iter().enumerate() {
            assert_relative_eq!(s.interest[i], *expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_annuity_zero_rate() {
        let s = amortization_schedule(&RatePath::Flat(0.0), 3, 1_200.0, Repayment::Annuity).unwrap();

        // capital[i] = R[i] / (tenor - i + 1)
        let mut balance = 1_200.0;
        for i in 0..3 {
            let expected = balance / (3 - i + 1) as f64;
            assert_relative_eq!(s.capital[i], expected, epsilon = 1e-9);
            balance -= expected;
            assert_relative_eq!(s.remaining[i], balance, epsilon = 1e-9);
        }
        assert!(s.interest.iter().all(|&i| i == 0.0));
    }

    #[test]
    fn test_annuity_payments_follow_closed_form() {
        let r: f64 = 0.005;
        let tenor = 12;
        let s = amortization_schedule(&RatePath::Flat(r), tenor, 10_000.0, Repayment::Annuity).unwrap();

        let level = 10_000.0 * r / (1.0 - (1.0 + r).powf(-13.0));
        let mut balance = 10_000.0;
        for i in 0..tenor {
            let periods = (tenor - i + 1) as f64;
            let expected = balance * r / (1.0 - (1.0 + r).powf(-periods));
            assert_relative_eq!(s.cashflow[i], expected, epsilon = 1e-9);
            assert_relative_eq!(s.interest[i], balance * r, epsilon = 1e-9);
            // Flat rate: recomputing on the running balance keeps the payment level
            assert_relative_eq!(s.cashflow[i], level, epsilon = 1e-9);
            balance = s.remaining[i];
        }
        assert_relative_eq!(s.interest[0], 50.0, epsilon = 1e-12);
        assert!(s.remaining.windows(2).all(|w| w[1] < w[0]));
        // Balance left after the last payment is one more level period
        assert_relative_eq!(s.remaining[tenor - 1], level / (1.0 + r), epsilon = 1e-9);
    }

    #[test]
    fn test_periodic_rates() {
        let path = RatePath::from(vec![0.01, 0.02]);
        let s = amortization_schedule(&path, 2, 100.0, Repayment::Bullet).unwrap();
        assert_relative_eq!(s.interest[0], 1.0);
        assert_relative_eq!(s.interest[1], 2.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(amortization_schedule(&RatePath::Flat(0.01), 0, 100.0, Repayment::Bullet).is_err());
        assert!(
            amortization_schedule(&RatePath::Periodic(vec![0.01]), 2, 100.0, Repayment::Linear)
                .is_err()
        );
        assert!(amortization_schedule(&RatePath::Flat(f64::NAN), 2, 100.0, Repayment::Linear).is_err());
        assert!(amortization_schedule(&RatePath::Flat(0.01), 2, f64::INFINITY, Repayment::Annuity).is_err());
    }

    #[test]
    fn test_single_period() {
        for repayment in Repayment::all() {
            let s = amortization_schedule(&RatePath::Flat(0.0), 1, 500.0, *repayment).unwrap();
            assert_eq!(s.len(), 1);
        }
    }
}
