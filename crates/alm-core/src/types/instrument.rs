//! Balance-sheet instrument terms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// Interest binding of an instrument.
///
/// `FIX` marks a fixed-rate position; every other label (e.g. `LIBOR`,
/// `EURIBOR3M`) is a floating binding that reprices off a yield curve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RateBinding {
    /// Fixed rate for the life of the instrument.
    Fixed,
    /// Floating rate, carrying the index label it was loaded with.
    Floating(String),
}

impl RateBinding {
    /// Returns true for fixed-rate instruments.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed)
    }

    /// Returns the label of the binding.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Fixed => "FIX",
            Self::Floating(index) => index,
        }
    }
}

impl From<String> for RateBinding {
    fn from(label: String) -> Self {
        if label.trim().eq_ignore_ascii_case("FIX") {
            Self::Fixed
        } else {
            Self::Floating(label.trim().to_string())
        }
    }
}

impl From<&str> for RateBinding {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<RateBinding> for String {
    fn from(binding: RateBinding) -> Self {
        binding.label().to_string()
    }
}

impl fmt::Display for RateBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Principal repayment convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Repayment {
    /// Principal repaid in full at maturity.
    Bullet,
    /// Principal repaid in equal instalments.
    Linear,
    /// Level total payment per period.
    Annuity,
}

impl Repayment {
    /// Returns the canonical label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullet => "BULLET",
            Self::Linear => "LINEAR",
            Self::Annuity => "ANNUITY",
        }
    }

    /// Returns all conventions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Bullet, Self::Linear, Self::Annuity]
    }
}

impl FromStr for Repayment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BULLET" => Ok(Self::Bullet),
            "LINEAR" => Ok(Self::Linear),
            "ANNUITY" => Ok(Self::Annuity),
            other => Err(CoreError::invalid_argument(format!(
                "repayment can be either BULLET, LINEAR or ANNUITY, got '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for Repayment {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Repayment> for String {
    fn from(repayment: Repayment) -> Self {
        repayment.label().to_string()
    }
}

impl fmt::Display for Repayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_reprice_freq() -> u32 {
    1
}

/// One loan or deposit position.
///
/// Field names follow the column names of the portfolio extract, so a
/// record deserialized from the loader can be used directly. Call
/// [`Instrument::validate`] on deserialized records; the builder validates
/// on [`InstrumentBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Unique identifier.
    pub id: String,
    /// Account category used for grouping.
    pub account: String,
    /// Signed notional volume.
    pub volume: f64,
    /// Issue date (first repricing date).
    pub issue: Date,
    /// Maturity date.
    pub maturity: Date,
    /// Interest binding.
    pub ir_binding: RateBinding,
    /// Spread in basis points.
    pub spread: f64,
    /// Principal repayment convention.
    pub repayment: Repayment,
    /// Months between cash flows.
    pub payment_freq: u32,
    /// Months between rate resets (floating only).
    #[serde(default = "default_reprice_freq")]
    pub reprice_freq: u32,
    /// Identifier of the yield curve the instrument reprices off.
    #[serde(alias = "yieldcurve")]
    pub yield_curve: String,
}

impl Instrument {
    /// Starts building an instrument with the given identifier.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> InstrumentBuilder {
        InstrumentBuilder::new(id)
    }

    /// Checks the data-model invariants.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInstrument` if the issue date is not
    /// before the maturity date or a frequency is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.issue >= self.maturity {
            return Err(CoreError::invalid_instrument(
                &self.id,
                format!(
                    "issue date {} must precede maturity date {}",
                    self.issue, self.maturity
                ),
            ));
        }
        if self.payment_freq == 0 {
            return Err(CoreError::invalid_instrument(
                &self.id,
                "payment frequency must be a positive number of months",
            ));
        }
        if self.reprice_freq == 0 {
            return Err(CoreError::invalid_instrument(
                &self.id,
                "repricing frequency must be a positive number of months",
            ));
        }
        if !self.volume.is_finite() || !self.spread.is_finite() {
            return Err(CoreError::invalid_instrument(
                &self.id,
                "volume and spread must be finite",
            ));
        }
        Ok(())
    }

    /// Returns true for fixed-rate instruments.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.ir_binding.is_fixed()
    }
}

/// Builder for [`Instrument`].
#[derive(Debug, Clone)]
pub struct InstrumentBuilder {
    id: String,
    account: Option<String>,
    volume: Option<f64>,
    issue: Option<Date>,
    maturity: Option<Date>,
    ir_binding: RateBinding,
    spread: f64,
    repayment: Repayment,
    payment_freq: u32,
    reprice_freq: u32,
    yield_curve: Option<String>,
}

impl InstrumentBuilder {
    /// Creates a builder for a fixed-rate bullet instrument with monthly payments.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account: None,
            volume: None,
            issue: None,
            maturity: None,
            ir_binding: RateBinding::Fixed,
            spread: 0.0,
            repayment: Repayment::Bullet,
            payment_freq: 1,
            reprice_freq: 1,
            yield_curve: None,
        }
    }

    /// Sets the account category.
    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Sets the notional volume.
    #[must_use]
    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Sets the issue date.
    #[must_use]
    pub fn issue(mut self, issue: Date) -> Self {
        self.issue = Some(issue);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity(mut self, maturity: Date) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Sets the interest binding.
    #[must_use]
    pub fn ir_binding(mut self, binding: impl Into<RateBinding>) -> Self {
        self.ir_binding = binding.into();
        self
    }

    /// Sets the spread in basis points.
    #[must_use]
    pub fn spread(mut self, spread_bps: f64) -> Self {
        self.spread = spread_bps;
        self
    }

    /// Sets the repayment convention.
    #[must_use]
    pub fn repayment(mut self, repayment: Repayment) -> Self {
        self.repayment = repayment;
        self
    }

    /// Sets the payment frequency in months.
    #[must_use]
    pub fn payment_freq(mut self, months: u32) -> Self {
        self.payment_freq = months;
        self
    }

    /// Sets the repricing frequency in months.
    #[must_use]
    pub fn reprice_freq(mut self, months: u32) -> Self {
        self.reprice_freq = months;
        self
    }

    /// Sets the yield curve identifier.
    #[must_use]
    pub fn yield_curve(mut self, curve_id: impl Into<String>) -> Self {
        self.yield_curve = Some(curve_id.into());
        self
    }

    /// Builds and validates the instrument.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInstrument` if a required field is missing
    /// or an invariant is violated.
    pub fn build(self) -> CoreResult<Instrument> {
        let missing = |field: &str| CoreError::invalid_instrument(&self.id, format!("missing {field}"));

        let instrument = Instrument {
            account: self.account.clone().ok_or_else(|| missing("account"))?,
            volume: self.volume.ok_or_else(|| missing("volume"))?,
            issue: self.issue.ok_or_else(|| missing("issue date"))?,
            maturity: self.maturity.ok_or_else(|| missing("maturity date"))?,
            yield_curve: self.yield_curve.clone().unwrap_or_default(),
            ir_binding: self.ir_binding,
            spread: self.spread,
            repayment: self.repayment,
            payment_freq: self.payment_freq,
            reprice_freq: self.reprice_freq,
            id: self.id,
        };
        instrument.validate()?;
        Ok(instrument)
    }
}
