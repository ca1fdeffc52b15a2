use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed-point resolution: thousandths of a percent.
pub const MILLI: i64 = 1000;

const HUNDRED_MILLI: i64 = 100 * MILLI;

/// A percentage stored as an integer number of thousandths of a percent.
///
/// Complements are computed in integer arithmetic, so `risk + complement`
/// is exactly 100 and `complement.complement()` is the original value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percent(i64);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const HUNDRED: Percent = Percent(HUNDRED_MILLI);

    pub const fn from_milli(milli: i64) -> Self {
        Percent(milli)
    }

    /// Converts a decimal literal with at most three fractional digits.
    /// Further digits are rounded half away from zero.
    pub fn from_literal(value: f64) -> Self {
        Percent((value * MILLI as f64).round() as i64)
    }

    pub fn from_percent(value: f64) -> Result<Self, PercentError> {
        if !value.is_finite() {
            return Err(PercentError::NotFinite);
        }
        let pct = Self::from_literal(value);
        if pct < Self::ZERO || pct > Self::HUNDRED {
            return Err(PercentError::OutOfBounds(value));
        }
        Ok(pct)
    }

    pub const fn milli(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / MILLI as f64
    }

    pub const fn complement(self) -> Self {
        Percent(HUNDRED_MILLI - self.0)
    }
}

/// True when `value` carries no more than three fractional digits.
pub fn is_three_decimal(value: f64) -> bool {
    let scaled = value * MILLI as f64;
    (scaled - scaled.round()).abs() < 1e-6
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / MILLI as u64;
        let mut frac = format!("{:03}", abs % MILLI as u64);
        while frac.len() > 1 && frac.ends_with('0') {
            frac.pop();
        }
        write!(f, "{sign}{whole}.{frac}")
    }
}

impl From<Percent> for f64 {
    fn from(value: Percent) -> Self {
        value.as_f64()
    }
}

impl TryFrom<f64> for Percent {
    type Error = PercentError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Percent::from_percent(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PercentError {
    #[error("percentage is not a finite number")]
    NotFinite,
    #[error("percentage {0} is outside [0, 100]")]
    OutOfBounds(f64),
}

/// Formats a probability in [0, 1] as a percentage with `decimals` digits.
pub fn format_fraction_pct(p: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, p * 100.0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/probability.rs"]
mod tests;
