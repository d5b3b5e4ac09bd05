use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Largest magnitude accepted from a decimal input, in cents.
///
/// Above this an `f64` can no longer represent every cent exactly, so the
/// boundary conversion refuses rather than silently losing pennies.
const MAX_FROM_MAJOR_CENTS: f64 = 9_007_199_254_740_991.0; // 2^53 - 1

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// split shares, balances) to avoid floating-point drift. Split totals are
/// compared for exact equality against the expense amount, so arithmetic has
/// to be penny-exact.
///
/// The value is signed: expense amounts and split shares are non-negative,
/// but a member's net balance may be negative (they owe more than they paid).
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Converting from a caller-supplied decimal (rounds half away from zero at
/// 2 decimals, with an epsilon correction so `1.005` lands on `1.01` instead
/// of drifting down through its binary representation):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!(MoneyCents::from_major(10.0).unwrap().cents(), 1000);
/// assert_eq!(MoneyCents::from_major(1.005).unwrap().cents(), 101);
/// assert!(MoneyCents::from_major(f64::NAN).is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts a decimal major-unit value (e.g. `12.34`) into cents.
    ///
    /// Rounds half away from zero at 2 decimals after nudging the value by
    /// machine epsilon. Rejects NaN, infinities, and values too large for
    /// every cent to be exact.
    pub fn from_major(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }
        let cents = ((value + f64::EPSILON.copysign(value)) * 100.0).round();
        if cents.abs() > MAX_FROM_MAJOR_CENTS {
            return Err(EngineError::InvalidAmount(
                "amount too large".to_string(),
            ));
        }
        Ok(Self(cents as i64))
    }

    /// Returns the amount as a decimal major-unit value (e.g. `12.34`).
    ///
    /// Exact for every amount accepted by [`from_major`](Self::from_major).
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn from_major_rounds_half_away_from_zero() {
        assert_eq!(MoneyCents::from_major(10.0).unwrap().cents(), 1000);
        assert_eq!(MoneyCents::from_major(10.5).unwrap().cents(), 1050);
        assert_eq!(MoneyCents::from_major(0.335).unwrap().cents(), 34);
        assert_eq!(MoneyCents::from_major(1.005).unwrap().cents(), 101);
        assert_eq!(MoneyCents::from_major(-0.01).unwrap().cents(), -1);
    }

    #[test]
    fn from_major_rejects_non_finite() {
        assert!(MoneyCents::from_major(f64::NAN).is_err());
        assert!(MoneyCents::from_major(f64::INFINITY).is_err());
        assert!(MoneyCents::from_major(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn major_round_trip_is_exact() {
        for cents in [0, 1, 99, 100, 3334, 9_000, 123_456_789] {
            let amount = MoneyCents::new(cents);
            assert_eq!(MoneyCents::from_major(amount.to_major()).unwrap(), amount);
        }
    }
}
