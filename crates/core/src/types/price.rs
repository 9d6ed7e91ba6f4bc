//! Decimal-safe monetary amounts.
//!
//! The catalog backend sends every amount (`UnitPrice`, `Total`) as a decimal
//! string such as `"0.99"`. [`Price`] keeps that value as a
//! [`rust_decimal::Decimal`] so that cart totals never go through floating
//! point, and renders it back with two fractional digits only for display.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price {0:?}")]
    Invalid(String),
    /// The input is a negative amount.
    #[error("price cannot be negative: {0}")]
    Negative(String),
}

/// A non-negative monetary amount.
///
/// Serialized as a decimal string (`"9.99"`), deserialized from either a
/// string or a JSON number.
///
/// ```
/// use chinook_core::Price;
///
/// let unit = Price::parse("0.99").unwrap();
/// assert_eq!(unit.times(5).to_string(), "4.95");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap an existing decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount.to_string()));
        }
        Ok(Self(amount))
    }

    /// Build a price from an integer number of cents.
    ///
    /// Negative input is clamped to zero.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents.max(0), 2))
    }

    /// Parse a decimal string as sent by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    ///
    /// Saturates instead of overflowing the decimal range.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Fixed two-digit rendering used at presentation time, e.g. `"12.99"`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_strings() {
        assert_eq!(Price::parse("0.99").unwrap().amount(), Decimal::new(99, 2));
        assert_eq!(Price::parse(" 1.5 ").unwrap().display(), "1.50");
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage_and_negatives() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse(""), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse("-1.00"), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_sum_has_no_float_drift() {
        // 0.1 + 0.2 is the classic float failure
        let total: Price = [Price::parse("0.1").unwrap(), Price::parse("0.2").unwrap()]
            .into_iter()
            .sum();
        assert_eq!(total, Price::parse("0.3").unwrap());
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::parse("1.50").unwrap().times(2).display(), "3.00");
        assert_eq!(Price::parse("9.99").unwrap().times(0), Price::ZERO);
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::parse("1.005").unwrap().display(), "1.01");
        assert_eq!(Price::from_cents(1299).to_string(), "12.99");
    }

    #[test]
    fn test_serde_string_form() {
        let price = Price::parse("0.99").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"0.99\"");

        let back: Price = serde_json::from_str("\"0.99\"").unwrap();
        assert_eq!(back, price);
    }
}
