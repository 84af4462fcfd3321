//! Money amounts using decimal arithmetic.
//!
//! The store trades in a single currency (Pakistani rupees), so `Money` is a
//! plain decimal amount without a currency tag. Amounts serialize as strings
//! for lossless persistence; backend payloads that need JSON numbers go through
//! `rust_decimal::serde::float` at the request boundary.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Whole-rupee amount.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round to whole rupees, halves away from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Self(round_half_away(self.0))
    }
}

/// Round a decimal to an integer, halves away from zero.
#[must_use]
pub fn round_half_away(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rs. {}", self.0.normalize())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let mut total = Money::ZERO;
        total += Money::from_rupees(500);
        total += Money::from_rupees(250) * 2;
        total -= Money::from_rupees(100);
        assert_eq!(total, Money::from_rupees(900));
    }

    #[test]
    fn test_display_strips_trailing_zeros() {
        let price = Money::new(Decimal::new(150_000, 2));
        assert_eq!(price.to_string(), "Rs. 1500");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_half_away(Decimal::new(25, 1)), Decimal::from(3));
        assert_eq!(round_half_away(Decimal::new(24, 1)), Decimal::from(2));
    }

    #[test]
    fn test_deserializes_json_numbers() {
        let price: Money = serde_json::from_str("2499").unwrap();
        assert_eq!(price, Money::from_rupees(2499));

        let price: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(price, Money::new(Decimal::new(125, 1)));
    }

    #[test]
    fn test_string_persistence_is_lossless() {
        let price = Money::new(Decimal::new(1999, 2));
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_rupees(1), Money::from_rupees(2)].iter().sum();
        assert_eq!(total, Money::from_rupees(3));
    }
}
