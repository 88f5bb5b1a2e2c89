//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the catalog as JSON numbers (`179.9`) and are persisted
//! as decimal strings (`"179.9"`) so a stored cart reloads without float drift.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The value is not a decimal number.
    #[error("Invalid price: {0}")]
    Invalid(String),

    /// Catalog prices are never negative.
    #[error("Price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative price in the store currency (USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
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
    fn test_parse_valid_prices() {
        assert_eq!("179.9".parse::<Price>().unwrap().amount(), Decimal::new(1799, 1));
        assert_eq!("0".parse::<Price>().unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_invalid_price() {
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!("-1.50".parse::<Price>(), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_display_formats_two_decimals() {
        assert_eq!("179.9".parse::<Price>().unwrap().to_string(), "$179.90");
        assert_eq!("139.999".parse::<Price>().unwrap().to_string(), "$140.00");
    }

    #[test]
    fn test_times_and_sum() {
        let price = "179.9".parse::<Price>().unwrap();
        assert_eq!(price.times(3).to_string(), "$539.70");

        let total: Price = [price, price.times(2)].into_iter().sum();
        assert_eq!(total.to_string(), "$539.70");
    }

    #[test]
    fn test_deserialize_from_number_and_string() {
        let from_number: Price = serde_json::from_str("179.9").unwrap();
        let from_string: Price = serde_json::from_str("\"179.9\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_deserialize_negative_rejected() {
        assert!(serde_json::from_str::<Price>("-5").is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let price = "139.9".parse::<Price>().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(serde_json::from_str::<Price>(&json).unwrap(), price);
    }
}
