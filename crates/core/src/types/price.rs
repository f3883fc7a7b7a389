//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are non-negative currency amounts with two decimal places.
//! Binary floating point is never used for money; the payment provider
//! receives amounts in minor units (cents) via [`Price::minor_units`].

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount does not fit in minor units.
    #[error("price out of range: {0}")]
    OutOfRange(Decimal),
}

/// A non-negative currency amount, stored in the currency's standard unit
/// (dollars, not cents) and rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// The amount is rounded (banker's rounding) to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount.round_dp(2)))
    }

    /// Create a price from an amount in minor units (cents).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn from_minor_units(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The amount in the currency's standard unit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in minor units (cents), as required by the payment provider.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::OutOfRange` if the amount does not fit in an `i64`.
    pub fn minor_units(&self) -> Result<i64, PriceError> {
        (self.0 * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .ok_or(PriceError::OutOfRange(self.0))
    }

    /// Line total for a quantity of items at this price.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// SQLx support (with postgres feature): stored as NUMERIC.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // The schema enforces price >= 0
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        let negative = Decimal::new(-1, 2);
        assert!(matches!(
            Price::new(negative),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_new_rounds_to_cents() {
        let price = Price::new(Decimal::new(10_005, 3)).unwrap();
        assert_eq!(price.amount(), Decimal::new(1000, 2));
    }

    #[test]
    fn test_minor_units() {
        let price = Price::new(Decimal::new(1999, 2)).unwrap();
        assert_eq!(price.minor_units().unwrap(), 1999);

        assert_eq!(Price::ZERO.minor_units().unwrap(), 0);
    }

    #[test]
    fn test_minor_units_roundtrip() {
        let price = Price::from_minor_units(1050).unwrap();
        assert_eq!(price.amount(), Decimal::new(1050, 2));
        assert_eq!(price.minor_units().unwrap(), 1050);
    }

    #[test]
    fn test_line_total() {
        let price = Price::from_minor_units(1000).unwrap();
        assert_eq!(price.line_total(2), Decimal::new(2000, 2));
        assert_eq!(price.line_total(0), Decimal::ZERO);
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::from(5)).unwrap();
        assert_eq!(price.to_string(), "5.00");
    }
}
