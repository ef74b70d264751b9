use crate::error::{BillingError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fraction digits a charged amount is quantized to.
pub const CURRENCY_SCALE: u32 = 2;

/// Exact monetary amount.
///
/// Arithmetic keeps the natural scale of its operands; [`Money::quantized`]
/// applies the 2-decimal round-half-even policy used for every amount that
/// leaves the engines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Parses a base-10 decimal string, reporting the offending field on
    /// failure so the caller can surface a precise 400-class error.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        Decimal::from_str(value.trim())
            .map(Self)
            .map_err(|_| BillingError::InvalidDecimal {
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    pub fn add(&self, other: Money) -> Self {
        Self(self.0 + other.0)
    }

    pub fn negated(&self) -> Self {
        Self(-self.0)
    }

    pub fn multiply(&self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }

    /// `percentage` percent of this amount.
    pub fn percentage(&self, percentage: Decimal) -> Self {
        Self((percentage * self.0) / Decimal::ONE_HUNDRED)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Quantizes to exactly two fraction digits using banker's rounding.
    /// The result always renders with both digits ("0.00", "12.50").
    pub fn quantized(&self) -> Self {
        let mut amount = self
            .0
            .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointNearestEven);
        amount.rescale(CURRENCY_SCALE);
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
