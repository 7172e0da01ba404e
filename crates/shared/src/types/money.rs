//! Money helpers with fixed two-decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every stored amount is a `rust_decimal::Decimal` with at most two
//! fractional digits.

use std::ops::{Add, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits kept for money.
pub const MONEY_SCALE: u32 = 2;

/// Rounds to cents, half away from zero (the rule used on printed tickets).
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if `value` has no more than two significant fractional digits.
#[must_use]
pub fn has_money_scale(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}

/// Rejected money input.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// Amount is zero or negative where a positive amount is required.
    #[error("el monto debe ser mayor a cero")]
    NotPositive,

    /// Amount is negative where zero is allowed.
    #[error("el monto no puede ser negativo")]
    Negative,

    /// Amount has more than two decimals.
    #[error("el monto admite como máximo dos decimales")]
    TooManyDecimals,
}

/// A validated, non-negative amount with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Accepts a strictly positive amount with at most two decimals.
    pub fn positive(amount: Decimal) -> Result<Self, MoneyError> {
        if amount <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        Self::non_negative(amount)
    }

    /// Accepts zero or a positive amount with at most two decimals.
    pub fn non_negative(amount: Decimal) -> Result<Self, MoneyError> {
        if amount < Decimal::ZERO {
            return Err(MoneyError::Negative);
        }
        if !has_money_scale(amount) {
            return Err(MoneyError::TooManyDecimals);
        }
        Ok(Self(amount.round_dp(MONEY_SCALE)))
    }

    /// Rounds an arbitrary non-negative amount to cents.
    #[must_use]
    pub fn rounded(amount: Decimal) -> Self {
        Self(round_money(amount.max(Decimal::ZERO)))
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Subtraction that stops at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self((self.0 - other.0).max(Decimal::ZERO))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Decimal;

    fn sub(self, rhs: Self) -> Decimal {
        self.0 - rhs.0
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
