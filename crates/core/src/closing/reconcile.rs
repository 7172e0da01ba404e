//! Expected cash and cash-difference classification.

use mostrador_shared::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ClosingError;

/// Financial figures of a closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingFigures {
    /// Cash in the drawer when the register was opened.
    pub opening_balance: Decimal,
    /// Sales of the business day.
    pub sales_total: Decimal,
    /// Expenses of the business day.
    pub expenses_total: Decimal,
    /// Physically counted cash.
    pub cash_count: Decimal,
    /// `opening_balance + sales_total - expenses_total`.
    pub expected_cash: Decimal,
    /// `cash_count - expected_cash`.
    pub cash_difference: Decimal,
}

impl ClosingFigures {
    /// Computes expected cash and the difference against the count.
    pub fn compute(
        opening_balance: Decimal,
        sales_total: Decimal,
        expenses_total: Decimal,
        cash_count: Decimal,
    ) -> Result<Self, ClosingError> {
        let cash_count = Money::non_negative(cash_count)?.amount();
        let expected_cash = opening_balance + sales_total - expenses_total;
        Ok(Self {
            opening_balance,
            sales_total,
            expenses_total,
            cash_count,
            expected_cash,
            cash_difference: cash_count - expected_cash,
        })
    }
}

/// Outcome of comparing counted and expected cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashStatus {
    /// Within tolerance.
    Balanced,
    /// More cash than expected.
    Overage,
    /// Less cash than expected.
    Shortage,
}

/// Advisory result of the cash check. Never blocks finalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCheck {
    /// Classification.
    pub status: CashStatus,
    /// Signed difference.
    pub difference: Decimal,
    /// Operator warning for overages and shortages.
    pub warning: Option<String>,
}

impl CashCheck {
    /// Classifies `difference` against `tolerance` (inclusive).
    #[must_use]
    pub fn classify(difference: Decimal, tolerance: Decimal) -> Self {
        if difference.abs() <= tolerance {
            return Self {
                status: CashStatus::Balanced,
                difference,
                warning: None,
            };
        }
        let (status, warning) = if difference > Decimal::ZERO {
            (
                CashStatus::Overage,
                format!("Sobrante de caja: ${difference:.2}"),
            )
        } else {
            (
                CashStatus::Shortage,
                format!("Faltante de caja: ${:.2}", difference.abs()),
            )
        };
        Self {
            status,
            difference,
            warning: Some(warning),
        }
    }
}
