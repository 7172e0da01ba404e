//! Sale payment status.

use mostrador_shared::types::{Money, SaleId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SaleError;

/// Payment status of a sale.
///
/// Moves `Pending -> Partial -> Paid` as payments accumulate; `Voided` is
/// terminal from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid.
    Pending,
    /// Partly paid.
    Partial,
    /// Fully paid.
    Paid,
    /// Voided.
    Voided,
}

impl PaymentStatus {
    /// Derives the status from what has been paid.
    #[must_use]
    pub fn derive(total_amount: Decimal, paid_amount: Decimal, is_voided: bool) -> Self {
        if is_voided {
            Self::Voided
        } else if paid_amount >= total_amount {
            Self::Paid
        } else if paid_amount > Decimal::ZERO {
            Self::Partial
        } else {
            Self::Pending
        }
    }

    /// Storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Voided => "voided",
        }
    }
}

/// Amount still owed on a sale, never negative.
#[must_use]
pub fn amount_due(total_amount: Decimal, paid_amount: Decimal) -> Decimal {
    (total_amount - paid_amount).max(Decimal::ZERO)
}

/// Validates applying prepaid credit to an existing sale.
pub fn validate_credit_to_sale(
    sale_id: SaleId,
    total_amount: Decimal,
    paid_amount: Decimal,
    is_voided: bool,
    amount: Money,
) -> Result<(), SaleError> {
    if is_voided {
        return Err(SaleError::AlreadyVoided(sale_id));
    }
    let due = amount_due(total_amount, paid_amount);
    if due.is_zero() {
        return Err(SaleError::NothingDue(sale_id));
    }
    if amount.amount() > due {
        return Err(SaleError::ExceedsAmountDue {
            amount: amount.amount(),
            due,
        });
    }
    Ok(())
}
