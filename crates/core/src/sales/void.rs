//! Reversal of a voided sale on the customer's ledger.
//!
//! The sale originally posted a SALE for its total and one PAYMENT per
//! tendered amount; applied credit was a memo. Voiding posts a VOID_SALE for
//! the total and a DEBIT_NOTE for every refunded payment, so the balance ends
//! up where it would be had the sale never happened. Credit that paid the
//! sale comes back with the VOID_SALE, as available credit is read off the
//! balance.
//!
//! Lifetime aggregates are not rewritten: `total_sales` nets out through the
//! VOID_SALE, while a refunded payment stays in `total_payments` and the
//! refund shows up in `total_debit_notes`. Statements read the same way.

use mostrador_shared::types::PaymentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::method::PaymentMethod;

/// A non-voided payment attached to the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePayment {
    /// Payment row.
    pub payment_id: PaymentId,
    /// Method.
    pub method: PaymentMethod,
    /// Amount.
    pub amount: Decimal,
}

/// Ledger effects of voiding a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidReversal {
    /// VOID_SALE amount.
    pub void_amount: Decimal,
    /// Payments refunded to the customer, each posted as a DEBIT_NOTE.
    pub refunds: Vec<SalePayment>,
    /// Credit that had paid the sale and is available again after the void.
    pub credit_returned: Decimal,
}

impl VoidReversal {
    /// Computes the reversal for a sale of `total_amount`.
    #[must_use]
    pub fn compute(total_amount: Decimal, payments: &[SalePayment], credit_applied: Decimal) -> Self {
        let refunds = payments
            .iter()
            .filter(|p| p.method.is_tender() && p.amount > Decimal::ZERO)
            .copied()
            .collect();
        Self {
            void_amount: total_amount,
            refunds,
            credit_returned: credit_applied,
        }
    }

    /// Total refunded in tender.
    #[must_use]
    pub fn refunded(&self) -> Decimal {
        self.refunds.iter().map(|r| r.amount).sum()
    }

    /// Net change in the account balance.
    #[must_use]
    pub fn net_impact(&self) -> Decimal {
        self.refunded() - self.void_amount
    }
}
