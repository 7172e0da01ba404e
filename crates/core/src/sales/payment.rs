//! Payment planning for a sale.
//!
//! Turns what the customer hands over into the Payment rows to create, the
//! change to give back, the prepaid credit to draw and what stays owing.

use mostrador_shared::types::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SaleError;
use super::method::PaymentMethod;

/// Per-method amounts of a mixed payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedComponents {
    /// Cash handed over.
    #[serde(default)]
    pub cash: Decimal,
    /// Transfer amount.
    #[serde(default)]
    pub transfer: Decimal,
    /// Card amount.
    #[serde(default)]
    pub card: Decimal,
    /// Amount left on the customer's account.
    #[serde(default)]
    pub credit: Decimal,
}

impl MixedComponents {
    /// Sum of all components.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cash + self.transfer + self.card + self.credit
    }

    /// Receipt line such as `Efectivo: 60.00 | Tarjeta: 50.00`.
    #[must_use]
    pub fn receipt_notes(&self) -> String {
        [
            (PaymentMethod::Cash, self.cash),
            (PaymentMethod::Transfer, self.transfer),
            (PaymentMethod::Card, self.card),
            (PaymentMethod::Credit, self.credit),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .map(|(method, amount)| format!("{}: {amount:.2}", method.label()))
        .collect::<Vec<_>>()
        .join(" | ")
    }
}

/// What the customer pays with at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Method.
    pub method: PaymentMethod,
    /// Amount handed over (ignored for mixed, credit and account credit).
    #[serde(default)]
    pub amount: Decimal,
    /// Components when `method` is mixed.
    #[serde(default)]
    pub mixed: Option<MixedComponents>,
}

/// A Payment row to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPayment {
    /// Cash, transfer or card.
    pub method: PaymentMethod,
    /// Amount applied to the sale.
    pub amount: Decimal,
}

/// Outcome of planning a sale payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Payment rows to create, one per tender method.
    pub payments: Vec<PlannedPayment>,
    /// Sum of `payments`.
    pub paid_now: Decimal,
    /// Excess handed back; never reaches the ledger.
    pub change_amount: Decimal,
    /// Prepaid credit to draw.
    pub credit_application: Decimal,
    /// Left owing on the customer's account.
    pub amount_due: Decimal,
    /// Applied components, recorded on mixed sales.
    pub mixed: Option<MixedComponents>,
    /// Receipt notes for mixed sales.
    pub notes: Option<String>,
}

impl PaymentPlan {
    /// Per-method amounts to store on the sale for breakdown reporting.
    ///
    /// Whatever stays owing is recorded as the on-account component. Sales
    /// paid from prepaid credit record no components.
    #[must_use]
    pub fn recorded_components(&self, method: PaymentMethod) -> Option<MixedComponents> {
        if let Some(mixed) = self.mixed {
            return Some(mixed);
        }
        let mut components = MixedComponents {
            credit: self.amount_due,
            ..MixedComponents::default()
        };
        match method {
            PaymentMethod::Cash => components.cash = self.paid_now,
            PaymentMethod::Transfer => components.transfer = self.paid_now,
            PaymentMethod::Card => components.card = self.paid_now,
            PaymentMethod::Credit | PaymentMethod::Mixed => {}
            PaymentMethod::AccountCredit => return None,
        }
        Some(components)
    }

    fn nothing_paid(total: Decimal) -> Self {
        Self {
            payments: Vec::new(),
            paid_now: Decimal::ZERO,
            change_amount: Decimal::ZERO,
            credit_application: Decimal::ZERO,
            amount_due: total,
            mixed: None,
            notes: None,
        }
    }
}

/// Plans how `request` settles a sale of `total`.
///
/// Tendered amounts above the total become change. For mixed payments the
/// excess comes off the cash component; transfer, card and on-account
/// components together may not exceed the total.
pub fn plan_payment(total: Decimal, request: &PaymentRequest) -> Result<PaymentPlan, SaleError> {
    let total = Money::non_negative(total)?.amount();

    match request.method {
        PaymentMethod::Cash | PaymentMethod::Transfer | PaymentMethod::Card => {
            let tendered = Money::non_negative(request.amount)?.amount();
            let applied = tendered.min(total);
            let mut plan = PaymentPlan::nothing_paid(total - applied);
            if applied > Decimal::ZERO {
                plan.payments.push(PlannedPayment {
                    method: request.method,
                    amount: applied,
                });
            }
            plan.paid_now = applied;
            plan.change_amount = tendered - applied;
            Ok(plan)
        }
        PaymentMethod::Credit => Ok(PaymentPlan::nothing_paid(total)),
        PaymentMethod::AccountCredit => {
            let mut plan = PaymentPlan::nothing_paid(Decimal::ZERO);
            plan.credit_application = total;
            Ok(plan)
        }
        PaymentMethod::Mixed => plan_mixed(total, request.mixed.as_ref()),
    }
}

fn plan_mixed(total: Decimal, components: Option<&MixedComponents>) -> Result<PaymentPlan, SaleError> {
    let components = components.ok_or(SaleError::MixedComponentsMissing)?;
    let cash = Money::non_negative(components.cash)?.amount();
    let transfer = Money::non_negative(components.transfer)?.amount();
    let card = Money::non_negative(components.card)?.amount();
    let credit = Money::non_negative(components.credit)?.amount();

    if components.total().is_zero() {
        return Err(SaleError::MixedComponentsMissing);
    }

    let non_cash = transfer + card + credit;
    if non_cash > total {
        return Err(SaleError::MixedExceedsTotal {
            components: non_cash,
            total,
        });
    }

    let cash_applied = cash.min(total - non_cash);
    let applied = MixedComponents {
        cash: cash_applied,
        transfer,
        card,
        credit,
    };

    let payments: Vec<PlannedPayment> = [
        (PaymentMethod::Cash, cash_applied),
        (PaymentMethod::Transfer, transfer),
        (PaymentMethod::Card, card),
    ]
    .into_iter()
    .filter(|(_, amount)| *amount > Decimal::ZERO)
    .map(|(method, amount)| PlannedPayment { method, amount })
    .collect();
    let paid_now: Decimal = payments.iter().map(|p| p.amount).sum();

    Ok(PaymentPlan {
        payments,
        paid_now,
        change_amount: cash - cash_applied,
        credit_application: Decimal::ZERO,
        amount_due: total - paid_now,
        mixed: Some(applied),
        notes: Some(applied.receipt_notes()),
    })
}
