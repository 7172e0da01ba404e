//! Per-method totals for the daily summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sales::{MixedComponents, PaymentMethod};

/// Amounts split by payment method.
///
/// Mixed sales never appear as their own bucket: their components are added
/// to the cash, transfer, card and credit buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBreakdown {
    /// Cash.
    pub cash: Decimal,
    /// Transfer.
    pub transfer: Decimal,
    /// Card.
    pub card: Decimal,
    /// Left on account.
    pub credit: Decimal,
    /// Paid from prepaid credit.
    pub account_credit: Decimal,
}

impl MethodBreakdown {
    /// Adds `amount` to the bucket of `method`. Mixed amounts without
    /// components are ignored; use [`Self::add_mixed`].
    pub fn add(&mut self, method: PaymentMethod, amount: Decimal) {
        match method {
            PaymentMethod::Cash => self.cash += amount,
            PaymentMethod::Transfer => self.transfer += amount,
            PaymentMethod::Card => self.card += amount,
            PaymentMethod::Credit => self.credit += amount,
            PaymentMethod::AccountCredit => self.account_credit += amount,
            PaymentMethod::Mixed => {}
        }
    }

    /// Adds each component of a mixed payment to its bucket.
    pub fn add_mixed(&mut self, components: &MixedComponents) {
        self.cash += components.cash;
        self.transfer += components.transfer;
        self.card += components.card;
        self.credit += components.credit;
    }

    /// Adds a sale.
    ///
    /// Sales paid from prepaid credit go to the account-credit bucket; any
    /// other sale with recorded components is split by component.
    pub fn add_sale(&mut self, method: PaymentMethod, total: Decimal, components: Option<&MixedComponents>) {
        match (method, components) {
            (PaymentMethod::AccountCredit, _) => self.account_credit += total,
            (_, Some(components)) => self.add_mixed(components),
            (_, None) => self.add(method, total),
        }
    }

    /// Sum of all buckets.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cash + self.transfer + self.card + self.credit + self.account_credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sales_split_into_buckets() {
        let mut breakdown = MethodBreakdown::default();
        breakdown.add_sale(PaymentMethod::Cash, dec!(200), None);
        breakdown.add_sale(
            PaymentMethod::Mixed,
            dec!(110),
            Some(&MixedComponents {
                cash: dec!(60),
                card: dec!(50),
                ..MixedComponents::default()
            }),
        );
        breakdown.add_sale(PaymentMethod::Credit, dec!(30), None);
        breakdown.add_sale(
            PaymentMethod::Cash,
            dec!(3000),
            Some(&MixedComponents {
                cash: dec!(1000),
                credit: dec!(2000),
                ..MixedComponents::default()
            }),
        );
        breakdown.add_sale(PaymentMethod::AccountCredit, dec!(80), None);

        assert_eq!(breakdown.cash, dec!(1260));
        assert_eq!(breakdown.card, dec!(50));
        assert_eq!(breakdown.credit, dec!(2030));
        assert_eq!(breakdown.account_credit, dec!(80));
        assert_eq!(breakdown.total(), dec!(3420));
    }
}
