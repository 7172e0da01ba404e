//! Ledger transaction kinds and their balance polarity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction in which a transaction kind moves the account balance.
///
/// Balance convention: positive = customer owes, negative = customer holds credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Increases the balance (more debt).
    Debit,
    /// Decreases the balance (less debt or more credit).
    Credit,
    /// Recorded for audit only, no balance impact.
    Memo,
}

impl Polarity {
    /// Returns `+1`, `-1` or `0`.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Debit => 1,
            Self::Credit => -1,
            Self::Memo => 0,
        }
    }
}

/// Kind of a customer ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Sale charged to the customer.
    Sale,
    /// Payment received from the customer.
    Payment,
    /// Credit note in favor of the customer.
    CreditNote,
    /// Debit note charged to the customer.
    DebitNote,
    /// Use of prepaid credit toward a sale.
    CreditApplication,
    /// Balance carried over when the account was migrated.
    OpeningBalance,
    /// Manual upward correction.
    Adjustment,
    /// Deposit left for a repair order.
    RepairDeposit,
    /// Reversal of a voided sale.
    VoidSale,
}

impl TransactionKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Sale,
        Self::Payment,
        Self::CreditNote,
        Self::DebitNote,
        Self::CreditApplication,
        Self::OpeningBalance,
        Self::Adjustment,
        Self::RepairDeposit,
        Self::VoidSale,
    ];

    /// The single place where a kind's balance direction is decided.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::Sale | Self::DebitNote | Self::OpeningBalance | Self::Adjustment => {
                Polarity::Debit
            }
            Self::Payment | Self::CreditNote | Self::RepairDeposit | Self::VoidSale => {
                Polarity::Credit
            }
            Self::CreditApplication => Polarity::Memo,
        }
    }

    /// True if this kind increases the balance.
    #[must_use]
    pub const fn is_debit(self) -> bool {
        matches!(self.polarity(), Polarity::Debit)
    }

    /// True if this kind decreases the balance.
    #[must_use]
    pub const fn is_credit(self) -> bool {
        matches!(self.polarity(), Polarity::Credit)
    }

    /// Kinds that only the sale workflow posts, always paired with the sale.
    #[must_use]
    pub const fn is_sale_managed(self) -> bool {
        matches!(self, Self::CreditApplication | Self::VoidSale)
    }

    /// Signed effect of a positive `amount` on the balance.
    #[must_use]
    pub fn impact_amount(self, amount: Decimal) -> Decimal {
        match self.polarity() {
            Polarity::Debit => amount,
            Polarity::Credit => -amount,
            Polarity::Memo => Decimal::ZERO,
        }
    }

    /// Storage name (lowercase snake case).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Payment => "payment",
            Self::CreditNote => "credit_note",
            Self::DebitNote => "debit_note",
            Self::CreditApplication => "credit_application",
            Self::OpeningBalance => "opening_balance",
            Self::Adjustment => "adjustment",
            Self::RepairDeposit => "repair_deposit",
            Self::VoidSale => "void_sale",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| format!("Unknown transaction type: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case(TransactionKind::Sale, dec!(100))]
    #[case(TransactionKind::DebitNote, dec!(100))]
    #[case(TransactionKind::OpeningBalance, dec!(100))]
    #[case(TransactionKind::Adjustment, dec!(100))]
    #[case(TransactionKind::Payment, dec!(-100))]
    #[case(TransactionKind::CreditNote, dec!(-100))]
    #[case(TransactionKind::RepairDeposit, dec!(-100))]
    #[case(TransactionKind::VoidSale, dec!(-100))]
    #[case(TransactionKind::CreditApplication, dec!(0))]
    fn test_impact_amount(#[case] kind: TransactionKind, #[case] expected: Decimal) {
        assert_eq!(kind.impact_amount(dec!(100)), expected);
    }

    #[test]
    fn test_debit_and_credit_are_exclusive() {
        for kind in TransactionKind::ALL {
            assert!(!(kind.is_debit() && kind.is_credit()), "{kind}");
            let sign = Decimal::from(kind.polarity().sign());
            assert_eq!(kind.impact_amount(dec!(7.25)), dec!(7.25) * sign);
        }
    }

    #[rstest]
    #[case(TransactionKind::CreditApplication, true)]
    #[case(TransactionKind::VoidSale, true)]
    #[case(TransactionKind::Sale, false)]
    #[case(TransactionKind::RepairDeposit, false)]
    #[case(TransactionKind::Adjustment, false)]
    fn test_sale_managed_kinds(#[case] kind: TransactionKind, #[case] expected: bool) {
        assert_eq!(kind.is_sale_managed(), expected);
    }

    #[test]
    fn test_parse_storage_names() {
        for kind in TransactionKind::ALL {
            assert_eq!(TransactionKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(
            TransactionKind::from_str("VOID_SALE").unwrap(),
            TransactionKind::VoidSale
        );
        assert!(TransactionKind::from_str("refund").is_err());
    }
}
