//! Customer account aggregate.
//!
//! The aggregate is the cached current state of a customer's ledger. It only
//! changes through [`AccountSnapshot::apply`], which also produces the
//! before/after balances for the matching ledger row.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::kind::TransactionKind;

/// Current state of a customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Positive = debt, negative = credit in favor of the customer.
    pub balance: Decimal,
    /// Maximum debt allowed; zero means no limit configured.
    pub credit_limit: Decimal,
    /// Credit in favor of the customer, `max(0, -balance)`. Kept in step
    /// with the balance by [`AccountSnapshot::apply`].
    pub available_credit: Decimal,
    /// Lifetime net sales charged.
    pub total_sales: Decimal,
    /// Lifetime payments and deposits received.
    pub total_payments: Decimal,
    /// Lifetime credit notes issued.
    pub total_credit_notes: Decimal,
    /// Lifetime debit notes issued.
    pub total_debit_notes: Decimal,
    /// Number of ledger rows.
    pub transaction_count: i64,
    /// Business date of the latest ledger row.
    pub last_transaction_date: Option<DateTime<Utc>>,
    /// Business date of the latest payment.
    pub last_payment_date: Option<DateTime<Utc>>,
    /// False once the account has been deactivated.
    pub is_active: bool,
    /// End of a temporary block.
    pub blocked_until: Option<DateTime<Utc>>,
    /// Why the account was blocked.
    pub block_reason: Option<String>,
}

impl Default for AccountSnapshot {
    fn default() -> Self {
        Self::new(Decimal::ZERO)
    }
}

/// Balance movement produced by applying one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Kind of the transaction.
    pub kind: TransactionKind,
    /// Positive magnitude.
    pub amount: Decimal,
    /// Balance right before the transaction.
    pub balance_before: Decimal,
    /// Balance right after the transaction.
    pub balance_after: Decimal,
}

impl Posting {
    /// Signed effect on the balance.
    #[must_use]
    pub fn impact(&self) -> Decimal {
        self.balance_after - self.balance_before
    }
}

/// Interprets a timestamp without offset as UTC.
#[must_use]
pub fn assume_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    naive.and_utc()
}

impl AccountSnapshot {
    /// A fresh, settled, active account.
    #[must_use]
    pub fn new(credit_limit: Decimal) -> Self {
        Self {
            balance: Decimal::ZERO,
            credit_limit,
            available_credit: Decimal::ZERO,
            total_sales: Decimal::ZERO,
            total_payments: Decimal::ZERO,
            total_credit_notes: Decimal::ZERO,
            total_debit_notes: Decimal::ZERO,
            transaction_count: 0,
            last_transaction_date: None,
            last_payment_date: None,
            is_active: true,
            blocked_until: None,
            block_reason: None,
        }
    }

    /// Customer owes money.
    #[must_use]
    pub fn has_debt(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Customer holds credit.
    #[must_use]
    pub fn has_credit(&self) -> bool {
        self.balance < Decimal::ZERO
    }

    /// Balance is exactly zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.balance.is_zero()
    }

    /// All credit in the customer's favor. Equals the cached
    /// `available_credit`; the balance is the single source.
    #[must_use]
    pub fn total_available_credit(&self) -> Decimal {
        (-self.balance).max(Decimal::ZERO)
    }

    /// Credit that can pay a sale whose unpaid `sale_due` is already charged
    /// to the balance. Pass zero for a sale not yet posted.
    #[must_use]
    pub fn applicable_credit(&self, sale_due: Decimal) -> Decimal {
        (sale_due - self.balance).max(Decimal::ZERO)
    }

    /// How much more debt the limit allows.
    #[must_use]
    pub fn remaining_credit_limit(&self) -> Decimal {
        if self.has_debt() {
            (self.credit_limit - self.balance).max(Decimal::ZERO)
        } else {
            self.credit_limit
        }
    }

    /// A block is in force iff `blocked_until` is set and later than `now`.
    #[must_use]
    pub fn is_blocked(&self, now: DateTime<Utc>) -> bool {
        self.blocked_until.is_some_and(|until| until > now)
    }

    /// Applies a transaction of `kind` for a positive `amount`.
    ///
    /// Updates the balance, the transaction counter, the activity dates and
    /// the lifetime total for the kind, then re-derives `available_credit`.
    pub fn apply(&mut self, kind: TransactionKind, amount: Decimal, at: DateTime<Utc>) -> Posting {
        let balance_before = self.balance;
        self.balance += kind.impact_amount(amount);
        self.available_credit = (-self.balance).max(Decimal::ZERO);

        match kind {
            TransactionKind::Sale => self.total_sales += amount,
            TransactionKind::VoidSale => self.total_sales -= amount,
            TransactionKind::Payment | TransactionKind::RepairDeposit => {
                self.total_payments += amount;
                self.last_payment_date = Some(at);
            }
            TransactionKind::CreditNote => self.total_credit_notes += amount,
            TransactionKind::DebitNote => self.total_debit_notes += amount,
            TransactionKind::CreditApplication
            | TransactionKind::OpeningBalance
            | TransactionKind::Adjustment => {}
        }

        self.transaction_count += 1;
        self.last_transaction_date = Some(at);

        Posting {
            kind,
            amount,
            balance_before,
            balance_after: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
    }

    fn account(balance: Decimal) -> AccountSnapshot {
        AccountSnapshot {
            balance,
            ..AccountSnapshot::default()
        }
    }

    #[test]
    fn test_derived_flags() {
        assert!(account(dec!(10)).has_debt());
        assert!(account(dec!(-10)).has_credit());
        assert!(account(dec!(0)).is_settled());
        assert!(!account(dec!(0)).has_debt());
    }

    #[test]
    fn test_applicable_credit() {
        assert_eq!(account(dec!(-40)).applicable_credit(dec!(0)), dec!(40));
        assert_eq!(account(dec!(40)).applicable_credit(dec!(0)), dec!(0));
        // Deposit of 60 followed by an unpaid sale of 100.
        assert_eq!(account(dec!(40)).applicable_credit(dec!(100)), dec!(60));
        assert_eq!(account(dec!(130)).applicable_credit(dec!(100)), dec!(0));
    }

    #[test]
    fn test_available_credit_follows_balance() {
        let mut acc = AccountSnapshot::default();
        acc.apply(TransactionKind::Payment, dec!(100), at());
        assert_eq!(acc.available_credit, dec!(100));
        assert_eq!(acc.total_available_credit(), dec!(100));
        assert_eq!(acc.applicable_credit(dec!(0)), dec!(100));

        acc.apply(TransactionKind::CreditNote, dec!(25), at());
        assert_eq!(acc.available_credit, dec!(125));

        acc.apply(TransactionKind::Sale, dec!(200), at());
        assert_eq!(acc.available_credit, dec!(0));
        assert_eq!(acc.total_available_credit(), dec!(0));
        assert_eq!(acc.balance, dec!(75));
    }

    #[test]
    fn test_remaining_credit_limit() {
        let mut acc = AccountSnapshot::new(dec!(1000));
        assert_eq!(acc.remaining_credit_limit(), dec!(1000));
        acc.balance = dec!(300);
        assert_eq!(acc.remaining_credit_limit(), dec!(700));
        acc.balance = dec!(1200);
        assert_eq!(acc.remaining_credit_limit(), dec!(0));
    }

    #[test]
    fn test_block_is_time_bound() {
        let mut acc = AccountSnapshot::default();
        assert!(!acc.is_blocked(at()));
        acc.blocked_until = Some(at() + Duration::hours(1));
        assert!(acc.is_blocked(at()));
        acc.blocked_until = Some(at() - Duration::seconds(1));
        assert!(!acc.is_blocked(at()));
    }

    #[test]
    fn test_naive_block_is_read_as_utc() {
        let naive = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        let acc = AccountSnapshot {
            blocked_until: Some(assume_utc(naive)),
            ..AccountSnapshot::default()
        };
        assert!(acc.is_blocked(at()));
    }

    #[test]
    fn test_apply_sale_then_payment() {
        let mut acc = AccountSnapshot::default();
        let sale = acc.apply(TransactionKind::Sale, dec!(3000), at());
        assert_eq!(sale.balance_before, dec!(0));
        assert_eq!(sale.balance_after, dec!(3000));

        let payment = acc.apply(TransactionKind::Payment, dec!(1000), at());
        assert_eq!(payment.balance_before, dec!(3000));
        assert_eq!(payment.balance_after, dec!(2000));
        assert_eq!(payment.impact(), dec!(-1000));

        assert_eq!(acc.total_sales, dec!(3000));
        assert_eq!(acc.total_payments, dec!(1000));
        assert_eq!(acc.transaction_count, 2);
        assert_eq!(acc.last_payment_date, Some(at()));
    }

    #[test]
    fn test_credit_application_is_memo() {
        let mut acc = account(dec!(-50));
        let posting = acc.apply(TransactionKind::CreditApplication, dec!(20), at());
        assert_eq!(posting.balance_after, dec!(-50));
        assert_eq!(acc.transaction_count, 1);
    }

    #[test]
    fn test_void_sale_nets_out_lifetime_sales() {
        let mut acc = AccountSnapshot::default();
        acc.apply(TransactionKind::Sale, dec!(80), at());
        acc.apply(TransactionKind::VoidSale, dec!(80), at());
        assert_eq!(acc.total_sales, dec!(0));
        assert!(acc.is_settled());
    }
}
