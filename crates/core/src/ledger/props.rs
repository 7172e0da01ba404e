//! Property-based tests for ledger posting.
//!
//! Checks that the cached balance always equals both the last running
//! balance and the replayed sum of impacts.

use chrono::{TimeZone, Utc};
use mostrador_shared::types::ActorId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::AccountSnapshot;
use super::kind::TransactionKind;
use super::service::{LedgerEvent, LedgerService};

/// Strategy to generate a valid positive amount (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate any transaction kind.
fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Sale),
        Just(TransactionKind::Payment),
        Just(TransactionKind::CreditNote),
        Just(TransactionKind::DebitNote),
        Just(TransactionKind::OpeningBalance),
        Just(TransactionKind::Adjustment),
        Just(TransactionKind::RepairDeposit),
        Just(TransactionKind::VoidSale),
        Just(TransactionKind::CreditApplication),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The account balance equals the last balance_after and the replayed sum.
    #[test]
    fn prop_balance_matches_history(
        events in prop::collection::vec((kind_strategy(), positive_amount()), 0..40)
    ) {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let mut account = AccountSnapshot::default();
        let mut postings = Vec::new();

        for (kind, amount) in &events {
            let event = LedgerEvent::new(*kind, *amount, ActorId(1), at).unwrap();
            postings.push(LedgerService::post(&mut account, &event));
        }

        let last_after = postings.last().map_or(Decimal::ZERO, |p| p.balance_after);
        prop_assert_eq!(account.balance, last_after);
        prop_assert_eq!(account.balance, LedgerService::replay(events.iter().copied()));
        prop_assert!(LedgerService::is_consistent(&postings, account.balance));
        prop_assert_eq!(account.transaction_count, i64::try_from(events.len()).unwrap());
    }

    /// A sale fully paid in the same breath leaves the balance unchanged.
    #[test]
    fn prop_full_payment_is_neutral(start in -5_000_000i64..5_000_000i64, amount in positive_amount()) {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let start = Decimal::new(start, 2);
        let mut account = AccountSnapshot { balance: start, ..AccountSnapshot::default() };

        let sale = LedgerEvent::new(TransactionKind::Sale, amount, ActorId(1), at).unwrap();
        let payment = LedgerEvent::new(TransactionKind::Payment, amount, ActorId(1), at).unwrap();
        LedgerService::post(&mut account, &sale);
        LedgerService::post(&mut account, &payment);

        prop_assert_eq!(account.balance, start);
    }

    /// Available credit is always the credit side of the balance.
    #[test]
    fn prop_available_credit_tracks_balance(
        events in prop::collection::vec((kind_strategy(), positive_amount()), 1..40)
    ) {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let mut account = AccountSnapshot::default();
        for (kind, amount) in events {
            let event = LedgerEvent::new(kind, amount, ActorId(1), at).unwrap();
            LedgerService::post(&mut account, &event);
            prop_assert!(account.available_credit >= Decimal::ZERO);
            prop_assert_eq!(account.available_credit, (-account.balance).max(Decimal::ZERO));
        }
    }
}
