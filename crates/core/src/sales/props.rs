//! Property-based tests for payment planning and status derivation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::method::PaymentMethod;
use super::payment::{MixedComponents, PaymentRequest, plan_payment};
use super::status::PaymentStatus;

fn cents(max: i64) -> impl Strategy<Value = Decimal> {
    (0i64..max).prop_map(|c| Decimal::new(c, 2))
}

fn tender_method() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::Transfer),
        Just(PaymentMethod::Card),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Paid now plus amount due always equals the total; change is what was over-tendered.
    #[test]
    fn prop_single_method_conserves_total(
        total in cents(1_000_000),
        tendered in cents(2_000_000),
        method in tender_method(),
    ) {
        let plan = plan_payment(total, &PaymentRequest { method, amount: tendered, mixed: None }).unwrap();
        prop_assert_eq!(plan.paid_now + plan.amount_due, total);
        prop_assert_eq!(plan.paid_now + plan.change_amount, tendered);
        prop_assert!(plan.change_amount >= Decimal::ZERO);
        prop_assert!(plan.amount_due >= Decimal::ZERO);
    }

    /// Accepted mixed plans never record more than the total.
    #[test]
    fn prop_mixed_never_exceeds_total(
        total in cents(100_000),
        cash in cents(100_000),
        transfer in cents(50_000),
        card in cents(50_000),
        credit in cents(50_000),
    ) {
        let request = PaymentRequest {
            method: PaymentMethod::Mixed,
            amount: Decimal::ZERO,
            mixed: Some(MixedComponents { cash, transfer, card, credit }),
        };
        if let Ok(plan) = plan_payment(total, &request) {
            let applied = plan.mixed.unwrap();
            prop_assert!(applied.total() <= total);
            prop_assert_eq!(plan.paid_now + plan.amount_due, total);
            prop_assert_eq!(applied.cash + plan.change_amount, cash);
            let sum: Decimal = plan.payments.iter().map(|p| p.amount).sum();
            prop_assert_eq!(sum, plan.paid_now);
        }
    }

    /// Status derivation matches the paid-amount rule.
    #[test]
    fn prop_status_matches_paid_amount(total in cents(100_000), paid in cents(200_000)) {
        let status = PaymentStatus::derive(total, paid, false);
        prop_assert_eq!(status == PaymentStatus::Paid, paid >= total);
        prop_assert_eq!(status == PaymentStatus::Partial, paid > Decimal::ZERO && paid < total);
        prop_assert_eq!(status == PaymentStatus::Pending, paid.is_zero() && total > Decimal::ZERO);
    }
}
