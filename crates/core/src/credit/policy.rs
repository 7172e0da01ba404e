//! Credit and payment policy decisions.

use chrono::{DateTime, Utc};
use mostrador_shared::types::{CustomerId, Money, MoneyError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{AccountSnapshot, LedgerError};

/// How an incoming standalone payment is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Reduces existing debt.
    Payment,
    /// Deposit on an account without debt; becomes prepaid credit.
    AdvancePayment,
}

/// Result of classifying a payment against the current balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentClassification {
    /// Payment or advance.
    pub payment_type: PaymentType,
    /// Portion left as credit in the customer's favor (advance or allowed overpayment).
    pub credit_deposit: Decimal,
}

/// Whether the customer currently holds credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAvailability {
    /// Balance is negative.
    pub has_credit: bool,
    /// Absolute value of the credit balance, zero otherwise.
    pub amount: Decimal,
    /// Operator-facing message.
    pub message: String,
}

/// Credit policy. Stateless.
pub struct CreditService;

impl CreditService {
    /// Classifies a payment of `amount` against `balance`.
    ///
    /// No debt (`balance <= 0`) makes it an advance. With debt, paying more than
    /// owed is rejected unless `allow_overpayment`, in which case the excess
    /// becomes prepaid credit.
    pub fn determine_payment_type(
        balance: Decimal,
        amount: Money,
        allow_overpayment: bool,
    ) -> Result<PaymentClassification, LedgerError> {
        let amount = amount.amount();
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount(MoneyError::NotPositive));
        }

        if balance <= Decimal::ZERO {
            return Ok(PaymentClassification {
                payment_type: PaymentType::AdvancePayment,
                credit_deposit: amount,
            });
        }

        if amount > balance {
            if !allow_overpayment {
                return Err(LedgerError::ExceedsDebt {
                    amount,
                    debt: balance,
                });
            }
            return Ok(PaymentClassification {
                payment_type: PaymentType::Payment,
                credit_deposit: amount - balance,
            });
        }

        Ok(PaymentClassification {
            payment_type: PaymentType::Payment,
            credit_deposit: Decimal::ZERO,
        })
    }

    /// Validates a standalone payment before it is recorded.
    ///
    /// Advances are only taken when the caller explicitly allows paying over
    /// the (zero) debt, and must carry a note explaining their purpose.
    pub fn validate_standalone_payment(
        account: &AccountSnapshot,
        customer_id: CustomerId,
        amount: Money,
        allow_overpayment: bool,
        notes: Option<&str>,
    ) -> Result<PaymentClassification, LedgerError> {
        if !account.is_active {
            return Err(LedgerError::AccountInactive(customer_id));
        }
        let classification =
            Self::determine_payment_type(account.balance, amount, allow_overpayment)?;

        if classification.payment_type == PaymentType::AdvancePayment {
            if !allow_overpayment {
                return Err(LedgerError::NoOutstandingBalance);
            }
            if notes.is_none_or(|n| n.trim().is_empty()) {
                return Err(LedgerError::AdvanceNoteRequired);
            }
        }
        Ok(classification)
    }

    /// Reports whether the balance is in the customer's favor.
    #[must_use]
    pub fn check_credit_availability(balance: Decimal) -> CreditAvailability {
        if balance < Decimal::ZERO {
            let amount = balance.abs();
            CreditAvailability {
                has_credit: true,
                amount,
                message: format!("El cliente tiene saldo a favor de ${amount:.2}"),
            }
        } else {
            CreditAvailability {
                has_credit: false,
                amount: Decimal::ZERO,
                message: "El cliente no tiene saldo a favor".to_string(),
            }
        }
    }

    /// Validates paying `amount` of a sale from the customer's credit balance.
    ///
    /// `sale_due` is the unpaid part of the sale already charged to the
    /// balance, zero when the sale has not been posted yet.
    pub fn validate_credit_application(
        account: &AccountSnapshot,
        customer_id: CustomerId,
        amount: Money,
        sale_due: Decimal,
    ) -> Result<(), LedgerError> {
        if !account.is_active {
            return Err(LedgerError::AccountInactive(customer_id));
        }
        let available = account.applicable_credit(sale_due);
        if amount.amount() > available {
            return Err(LedgerError::InsufficientCredit {
                requested: amount.amount(),
                available,
            });
        }
        Ok(())
    }

    /// Validates leaving `due` unpaid on the customer's account.
    ///
    /// Rejected when the account is inactive or blocked, or when a positive
    /// credit limit would be exceeded. A zero limit means no limit.
    pub fn check_on_account_due(
        account: &AccountSnapshot,
        customer_id: CustomerId,
        due: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        if due <= Decimal::ZERO {
            return Ok(());
        }
        if !account.is_active {
            return Err(LedgerError::AccountInactive(customer_id));
        }
        if let Some(until) = account.blocked_until.filter(|_| account.is_blocked(now)) {
            return Err(LedgerError::AccountBlocked { customer_id, until });
        }
        let projected = account.balance + due;
        if account.credit_limit > Decimal::ZERO && projected > account.credit_limit {
            return Err(LedgerError::CreditLimitExceeded {
                projected,
                limit: account.credit_limit,
            });
        }
        Ok(())
    }

    /// Validates a new credit limit.
    pub fn validate_credit_limit(limit: Decimal) -> Result<Money, LedgerError> {
        if limit < Decimal::ZERO {
            return Err(LedgerError::NegativeCreditLimit);
        }
        Ok(Money::non_negative(limit)?)
    }

    /// Validates a temporary block end.
    pub fn validate_block(until: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if until <= now {
            return Err(LedgerError::BlockInPast);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionKind;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn money(v: Decimal) -> Money {
        Money::positive(v).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case(dec!(0), dec!(100), false, PaymentType::AdvancePayment, dec!(100))]
    #[case(dec!(-20), dec!(50), false, PaymentType::AdvancePayment, dec!(50))]
    #[case(dec!(200), dec!(50), false, PaymentType::Payment, dec!(0))]
    #[case(dec!(200), dec!(200), false, PaymentType::Payment, dec!(0))]
    #[case(dec!(200), dec!(250), true, PaymentType::Payment, dec!(50))]
    fn test_determine_payment_type(
        #[case] balance: Decimal,
        #[case] amount: Decimal,
        #[case] allow: bool,
        #[case] expected: PaymentType,
        #[case] deposit: Decimal,
    ) {
        let result = CreditService::determine_payment_type(balance, money(amount), allow).unwrap();
        assert_eq!(result.payment_type, expected);
        assert_eq!(result.credit_deposit, deposit);
    }

    #[test]
    fn test_overpayment_rejected_without_allowance() {
        let err = CreditService::determine_payment_type(dec!(40), money(dec!(100)), false).unwrap_err();
        assert_eq!(
            err,
            LedgerError::ExceedsDebt {
                amount: dec!(100),
                debt: dec!(40),
            }
        );
    }

    #[test]
    fn test_payment_without_debt_rejected() {
        let account = AccountSnapshot::default();
        let err = CreditService::validate_standalone_payment(
            &account,
            CustomerId::new(),
            money(dec!(100)),
            false,
            None,
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::NoOutstandingBalance);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn test_advance_requires_note(#[case] notes: Option<&str>) {
        let account = AccountSnapshot::default();
        let err = CreditService::validate_standalone_payment(
            &account,
            CustomerId::new(),
            money(dec!(100)),
            true,
            notes,
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::AdvanceNoteRequired);
    }

    #[test]
    fn test_advance_with_note_accepted() {
        let account = AccountSnapshot::default();
        let result = CreditService::validate_standalone_payment(
            &account,
            CustomerId::new(),
            money(dec!(100)),
            true,
            Some("Seña reparación notebook"),
        )
        .unwrap();
        assert_eq!(result.payment_type, PaymentType::AdvancePayment);
    }

    #[test]
    fn test_check_credit_availability() {
        let with_credit = CreditService::check_credit_availability(dec!(-75.5));
        assert!(with_credit.has_credit);
        assert_eq!(with_credit.amount, dec!(75.5));
        assert_eq!(with_credit.message, "El cliente tiene saldo a favor de $75.50");

        let without = CreditService::check_credit_availability(dec!(10));
        assert!(!without.has_credit);
        assert_eq!(without.amount, dec!(0));
    }

    #[test]
    fn test_credit_application_limited_by_credit_balance() {
        let account = AccountSnapshot {
            balance: dec!(-100),
            ..AccountSnapshot::default()
        };
        let id = CustomerId::new();
        assert!(
            CreditService::validate_credit_application(&account, id, money(dec!(100)), dec!(0)).is_ok()
        );
        assert!(matches!(
            CreditService::validate_credit_application(&account, id, money(dec!(100.01)), dec!(0)),
            Err(LedgerError::InsufficientCredit { .. })
        ));
    }

    #[test]
    fn test_repair_deposit_can_pay_posted_sale() {
        let id = CustomerId::new();
        let mut account = AccountSnapshot::default();
        account.apply(TransactionKind::RepairDeposit, dec!(50), now());
        account.apply(TransactionKind::Sale, dec!(100), now());

        assert!(
            CreditService::validate_credit_application(&account, id, money(dec!(50)), dec!(100)).is_ok()
        );
        assert_eq!(
            CreditService::validate_credit_application(&account, id, money(dec!(60)), dec!(100)),
            Err(LedgerError::InsufficientCredit {
                requested: dec!(60),
                available: dec!(50),
            })
        );
    }

    #[test]
    fn test_on_account_due_respects_limit() {
        let id = CustomerId::new();
        let mut account = AccountSnapshot::new(dec!(1000));
        account.balance = dec!(800);
        assert!(CreditService::check_on_account_due(&account, id, dec!(200), now()).is_ok());
        assert_eq!(
            CreditService::check_on_account_due(&account, id, dec!(250), now()),
            Err(LedgerError::CreditLimitExceeded {
                projected: dec!(1050),
                limit: dec!(1000),
            })
        );

        let unlimited = AccountSnapshot {
            balance: dec!(50_000),
            ..AccountSnapshot::default()
        };
        assert!(CreditService::check_on_account_due(&unlimited, id, dec!(10_000), now()).is_ok());
    }

    #[test]
    fn test_on_account_due_rejects_blocked_and_inactive() {
        let id = CustomerId::new();
        let until = now() + Duration::days(2);
        let blocked = AccountSnapshot {
            blocked_until: Some(until),
            ..AccountSnapshot::default()
        };
        assert_eq!(
            CreditService::check_on_account_due(&blocked, id, dec!(1), now()),
            Err(LedgerError::AccountBlocked {
                customer_id: id,
                until,
            })
        );
        assert!(CreditService::check_on_account_due(&blocked, id, dec!(0), now()).is_ok());

        let inactive = AccountSnapshot {
            is_active: false,
            ..AccountSnapshot::default()
        };
        assert_eq!(
            CreditService::check_on_account_due(&inactive, id, dec!(1), now()),
            Err(LedgerError::AccountInactive(id))
        );
    }

    #[test]
    fn test_limit_and_block_validation() {
        assert_eq!(
            CreditService::validate_credit_limit(dec!(-1)),
            Err(LedgerError::NegativeCreditLimit)
        );
        assert!(CreditService::validate_credit_limit(dec!(0)).is_ok());
        assert_eq!(
            CreditService::validate_block(now(), now()),
            Err(LedgerError::BlockInPast)
        );
    }
}
