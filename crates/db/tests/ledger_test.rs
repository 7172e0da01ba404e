//! Customer ledger integration tests.
//!
//! Covers the running-balance chain, standalone payments and credit
//! applications against a real database. Tests skip when no database is
//! configured.

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_wrap)]

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::future::join_all;
use mostrador_core::credit::PaymentType;
use mostrador_core::ledger::{LedgerError, ReferenceType, TransactionKind};
use mostrador_core::sales::{PaymentMethod, SaleError};
use mostrador_db::entities::sea_orm_active_enums::{PaymentKind, TransactionType};
use mostrador_db::repositories::{
    CustomerAccountError, CustomerAccountRepository, RecordTransactionInput, RegisterPaymentInput,
    SaleRepoError, SaleRepository,
};
use mostrador_shared::types::{CustomerId, SaleId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

use common::{ACTOR, create_customer, create_product, customer_id, sale_input, single, test_db};

fn entry(customer_id: CustomerId, kind: TransactionKind, amount: Decimal) -> RecordTransactionInput {
    RecordTransactionInput {
        customer_id,
        kind,
        amount,
        reference: None,
        description: None,
        transaction_date: None,
        actor: ACTOR,
    }
}

fn payment(customer_id: CustomerId, amount: Decimal) -> RegisterPaymentInput {
    RegisterPaymentInput {
        customer_id,
        amount,
        method: PaymentMethod::Cash,
        mixed: None,
        allow_overpayment: false,
        notes: None,
        actor: ACTOR,
    }
}

#[tokio::test]
async fn test_running_balance_chain() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let repo = CustomerAccountRepository::new(db.clone());

    let postings = [
        (TransactionKind::OpeningBalance, dec!(500)),
        (TransactionKind::Sale, dec!(1200.50)),
        (TransactionKind::Payment, dec!(700)),
        (TransactionKind::CreditNote, dec!(100.50)),
        (TransactionKind::DebitNote, dec!(40)),
    ];
    for (kind, amount) in postings {
        repo.record_transaction(entry(id, kind, amount))
            .await
            .expect("posting should succeed");
    }

    let rows = repo.list_transactions(id).await.unwrap();
    assert_eq!(rows.len(), postings.len());

    let mut running = Decimal::ZERO;
    for row in &rows {
        assert_eq!(row.balance_before, running);
        let kind: TransactionKind = row.transaction_type.into();
        running += kind.impact_amount(row.amount);
        assert_eq!(row.balance_after, running);
    }

    let account = repo.get_customer_account(id).await.unwrap();
    assert_eq!(account.account_balance, dec!(940.00));
    assert_eq!(account.account_balance, rows.last().unwrap().balance_after);
    assert_eq!(account.total_sales, dec!(1200.50));
    assert_eq!(account.total_payments, dec!(700));
    assert_eq!(account.total_credit_notes, dec!(100.50));
    assert_eq!(account.total_debit_notes, dec!(40));
    assert_eq!(account.transaction_count, postings.len() as i64);
}

#[tokio::test]
async fn test_rejects_invalid_amounts() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let repo = CustomerAccountRepository::new(db.clone());

    for amount in [dec!(0), dec!(-10), dec!(10.001)] {
        let err = repo
            .record_transaction(entry(id, TransactionKind::Sale, amount))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CustomerAccountError::Ledger(LedgerError::InvalidAmount(_))
        ));
    }

    assert!(repo.list_transactions(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_postings_keep_the_chain() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let repo = Arc::new(CustomerAccountRepository::new(db.clone()));

    const TASKS: usize = 25;
    let barrier = Arc::new(Barrier::new(TASKS));
    let handles = (0..TASKS).map(|i| {
        let repo = Arc::clone(&repo);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            let mut input = entry(id, TransactionKind::Sale, dec!(10.00));
            input.description = Some(format!("Venta concurrente {}", i));
            repo.record_transaction(input).await
        })
    });

    for result in join_all(handles).await {
        result.expect("task should not panic").expect("posting should succeed");
    }

    let mut rows = repo.list_transactions(id).await.unwrap();
    assert_eq!(rows.len(), TASKS);

    rows.sort_by_key(|row| row.balance_before);
    let mut running = Decimal::ZERO;
    for row in &rows {
        assert_eq!(row.balance_before, running, "lost update detected");
        running = row.balance_after;
    }

    let account = repo.get_customer_account(id).await.unwrap();
    assert_eq!(account.account_balance, dec!(250.00));
    assert_eq!(account.account_balance, running);
    assert_eq!(account.transaction_count, TASKS as i64);
}

#[tokio::test]
async fn test_concurrent_sales_and_payments() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(100), 1_000).await;

    let accounts = CustomerAccountRepository::new(db.clone());
    accounts
        .record_transaction(entry(id, TransactionKind::OpeningBalance, dec!(1000)))
        .await
        .unwrap();

    let sales = Arc::new(SaleRepository::new(db.clone()));
    let accounts = Arc::new(accounts);

    const ROUNDS: usize = 10;
    let mut handles = Vec::with_capacity(ROUNDS * 2);
    for _ in 0..ROUNDS {
        let sales = Arc::clone(&sales);
        handles.push(tokio::spawn(async move {
            sales
                .create_sale_with_payment(sale_input(
                    Some(id),
                    product,
                    1,
                    single(PaymentMethod::Credit, Decimal::ZERO),
                ))
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        }));
        let accounts = Arc::clone(&accounts);
        handles.push(tokio::spawn(async move {
            accounts
                .register_payment(payment(id, dec!(50)))
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        }));
    }

    for result in join_all(handles).await {
        result.expect("task should not panic").expect("operation should succeed");
    }

    let account = accounts.get_customer_account(id).await.unwrap();
    assert_eq!(account.account_balance, dec!(1500));

    let rows = accounts.list_transactions(id).await.unwrap();
    assert_eq!(rows.len(), 1 + ROUNDS * 2);
    let replayed: Decimal = rows
        .iter()
        .map(|row| TransactionKind::from(row.transaction_type).impact_amount(row.amount))
        .sum();
    assert_eq!(replayed, account.account_balance);
}

#[tokio::test]
async fn test_debt_payment_reduces_balance() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let repo = CustomerAccountRepository::new(db.clone());

    repo.record_transaction(entry(id, TransactionKind::Sale, dec!(2000)))
        .await
        .unwrap();

    let recorded = repo.register_payment(payment(id, dec!(800))).await.unwrap();
    assert_eq!(recorded.payment_type, PaymentType::Payment);
    assert_eq!(recorded.payments.len(), 1);
    assert_eq!(recorded.payments[0].payment_kind, PaymentKind::DebtPayment);
    assert_eq!(recorded.transaction.transaction_type, TransactionType::Payment);
    assert_eq!(
        recorded.transaction.reference_type.as_deref(),
        Some(ReferenceType::Payment.as_str())
    );
    assert_eq!(recorded.transaction.reference_id, Some(recorded.payments[0].id));
    assert_eq!(recorded.account.account_balance, dec!(1200));
    assert_eq!(recorded.account.available_credit, Decimal::ZERO);
    assert!(recorded.account.last_payment_date.is_some());
}

#[tokio::test]
async fn test_overpayment_requires_allowance() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let repo = CustomerAccountRepository::new(db.clone());

    repo.record_transaction(entry(id, TransactionKind::Sale, dec!(100)))
        .await
        .unwrap();

    let err = repo.register_payment(payment(id, dec!(150))).await.unwrap_err();
    assert!(matches!(
        err,
        CustomerAccountError::Ledger(LedgerError::ExceedsDebt { .. })
    ));

    let account = repo.get_customer_account(id).await.unwrap();
    assert_eq!(account.account_balance, dec!(100));
    assert_eq!(account.transaction_count, 1);

    let mut allowed = payment(id, dec!(150));
    allowed.allow_overpayment = true;
    let recorded = repo.register_payment(allowed).await.unwrap();
    assert_eq!(recorded.account.account_balance, dec!(-50));
    assert_eq!(recorded.account.available_credit, dec!(50));
}

#[tokio::test]
async fn test_advance_payment_becomes_credit() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let repo = CustomerAccountRepository::new(db.clone());

    let err = repo.register_payment(payment(id, dec!(300))).await.unwrap_err();
    assert!(matches!(
        err,
        CustomerAccountError::Ledger(LedgerError::NoOutstandingBalance)
    ));

    let mut no_note = payment(id, dec!(300));
    no_note.allow_overpayment = true;
    let err = repo.register_payment(no_note).await.unwrap_err();
    assert!(matches!(
        err,
        CustomerAccountError::Ledger(LedgerError::AdvanceNoteRequired)
    ));

    let mut advance = payment(id, dec!(300));
    advance.allow_overpayment = true;
    advance.notes = Some("Seña reparación pantalla".to_string());
    let recorded = repo.register_payment(advance).await.unwrap();
    assert_eq!(recorded.payment_type, PaymentType::AdvancePayment);
    assert_eq!(recorded.payments[0].payment_kind, PaymentKind::AdvancePayment);
    assert_eq!(recorded.account.account_balance, dec!(-300));
    assert_eq!(recorded.account.available_credit, dec!(300));
    assert_eq!(recorded.account.snapshot().applicable_credit(Decimal::ZERO), dec!(300));

    let availability = repo.check_credit_availability(id).await.unwrap();
    assert!(availability.has_credit);
    assert_eq!(availability.amount, recorded.account.available_credit);
}

#[tokio::test]
async fn test_apply_credit_without_credit_changes_nothing() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(3000), 10).await;

    let sales = SaleRepository::new(db.clone());
    let accounts = CustomerAccountRepository::new(db.clone());

    let created = sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::Credit, Decimal::ZERO),
        ))
        .await
        .unwrap();
    let sale_id = SaleId::from_uuid(created.sale.id);
    let before = accounts.get_customer_account(id).await.unwrap();

    let err = sales
        .apply_credit(id, sale_id, dec!(500), ACTOR)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SaleRepoError::Sale(SaleError::Ledger(LedgerError::InsufficientCredit { .. }))
    ));

    let after = accounts.get_customer_account(id).await.unwrap();
    assert_eq!(after, before);
    let sale = sales.get_sale(sale_id).await.unwrap();
    assert_eq!(sale.sale.paid_amount, Decimal::ZERO);
    assert!(sale.payments.is_empty());
}

#[tokio::test]
async fn test_apply_credit_from_advance() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(1000), 10).await;

    let sales = SaleRepository::new(db.clone());
    let accounts = CustomerAccountRepository::new(db.clone());

    let mut advance = payment(id, dec!(400));
    advance.allow_overpayment = true;
    advance.notes = Some("A cuenta de próxima compra".to_string());
    accounts.register_payment(advance).await.unwrap();

    let created = sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::Credit, Decimal::ZERO),
        ))
        .await
        .unwrap();
    let sale_id = SaleId::from_uuid(created.sale.id);
    assert_eq!(created.account.unwrap().account_balance, dec!(600));

    let applied = sales.apply_credit(id, sale_id, dec!(400), ACTOR).await.unwrap();
    assert_eq!(
        applied.transaction.transaction_type,
        TransactionType::CreditApplication
    );
    assert_eq!(applied.transaction.balance_before, applied.transaction.balance_after);
    assert_eq!(applied.account.account_balance, dec!(600));
    assert_eq!(applied.account.available_credit, Decimal::ZERO);
    assert_eq!(applied.sale.paid_amount, dec!(400));

    let refreshed = sales
        .update_sale_payment_status(sale_id)
        .await
        .unwrap();
    assert_eq!(refreshed.paid_amount, dec!(400));

    let err = sales.apply_credit(id, sale_id, dec!(700), ACTOR).await.unwrap_err();
    assert!(matches!(
        err,
        SaleRepoError::Sale(SaleError::ExceedsAmountDue { .. })
    ));
}

#[tokio::test]
async fn test_apply_credit_from_repair_deposit() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(1000), 10).await;

    let sales = SaleRepository::new(db.clone());
    let accounts = CustomerAccountRepository::new(db.clone());

    let deposit = accounts
        .record_transaction(entry(id, TransactionKind::RepairDeposit, dec!(250)))
        .await
        .unwrap();
    assert_eq!(deposit.balance_after, dec!(-250));
    let account = accounts.get_customer_account(id).await.unwrap();
    assert_eq!(account.available_credit, dec!(250));

    let created = sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::Credit, Decimal::ZERO),
        ))
        .await
        .unwrap();
    let sale_id = SaleId::from_uuid(created.sale.id);
    let account = created.account.unwrap();
    assert_eq!(account.account_balance, dec!(750));
    assert_eq!(account.available_credit, Decimal::ZERO);

    let err = sales.apply_credit(id, sale_id, dec!(250.01), ACTOR).await.unwrap_err();
    assert!(matches!(
        err,
        SaleRepoError::Sale(SaleError::Ledger(LedgerError::InsufficientCredit { .. }))
    ));

    let applied = sales.apply_credit(id, sale_id, dec!(250), ACTOR).await.unwrap();
    assert_eq!(applied.sale.paid_amount, dec!(250));
    assert_eq!(applied.account.account_balance, dec!(750));
}

#[tokio::test]
async fn test_credit_note_pays_account_credit_sale() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(400), 10).await;

    let sales = SaleRepository::new(db.clone());
    let accounts = CustomerAccountRepository::new(db.clone());

    accounts
        .record_transaction(entry(id, TransactionKind::CreditNote, dec!(500)))
        .await
        .unwrap();

    let created = sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::AccountCredit, Decimal::ZERO),
        ))
        .await
        .unwrap();
    let account = created.account.unwrap();
    assert_eq!(account.account_balance, dec!(-100));
    assert_eq!(account.available_credit, dec!(100));
}

#[tokio::test]
async fn test_sale_managed_kinds_cannot_be_entered_by_hand() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let repo = CustomerAccountRepository::new(db.clone());
    let before = repo.get_customer_account(id).await.unwrap();

    for kind in [TransactionKind::CreditApplication, TransactionKind::VoidSale] {
        let err = repo
            .record_transaction(entry(id, kind, dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CustomerAccountError::Ledger(LedgerError::SaleManagedKind(k)) if k == kind
        ));
    }

    let after = repo.get_customer_account(id).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_blocked_account_rejects_on_account_sales() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(100), 10).await;

    let accounts = CustomerAccountRepository::new(db.clone());
    let sales = SaleRepository::new(db.clone());

    accounts
        .block_account(id, Utc::now() + Duration::days(7), Some("Cheque rechazado".to_string()))
        .await
        .unwrap();

    let err = sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::Credit, Decimal::ZERO),
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SaleRepoError::Sale(SaleError::Ledger(LedgerError::AccountBlocked { .. }))
    ));

    accounts.unblock_account(id).await.unwrap();
    sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::Credit, Decimal::ZERO),
        ))
        .await
        .expect("unblocked account should accept the sale");
}

#[tokio::test]
async fn test_statement_window() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let repo = CustomerAccountRepository::new(db.clone());

    let now = Utc::now();
    let dated = |kind, amount, days_ago: i64| RecordTransactionInput {
        transaction_date: Some(now - Duration::days(days_ago)),
        ..entry(id, kind, amount)
    };

    repo.record_transaction(dated(TransactionKind::Sale, dec!(1000), 30))
        .await
        .unwrap();
    repo.record_transaction(dated(TransactionKind::Payment, dec!(200), 10))
        .await
        .unwrap();
    repo.record_transaction(dated(TransactionKind::Sale, dec!(50), 5))
        .await
        .unwrap();

    let statement = repo
        .get_statement(id, now - Duration::days(15), now)
        .await
        .unwrap();
    assert_eq!(statement.opening_balance, dec!(1000));
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(statement.totals.total_credits, dec!(200));
    assert_eq!(statement.totals.total_debits, dec!(50));
    assert_eq!(statement.closing_balance, dec!(850));
    assert_eq!(statement.current_balance, dec!(850));
}
