//! Sale orchestration integration tests.
//!
//! Every sale runs in one database transaction: stock, sale rows, payment
//! rows and ledger postings either all land or none do.

#![allow(clippy::uninlined_format_args)]

mod common;

use mostrador_core::ledger::{ReferenceType, TransactionKind};
use mostrador_core::sales::{MixedComponents, PaymentMethod, PaymentRequest, SaleError};
use mostrador_db::entities::sea_orm_active_enums::{PaymentKind, PaymentStatus, TransactionType};
use mostrador_db::repositories::{
    CustomerAccountRepository, ProductRepository, RegisterPaymentInput, SaleItemInput,
    SaleRepoError, SaleRepository,
};
use mostrador_shared::types::SaleId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{ACTOR, create_customer, create_product, customer_id, sale_input, single, test_db};

#[tokio::test]
async fn test_partial_cash_sale_leaves_debt() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(3000), 5).await;

    let sales = SaleRepository::new(db.clone());
    let created = sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::Cash, dec!(1000)),
        ))
        .await
        .unwrap();

    assert_eq!(created.sale.total_amount, dec!(3000));
    assert_eq!(created.sale.paid_amount, dec!(1000));
    assert_eq!(created.sale.payment_status, PaymentStatus::Partial);
    assert_eq!(created.sale.cash_amount, Some(dec!(1000)));
    assert_eq!(created.sale.credit_amount, Some(dec!(2000)));
    assert_eq!(created.payments.len(), 1);
    assert_eq!(created.payments[0].payment_kind, PaymentKind::SalePayment);
    assert_eq!(created.account.as_ref().unwrap().account_balance, dec!(2000));

    let accounts = CustomerAccountRepository::new(db.clone());
    let rows = accounts.list_transactions(id).await.unwrap();
    let kinds: Vec<TransactionType> = rows.iter().map(|r| r.transaction_type).collect();
    assert_eq!(kinds, vec![TransactionType::Sale, TransactionType::Payment]);
    for row in &rows {
        assert_eq!(row.reference_type.as_deref(), Some(ReferenceType::Sale.as_str()));
        assert_eq!(row.reference_id, Some(created.sale.id));
    }

    let stock = ProductRepository::new(db.clone())
        .get_product(product)
        .await
        .unwrap()
        .stock;
    assert_eq!(stock, 4);
}

#[tokio::test]
async fn test_fully_paid_sale_is_balance_neutral() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(450), 5).await;

    let created = SaleRepository::new(db.clone())
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            2,
            single(PaymentMethod::Cash, dec!(1000)),
        ))
        .await
        .unwrap();

    assert_eq!(created.sale.total_amount, dec!(900));
    assert_eq!(created.sale.paid_amount, dec!(900));
    assert_eq!(created.sale.change_amount, dec!(100));
    assert_eq!(created.sale.payment_status, PaymentStatus::Paid);

    let account = created.account.unwrap();
    assert_eq!(account.account_balance, Decimal::ZERO);
    assert_eq!(account.total_sales, dec!(900));
    assert_eq!(account.total_payments, dec!(900));
    assert_eq!(account.transaction_count, 2);
}

#[tokio::test]
async fn test_mixed_payment_records_one_row_per_method() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(110), 5).await;

    let payment = PaymentRequest {
        method: PaymentMethod::Mixed,
        amount: Decimal::ZERO,
        mixed: Some(MixedComponents {
            cash: dec!(60),
            transfer: Decimal::ZERO,
            card: dec!(50),
            credit: Decimal::ZERO,
        }),
    };
    let created = SaleRepository::new(db.clone())
        .create_sale_with_payment(sale_input(Some(id), product, 1, payment))
        .await
        .unwrap();

    assert_eq!(created.sale.payment_status, PaymentStatus::Paid);
    assert_eq!(created.sale.cash_amount, Some(dec!(60)));
    assert_eq!(created.sale.card_amount, Some(dec!(50)));
    assert!(created.sale.notes.is_some());

    let mut amounts: Vec<Decimal> = created.payments.iter().map(|p| p.amount).collect();
    amounts.sort();
    assert_eq!(amounts, vec![dec!(50), dec!(60)]);
    assert_eq!(created.account.unwrap().account_balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_insufficient_stock_writes_nothing() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let scarce = create_product(&db, dec!(100), 2).await;
    let plenty = create_product(&db, dec!(100), 50).await;

    let mut input = sale_input(Some(id), plenty, 1, single(PaymentMethod::Credit, Decimal::ZERO));
    input.items.push(SaleItemInput {
        product_id: scarce,
        quantity: 3,
        discount: Decimal::ZERO,
    });

    let err = SaleRepository::new(db.clone())
        .create_sale_with_payment(input)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SaleRepoError::Sale(SaleError::InsufficientStock {
            requested: 3,
            available: 2,
            ..
        })
    ));

    let products = ProductRepository::new(db.clone());
    assert_eq!(products.get_product(scarce).await.unwrap().stock, 2);
    assert_eq!(products.get_product(plenty).await.unwrap().stock, 50);

    let accounts = CustomerAccountRepository::new(db.clone());
    assert!(accounts.list_transactions(id).await.unwrap().is_empty());
    assert_eq!(
        accounts.get_customer_account(id).await.unwrap().account_balance,
        Decimal::ZERO
    );
}

#[tokio::test]
async fn test_void_restores_stock_and_balance() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(3000), 5).await;

    let sales = SaleRepository::new(db.clone());
    let created = sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::Cash, dec!(1000)),
        ))
        .await
        .unwrap();
    let sale_id = SaleId::from_uuid(created.sale.id);

    let err = sales.void_sale(sale_id, "  ", ACTOR).await.unwrap_err();
    assert!(matches!(err, SaleRepoError::Sale(SaleError::VoidReasonRequired)));

    let voided = sales
        .void_sale(sale_id, "Cliente devolvió el equipo", ACTOR)
        .await
        .unwrap();
    assert!(voided.is_voided);
    assert_eq!(voided.payment_status, PaymentStatus::Voided);

    let details = sales.get_sale(sale_id).await.unwrap();
    assert!(details.payments.iter().all(|p| p.is_voided));

    let stock = ProductRepository::new(db.clone())
        .get_product(product)
        .await
        .unwrap()
        .stock;
    assert_eq!(stock, 5);

    let accounts = CustomerAccountRepository::new(db.clone());
    let account = accounts.get_customer_account(id).await.unwrap();
    assert_eq!(account.account_balance, Decimal::ZERO);
    assert_eq!(account.total_sales, Decimal::ZERO);
    // The refunded payment stays on record; the refund is a debit note.
    assert_eq!(account.total_payments, dec!(1000));
    assert_eq!(account.total_debit_notes, dec!(1000));

    let kinds: Vec<TransactionKind> = accounts
        .list_transactions(id)
        .await
        .unwrap()
        .iter()
        .map(|r| r.transaction_type.into())
        .collect();
    assert!(kinds.contains(&TransactionKind::VoidSale));
    assert!(kinds.contains(&TransactionKind::DebitNote));

    let err = sales.void_sale(sale_id, "otra vez", ACTOR).await.unwrap_err();
    assert!(matches!(err, SaleRepoError::Sale(SaleError::AlreadyVoided(_))));
}

#[tokio::test]
async fn test_void_restores_applied_credit() {
    let Some(db) = test_db().await else { return };
    let customer = create_customer(&db, Decimal::ZERO).await;
    let id = customer_id(&customer);
    let product = create_product(&db, dec!(200), 5).await;

    let accounts = CustomerAccountRepository::new(db.clone());
    accounts
        .register_payment(RegisterPaymentInput {
            customer_id: id,
            amount: dec!(200),
            method: PaymentMethod::Transfer,
            mixed: None,
            allow_overpayment: true,
            notes: Some("Seña".to_string()),
            actor: ACTOR,
        })
        .await
        .unwrap();

    let sales = SaleRepository::new(db.clone());
    let created = sales
        .create_sale_with_payment(sale_input(
            Some(id),
            product,
            1,
            single(PaymentMethod::AccountCredit, Decimal::ZERO),
        ))
        .await
        .unwrap();
    assert_eq!(created.sale.payment_status, PaymentStatus::Paid);
    let after_sale = created.account.unwrap();
    assert_eq!(after_sale.available_credit, Decimal::ZERO);
    assert_eq!(after_sale.account_balance, Decimal::ZERO);

    sales
        .void_sale(SaleId::from_uuid(created.sale.id), "Error de carga", ACTOR)
        .await
        .unwrap();

    let account = accounts.get_customer_account(id).await.unwrap();
    assert_eq!(account.account_balance, dec!(-200));
    assert_eq!(account.available_credit, dec!(200));
}

#[tokio::test]
async fn test_walk_in_sale_skips_the_ledger() {
    let Some(db) = test_db().await else { return };
    let product = create_product(&db, dec!(100), 5).await;
    let sales = SaleRepository::new(db.clone());

    let created = sales
        .create_sale_with_payment(sale_input(
            None,
            product,
            1,
            single(PaymentMethod::Cash, dec!(150)),
        ))
        .await
        .unwrap();
    assert_eq!(created.sale.customer_id, None);
    assert_eq!(created.sale.payment_status, PaymentStatus::Paid);
    assert_eq!(created.sale.change_amount, dec!(50));
    assert!(created.payments.is_empty());
    assert!(created.account.is_none());

    let err = sales
        .create_sale_with_payment(sale_input(
            None,
            product,
            1,
            single(PaymentMethod::Cash, dec!(50)),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, SaleRepoError::Sale(SaleError::CustomerRequired)));

    let err = sales
        .create_sale_with_payment(sale_input(
            None,
            product,
            1,
            single(PaymentMethod::Credit, Decimal::ZERO),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, SaleRepoError::Sale(SaleError::CustomerRequired)));

    let stock = ProductRepository::new(db.clone())
        .get_product(product)
        .await
        .unwrap()
        .stock;
    assert_eq!(stock, 4);
}

#[tokio::test]
async fn test_empty_sale_rejected() {
    let Some(db) = test_db().await else { return };
    let product = create_product(&db, dec!(100), 5).await;

    let mut input = sale_input(None, product, 1, single(PaymentMethod::Cash, dec!(100)));
    input.items.clear();

    let err = SaleRepository::new(db.clone())
        .create_sale_with_payment(input)
        .await
        .unwrap_err();
    assert!(matches!(err, SaleRepoError::Sale(SaleError::EmptySale)));
}
