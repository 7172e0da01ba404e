//! Sale repository: atomic sale + payment recording, credit application,
//! payment status upkeep and voids.
//!
//! Lock order is products, then the customer account, then the sale row.

use chrono::{DateTime, Utc};
use mostrador_core::credit::CreditService;
use mostrador_core::ledger::{LedgerError, LedgerEvent, ReferenceType, TransactionKind};
use mostrador_core::sales::{
    PaymentMethod, PaymentPlan, PaymentRequest, PaymentStatus, PricedSale, SaleError,
    SaleLineInput, SalePayment, VoidReversal, plan_payment, price_sale,
    validate_credit_to_sale,
};
use mostrador_shared::types::{
    ActorId, CustomerId, Money, MoneyError, PaymentId, ProductId, SaleId,
};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ledger, product};
use crate::entities::{
    customer_accounts, customer_transactions, payments, sale_items, sales,
    sea_orm_active_enums::{PaymentKind, PaymentStatus as DbPaymentStatus, TransactionType},
};

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleRepoError {
    /// Sale, stock, payment or ledger rule violated.
    #[error(transparent)]
    Sale(#[from] SaleError),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerError> for SaleRepoError {
    fn from(err: LedgerError) -> Self {
        Self::Sale(SaleError::Ledger(err))
    }
}

impl From<MoneyError> for SaleRepoError {
    fn from(err: MoneyError) -> Self {
        Self::Sale(SaleError::InvalidAmount(err))
    }
}

impl SaleRepoError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Sale(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Sale(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// One requested line.
#[derive(Debug, Clone, Copy)]
pub struct SaleItemInput {
    /// Product.
    pub product_id: ProductId,
    /// Units.
    pub quantity: i32,
    /// Line discount.
    pub discount: Decimal,
}

/// Input for recording a sale with its payment.
#[derive(Debug, Clone)]
pub struct CreateSaleInput {
    /// Customer; `None` for walk-in sales.
    pub customer_id: Option<CustomerId>,
    /// Requested lines.
    pub items: Vec<SaleItemInput>,
    /// Sale-level discount.
    pub discount_amount: Decimal,
    /// Tax percent.
    pub tax_rate: Decimal,
    /// How the sale is paid.
    pub payment: PaymentRequest,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Sale timestamp; defaults to now.
    pub sale_date: Option<DateTime<Utc>>,
    /// Acting user.
    pub actor: ActorId,
}

/// A sale with its lines and payments.
#[derive(Debug, Clone, Serialize)]
pub struct SaleWithDetails {
    /// The sale.
    pub sale: sales::Model,
    /// Its lines.
    pub items: Vec<sale_items::Model>,
    /// Its payment rows.
    pub payments: Vec<payments::Model>,
    /// The customer's account after the sale, for customer sales.
    pub account: Option<customer_accounts::Model>,
}

/// Result of applying prepaid credit to a sale.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedCredit {
    /// The CREDIT_APPLICATION ledger row.
    pub transaction: customer_transactions::Model,
    /// The sale with its new paid amount and status.
    pub sale: sales::Model,
    /// The account after the application.
    pub account: customer_accounts::Model,
}

/// Sale repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a sale, its stock movements, payments and ledger postings as
    /// one unit.
    ///
    /// Customer sales post a SALE for the total, a PAYMENT for what was paid
    /// at the counter and a CREDIT_APPLICATION when paid from prepaid credit.
    /// Walk-in sales touch neither the ledger nor the payments table and must
    /// be paid in full.
    ///
    /// # Errors
    ///
    /// Returns an error, with nothing written, on insufficient stock, invalid
    /// pricing or payment, a missing customer for on-account sales, or when
    /// the customer's account rejects the amount left owing.
    pub async fn create_sale_with_payment(
        &self,
        input: CreateSaleInput,
    ) -> Result<SaleWithDetails, SaleRepoError> {
        if input.items.is_empty() {
            return Err(SaleError::EmptySale.into());
        }
        if input.customer_id.is_none() && input.payment.method.requires_customer() {
            return Err(SaleError::CustomerRequired.into());
        }

        let now = Utc::now();
        let sale_date = input.sale_date.unwrap_or(now);
        let requested =
            product::merge_quantities(input.items.iter().map(|i| (i.product_id, i.quantity)))?;

        let txn = self.db.begin().await?;

        let locked = product::lock_products(&txn, requested.keys().copied()).await?;
        let lines = input
            .items
            .iter()
            .map(|item| {
                let product = locked
                    .get(&item.product_id.into_inner())
                    .ok_or(SaleError::ProductNotFound(item.product_id))?;
                Ok(SaleLineInput {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: product.price,
                    discount: item.discount,
                })
            })
            .collect::<Result<Vec<_>, SaleError>>()?;
        let priced = price_sale(&lines, input.discount_amount, input.tax_rate)?;
        product::check_stock(&locked, &requested)?;

        let plan = plan_payment(priced.total_amount, &input.payment)?;
        if input.customer_id.is_none() && plan.amount_due > Decimal::ZERO {
            return Err(SaleError::CustomerRequired.into());
        }

        let account = match input.customer_id {
            Some(customer_id) => {
                let account = ledger::lock_account::<_, SaleRepoError>(&txn, customer_id).await?;
                let snapshot = account.snapshot();
                CreditService::check_on_account_due(&snapshot, customer_id, plan.amount_due, now)?;
                if plan.credit_application > Decimal::ZERO {
                    CreditService::validate_credit_application(
                        &snapshot,
                        customer_id,
                        Money::positive(plan.credit_application)?,
                        Decimal::ZERO,
                    )?;
                }
                Some(account)
            }
            None => None,
        };

        product::decrement(&txn, &locked, &requested).await?;

        let sale_id = SaleId::new();
        let sale = insert_sale(&txn, sale_id, &input, &priced, &plan, sale_date, now).await?;
        let items = insert_items(&txn, sale_id, &priced).await?;

        let mut payment_rows = Vec::new();
        let account = match (input.customer_id, account) {
            (Some(customer_id), Some(account)) => {
                payment_rows =
                    insert_sale_payments(&txn, sale_id, customer_id, &plan, &input, now).await?;
                Some(post_sale(&txn, account, sale_id, &priced, &plan, input.actor, sale_date).await?)
            }
            _ => None,
        };

        txn.commit().await?;

        info!(
            sale_id = %sale_id,
            customer_id = ?input.customer_id,
            total = %sale.total_amount,
            paid = %sale.paid_amount,
            method = input.payment.method.as_str(),
            "Sale created"
        );

        Ok(SaleWithDetails {
            sale,
            items,
            payments: payment_rows,
            account,
        })
    }

    /// Recomputes `paid_amount` and `payment_status` from the payment rows
    /// and the credit applications referencing the sale.
    ///
    /// # Errors
    ///
    /// Returns `SaleNotFound` if the sale does not exist.
    pub async fn update_sale_payment_status(
        &self,
        sale_id: SaleId,
    ) -> Result<sales::Model, SaleRepoError> {
        let txn = self.db.begin().await?;
        let sale = lock_sale(&txn, sale_id).await?;
        let paid = paid_amount(&txn, &sale).await?;
        let sale = set_paid(&txn, sale, paid).await?;
        txn.commit().await?;
        Ok(sale)
    }

    /// Applies `amount` of the customer's credit balance to an existing sale.
    ///
    /// Any credit counts: advances, repair deposits, credit notes or manual
    /// payments. The sale's unpaid part is already in the balance, so the
    /// credit left for it is `due - balance`.
    ///
    /// # Errors
    ///
    /// Returns an error, with nothing written, if the sale is voided, belongs
    /// to another customer, has nothing due or less due than `amount`, or if
    /// the customer's credit does not cover `amount`.
    pub async fn apply_credit(
        &self,
        customer_id: CustomerId,
        sale_id: SaleId,
        amount: Decimal,
        actor: ActorId,
    ) -> Result<AppliedCredit, SaleRepoError> {
        let amount = Money::positive(amount)?;
        let now = Utc::now();

        let txn = self.db.begin().await?;
        let account = ledger::lock_account::<_, SaleRepoError>(&txn, customer_id).await?;
        let sale = lock_sale(&txn, sale_id).await?;
        if sale.customer_id != Some(customer_id.into_inner()) {
            return Err(SaleError::CustomerMismatch(sale_id).into());
        }

        let paid = paid_amount(&txn, &sale).await?;
        validate_credit_to_sale(sale_id, sale.total_amount, paid, sale.is_voided, amount)?;
        CreditService::validate_credit_application(
            &account.snapshot(),
            customer_id,
            amount,
            sale.total_amount - paid,
        )?;

        insert_payment(
            &txn,
            sale_id,
            customer_id,
            PaymentMethod::AccountCredit,
            PaymentKind::CreditApplication,
            amount.amount(),
            None,
            actor,
            now,
        )
        .await?;

        let event = LedgerEvent::new(TransactionKind::CreditApplication, amount.amount(), actor, now)?
            .with_reference(ReferenceType::Sale, sale_id.into_inner())
            .with_description(format!("Saldo a favor aplicado a venta {sale_id}"));
        let (transaction, account) = ledger::post::<_, SaleRepoError>(&txn, account, &event).await?;

        let sale = set_paid(&txn, sale, paid + amount.amount()).await?;
        txn.commit().await?;

        info!(
            sale_id = %sale_id,
            customer_id = %customer_id,
            amount = %amount,
            "Credit applied to sale"
        );

        Ok(AppliedCredit {
            transaction,
            sale,
            account,
        })
    }

    /// Voids a sale.
    ///
    /// Restores stock, voids the sale's payment rows and, for customer sales,
    /// posts a VOID_SALE for the total plus a DEBIT_NOTE per refunded tender
    /// payment. The account ends where it would be had the sale never
    /// happened, so credit that paid the sale is available again.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is blank, the sale is missing or
    /// already voided.
    pub async fn void_sale(
        &self,
        sale_id: SaleId,
        reason: &str,
        actor: ActorId,
    ) -> Result<sales::Model, SaleRepoError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(SaleError::VoidReasonRequired.into());
        }
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let unlocked = find_sale(&txn, sale_id).await?;
        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(sale_id.into_inner()))
            .all(&txn)
            .await?;
        let returned = product::merge_quantities(
            items
                .iter()
                .map(|i| (ProductId::from_uuid(i.product_id), i.quantity)),
        )?;
        let locked = product::lock_products(&txn, returned.keys().copied()).await?;
        let account = match unlocked.customer_id {
            Some(customer_id) => Some(
                ledger::lock_account::<_, SaleRepoError>(&txn, CustomerId::from_uuid(customer_id))
                    .await?,
            ),
            None => None,
        };

        let sale = lock_sale(&txn, sale_id).await?;
        if sale.is_voided {
            return Err(SaleError::AlreadyVoided(sale_id).into());
        }

        product::restore(&txn, &locked, &returned).await?;

        let sale_payments = live_payments(&txn, sale_id).await?;
        if let Some(account) = account {
            let tendered: Vec<SalePayment> = sale_payments
                .iter()
                .filter(|p| p.payment_kind != PaymentKind::CreditApplication)
                .map(|p| SalePayment {
                    payment_id: PaymentId::from_uuid(p.id),
                    method: p.payment_method.into(),
                    amount: p.amount,
                })
                .collect();
            let credit_applied = credit_applied(&txn, sale_id).await?;
            let reversal = VoidReversal::compute(sale.total_amount, &tendered, credit_applied);
            post_void(&txn, account, sale_id, &reversal, reason, actor, now).await?;
        }

        payments::Entity::update_many()
            .col_expr(payments::Column::IsVoided, Expr::value(true))
            .col_expr(payments::Column::VoidedAt, Expr::value(now))
            .filter(payments::Column::SaleId.eq(sale_id.into_inner()))
            .filter(payments::Column::IsVoided.eq(false))
            .exec(&txn)
            .await?;

        let mut active = sale.into_active_model();
        active.is_voided = Set(true);
        active.void_reason = Set(Some(reason.to_owned()));
        active.voided_at = Set(Some(now.into()));
        active.voided_by = Set(Some(actor.0));
        active.payment_status = Set(DbPaymentStatus::Voided);
        active.updated_at = Set(now.into());
        let sale = active.update(&txn).await?;

        txn.commit().await?;

        info!(sale_id = %sale_id, reason = reason, "Sale voided");

        Ok(sale)
    }

    /// Gets a sale with its lines and payments.
    ///
    /// # Errors
    ///
    /// Returns `SaleNotFound` if the sale does not exist.
    pub async fn get_sale(&self, sale_id: SaleId) -> Result<SaleWithDetails, SaleRepoError> {
        let sale = find_sale(&self.db, sale_id).await?;
        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(sale_id.into_inner()))
            .all(&self.db)
            .await?;
        let payment_rows = payments::Entity::find()
            .filter(payments::Column::SaleId.eq(sale_id.into_inner()))
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(SaleWithDetails {
            sale,
            items,
            payments: payment_rows,
            account: None,
        })
    }
}

async fn find_sale<C: ConnectionTrait>(conn: &C, sale_id: SaleId) -> Result<sales::Model, SaleRepoError> {
    sales::Entity::find_by_id(sale_id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| SaleError::SaleNotFound(sale_id).into())
}

async fn lock_sale<C: ConnectionTrait>(conn: &C, sale_id: SaleId) -> Result<sales::Model, SaleRepoError> {
    sales::Entity::find_by_id(sale_id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| SaleError::SaleNotFound(sale_id).into())
}

async fn live_payments<C: ConnectionTrait>(
    conn: &C,
    sale_id: SaleId,
) -> Result<Vec<payments::Model>, DbErr> {
    payments::Entity::find()
        .filter(payments::Column::SaleId.eq(sale_id.into_inner()))
        .filter(payments::Column::IsVoided.eq(false))
        .all(conn)
        .await
}

/// Prepaid credit applied to the sale, from its CREDIT_APPLICATION rows.
async fn credit_applied<C: ConnectionTrait>(conn: &C, sale_id: SaleId) -> Result<Decimal, DbErr> {
    let rows = customer_transactions::Entity::find()
        .filter(customer_transactions::Column::ReferenceType.eq(ReferenceType::Sale.as_str()))
        .filter(customer_transactions::Column::ReferenceId.eq(sale_id.into_inner()))
        .filter(customer_transactions::Column::TransactionType.eq(TransactionType::CreditApplication))
        .all(conn)
        .await?;
    Ok(rows.iter().map(|t| t.amount).sum())
}

/// Non-voided tender payments plus applied credit. Walk-in sales keep the
/// amount stored at checkout.
async fn paid_amount<C: ConnectionTrait>(conn: &C, sale: &sales::Model) -> Result<Decimal, DbErr> {
    if sale.customer_id.is_none() {
        return Ok(sale.paid_amount);
    }
    let sale_id = SaleId::from_uuid(sale.id);
    let tendered: Decimal = live_payments(conn, sale_id)
        .await?
        .iter()
        .filter(|p| p.payment_kind != PaymentKind::CreditApplication)
        .map(|p| p.amount)
        .sum();
    Ok(tendered + credit_applied(conn, sale_id).await?)
}

async fn set_paid<C: ConnectionTrait>(
    conn: &C,
    sale: sales::Model,
    paid: Decimal,
) -> Result<sales::Model, DbErr> {
    let status = PaymentStatus::derive(sale.total_amount, paid, sale.is_voided);
    let mut active = sale.into_active_model();
    active.paid_amount = Set(paid);
    active.payment_status = Set(status.into());
    active.updated_at = Set(Utc::now().into());
    active.update(conn).await
}

fn merge_notes(requested: Option<&str>, receipt: Option<&str>) -> Option<String> {
    match (requested.filter(|n| !n.trim().is_empty()), receipt) {
        (Some(a), Some(b)) => Some(format!("{a} | {b}")),
        (a, b) => a.or(b).map(str::to_owned),
    }
}

async fn insert_sale<C: ConnectionTrait>(
    conn: &C,
    sale_id: SaleId,
    input: &CreateSaleInput,
    priced: &PricedSale,
    plan: &PaymentPlan,
    sale_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<sales::Model, DbErr> {
    let paid = plan.paid_now + plan.credit_application;
    let status = PaymentStatus::derive(priced.total_amount, paid, false);
    let components = plan.recorded_components(input.payment.method);

    sales::ActiveModel {
        id: Set(sale_id.into_inner()),
        customer_id: Set(input.customer_id.map(CustomerId::into_inner)),
        sale_date: Set(sale_date.into()),
        subtotal: Set(priced.subtotal),
        discount_amount: Set(priced.discount_amount),
        tax_rate: Set(priced.tax_rate),
        tax_amount: Set(priced.tax_amount),
        total_amount: Set(priced.total_amount),
        paid_amount: Set(paid),
        change_amount: Set(plan.change_amount),
        payment_status: Set(status.into()),
        payment_method: Set(input.payment.method.into()),
        cash_amount: Set(components.map(|c| c.cash)),
        transfer_amount: Set(components.map(|c| c.transfer)),
        card_amount: Set(components.map(|c| c.card)),
        credit_amount: Set(components.map(|c| c.credit)),
        notes: Set(merge_notes(input.notes.as_deref(), plan.notes.as_deref())),
        is_voided: Set(false),
        void_reason: Set(None),
        voided_at: Set(None),
        voided_by: Set(None),
        created_by: Set(input.actor.0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(conn)
    .await
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    sale_id: SaleId,
    priced: &PricedSale,
) -> Result<Vec<sale_items::Model>, DbErr> {
    let mut items = Vec::with_capacity(priced.lines.len());
    for line in &priced.lines {
        let item = sale_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            sale_id: Set(sale_id.into_inner()),
            product_id: Set(line.product_id.into_inner()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            discount: Set(line.discount),
            line_total: Set(line.line_total),
        }
        .insert(conn)
        .await?;
        items.push(item);
    }
    Ok(items)
}

#[allow(clippy::too_many_arguments)]
async fn insert_payment<C: ConnectionTrait>(
    conn: &C,
    sale_id: SaleId,
    customer_id: CustomerId,
    method: PaymentMethod,
    kind: PaymentKind,
    amount: Decimal,
    notes: Option<String>,
    actor: ActorId,
    at: DateTime<Utc>,
) -> Result<payments::Model, DbErr> {
    payments::ActiveModel {
        id: Set(PaymentId::new().into_inner()),
        sale_id: Set(Some(sale_id.into_inner())),
        customer_id: Set(Some(customer_id.into_inner())),
        amount: Set(amount),
        payment_method: Set(method.into()),
        payment_kind: Set(kind),
        payment_date: Set(at.into()),
        notes: Set(notes),
        is_voided: Set(false),
        voided_at: Set(None),
        created_by: Set(actor.0),
        created_at: Set(at.into()),
    }
    .insert(conn)
    .await
}

async fn insert_sale_payments<C: ConnectionTrait>(
    conn: &C,
    sale_id: SaleId,
    customer_id: CustomerId,
    plan: &PaymentPlan,
    input: &CreateSaleInput,
    now: DateTime<Utc>,
) -> Result<Vec<payments::Model>, DbErr> {
    let mut rows = Vec::with_capacity(plan.payments.len() + 1);
    for planned in &plan.payments {
        let row = insert_payment(
            conn,
            sale_id,
            customer_id,
            planned.method,
            PaymentKind::SalePayment,
            planned.amount,
            plan.notes.clone(),
            input.actor,
            now,
        )
        .await?;
        rows.push(row);
    }
    if plan.credit_application > Decimal::ZERO {
        let row = insert_payment(
            conn,
            sale_id,
            customer_id,
            PaymentMethod::AccountCredit,
            PaymentKind::CreditApplication,
            plan.credit_application,
            None,
            input.actor,
            now,
        )
        .await?;
        rows.push(row);
    }
    Ok(rows)
}

async fn post_sale<C: ConnectionTrait>(
    conn: &C,
    mut account: customer_accounts::Model,
    sale_id: SaleId,
    priced: &PricedSale,
    plan: &PaymentPlan,
    actor: ActorId,
    at: DateTime<Utc>,
) -> Result<customer_accounts::Model, SaleRepoError> {
    let mut events = Vec::with_capacity(3);
    if priced.total_amount > Decimal::ZERO {
        events.push(
            LedgerEvent::new(TransactionKind::Sale, priced.total_amount, actor, at)?
                .with_description(format!("Venta {sale_id}")),
        );
    }
    if plan.credit_application > Decimal::ZERO {
        events.push(
            LedgerEvent::new(TransactionKind::CreditApplication, plan.credit_application, actor, at)?
                .with_description(format!("Saldo a favor aplicado a venta {sale_id}")),
        );
    }
    if plan.paid_now > Decimal::ZERO {
        let description = match &plan.notes {
            Some(receipt) => format!("Pago venta {sale_id} ({receipt})"),
            None => format!("Pago venta {sale_id}"),
        };
        events.push(
            LedgerEvent::new(TransactionKind::Payment, plan.paid_now, actor, at)?
                .with_description(description),
        );
    }

    for event in events {
        let event = event.with_reference(ReferenceType::Sale, sale_id.into_inner());
        let (_, updated) = ledger::post::<_, SaleRepoError>(conn, account, &event).await?;
        account = updated;
    }
    Ok(account)
}

async fn post_void<C: ConnectionTrait>(
    conn: &C,
    mut account: customer_accounts::Model,
    sale_id: SaleId,
    reversal: &VoidReversal,
    reason: &str,
    actor: ActorId,
    at: DateTime<Utc>,
) -> Result<customer_accounts::Model, SaleRepoError> {
    if reversal.void_amount > Decimal::ZERO {
        let event = LedgerEvent::new(TransactionKind::VoidSale, reversal.void_amount, actor, at)?
            .with_reference(ReferenceType::Sale, sale_id.into_inner())
            .with_description(format!("Anulación venta {sale_id}: {reason}"));
        let (_, updated) = ledger::post::<_, SaleRepoError>(conn, account, &event).await?;
        account = updated;
    }

    for refund in &reversal.refunds {
        let event = LedgerEvent::new(TransactionKind::DebitNote, refund.amount, actor, at)?
            .with_reference(ReferenceType::Payment, refund.payment_id.into_inner())
            .with_description(format!(
                "Reintegro {} venta anulada {sale_id}",
                refund.method.label()
            ));
        let (_, updated) = ledger::post::<_, SaleRepoError>(conn, account, &event).await?;
        account = updated;
    }

    debug!(
        sale_id = %sale_id,
        refunded = %reversal.refunded(),
        credit_returned = %reversal.credit_returned,
        available_credit = %account.available_credit,
        "void reversal posted"
    );
    Ok(account)
}
