//! Cash register repository: open, close and finalize a business day's
//! register, plus daily summaries and pending-register detection.
//!
//! At most one register may be unfinalized. The check runs inside the
//! opening transaction and a partial unique index backs it up against
//! concurrent opens.

use chrono::{DateTime, NaiveDate, Utc};
use mostrador_core::closing::{
    BusinessDayClock, BusinessDayWindow, CashCheck, ClosingError, ClosingFigures,
    MethodBreakdown, PendingRegister, RegisterState,
};
use mostrador_shared::types::{ActorId, CashClosingId, Money};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};

use super::expense;
use crate::entities::{
    cash_closings, payments, sales,
    sea_orm_active_enums::PaymentKind,
};

const SINGLE_OPEN_INDEX: &str = "uq_cash_closings_single_open";

/// Error types for cash register operations.
#[derive(Debug, thiserror::Error)]
pub enum CashClosingError {
    /// Register rule violated.
    #[error(transparent)]
    Closing(#[from] ClosingError),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl CashClosingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Closing(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Closing(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// A recorded closing and its advisory cash check.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingResult {
    /// The closing row.
    pub closing: cash_closings::Model,
    /// Expected cash and difference.
    pub figures: ClosingFigures,
    /// Tolerance classification.
    pub check: CashCheck,
}

/// Activity of one business day.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    /// Business date and its UTC window.
    pub window: BusinessDayWindow,
    /// Non-voided sales in the window.
    pub sale_count: u64,
    /// Sum of their totals.
    pub sales_total: Decimal,
    /// Sales split by method.
    pub sales_breakdown: MethodBreakdown,
    /// Standalone account payments received in the window.
    pub debt_payments_total: Decimal,
    /// Those payments split by method.
    pub debt_payments_breakdown: MethodBreakdown,
    /// Expenses of the date.
    pub expenses_total: Decimal,
    /// Expenses split by method.
    pub expenses_breakdown: MethodBreakdown,
    /// Register state, if one was opened.
    pub register_state: Option<RegisterState>,
    /// Opening balance plus sales minus expenses, if a register exists.
    pub expected_cash: Option<Decimal>,
    /// Stored register row.
    pub closing: Option<cash_closings::Model>,
}

/// Cash register repository.
#[derive(Debug, Clone)]
pub struct CashClosingRepository {
    db: DatabaseConnection,
    clock: BusinessDayClock,
    tolerance: Decimal,
}

impl CashClosingRepository {
    /// Creates a new cash register repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, clock: BusinessDayClock, tolerance: Decimal) -> Self {
        Self {
            db,
            clock,
            tolerance,
        }
    }

    /// The business-day clock in use.
    #[must_use]
    pub const fn clock(&self) -> &BusinessDayClock {
        &self.clock
    }

    /// Opens the register for `date`.
    ///
    /// # Errors
    ///
    /// Returns `ClosingAlreadyExists` if `date` already has a register and
    /// `RegisterAlreadyOpen` if another date's register is unfinalized.
    pub async fn open_cash_register(
        &self,
        date: NaiveDate,
        opening_balance: Decimal,
        actor: ActorId,
    ) -> Result<cash_closings::Model, CashClosingError> {
        let opening = Money::non_negative(opening_balance).map_err(ClosingError::from)?;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let existing = find_by_date(&txn, date).await?;
        let unfinalized = find_unfinalized(&txn).await?;
        RegisterState::ensure_can_open(
            date,
            existing.as_ref().map(cash_closings::Model::state),
            unfinalized.as_ref().map(|c| c.closing_date),
        )?;

        let inserted = cash_closings::ActiveModel {
            id: Set(CashClosingId::new().into_inner()),
            closing_date: Set(date),
            opening_balance: Set(opening.amount()),
            sales_total: Set(Decimal::ZERO),
            expenses_total: Set(Decimal::ZERO),
            cash_count: Set(None),
            expected_cash: Set(None),
            cash_difference: Set(None),
            notes: Set(None),
            opened_at: Set(now.into()),
            opened_by: Set(actor.0),
            closed_at: Set(None),
            closed_by: Set(None),
            is_finalized: Set(false),
            finalized_at: Set(None),
            finalized_by: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await;

        let closing = match inserted {
            Ok(closing) => closing,
            Err(err) => {
                drop(txn);
                return Err(self.translate_unique_violation(err, date).await);
            }
        };
        txn.commit().await?;

        info!(closing_date = %date, opening_balance = %opening, "Cash register opened");

        Ok(closing)
    }

    /// Maps a lost race on the register constraints to the domain error.
    async fn translate_unique_violation(&self, err: DbErr, date: NaiveDate) -> CashClosingError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) if message.contains(SINGLE_OPEN_INDEX) => {
                let open_date = find_unfinalized(&self.db)
                    .await
                    .ok()
                    .flatten()
                    .map_or(date, |c| c.closing_date);
                ClosingError::RegisterAlreadyOpen(open_date).into()
            }
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ClosingError::ClosingAlreadyExists(date).into()
            }
            _ => err.into(),
        }
    }

    /// Records (or re-records while draft) the closing of `date`.
    ///
    /// Totals cover the date's business-day window. The cash check is
    /// advisory only.
    ///
    /// # Errors
    ///
    /// Returns an error if no register exists for `date`, it is finalized,
    /// or the count is negative.
    pub async fn create_closing(
        &self,
        date: NaiveDate,
        cash_count: Decimal,
        notes: Option<String>,
        actor: ActorId,
    ) -> Result<ClosingResult, CashClosingError> {
        let window = self.clock.window(date)?;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let closing = cash_closings::Entity::find()
            .filter(cash_closings::Column::ClosingDate.eq(date))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ClosingError::RegisterNotOpen(date))?;
        closing.state().ensure_can_close(date)?;

        let sales_total = window_sales(&txn, &window)
            .await?
            .iter()
            .map(|s| s.total_amount)
            .sum();
        let expenses_total = expense::expenses_for_date(&txn, date)
            .await?
            .iter()
            .map(|e| e.amount)
            .sum();

        let figures =
            ClosingFigures::compute(closing.opening_balance, sales_total, expenses_total, cash_count)?;
        let check = CashCheck::classify(figures.cash_difference, self.tolerance);

        let mut active = closing.into_active_model();
        active.sales_total = Set(figures.sales_total);
        active.expenses_total = Set(figures.expenses_total);
        active.cash_count = Set(Some(figures.cash_count));
        active.expected_cash = Set(Some(figures.expected_cash));
        active.cash_difference = Set(Some(figures.cash_difference));
        active.notes = Set(notes);
        active.closed_at = Set(Some(now.into()));
        active.closed_by = Set(Some(actor.0));
        active.updated_at = Set(now.into());
        let closing = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            closing_date = %date,
            expected_cash = %figures.expected_cash,
            cash_count = %figures.cash_count,
            cash_difference = %figures.cash_difference,
            "Cash register closed"
        );
        if let Some(warning) = &check.warning {
            warn!(closing_date = %date, "{warning}");
        }

        Ok(ClosingResult {
            closing,
            figures,
            check,
        })
    }

    /// Freezes a draft closing.
    ///
    /// # Errors
    ///
    /// Returns `ClosingNotFound`, `NotClosed` if no closing was recorded yet,
    /// or `AlreadyFinalized`.
    pub async fn finalize_closing(
        &self,
        closing_id: CashClosingId,
        actor: ActorId,
    ) -> Result<cash_closings::Model, CashClosingError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let closing = cash_closings::Entity::find_by_id(closing_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ClosingError::ClosingNotFound(closing_id))?;
        closing.state().ensure_can_finalize(closing.closing_date)?;

        let date = closing.closing_date;
        let mut active = closing.into_active_model();
        active.is_finalized = Set(true);
        active.finalized_at = Set(Some(now.into()));
        active.finalized_by = Set(Some(actor.0));
        active.updated_at = Set(now.into());
        let closing = active.update(&txn).await?;

        txn.commit().await?;

        info!(closing_date = %date, "Cash register finalized");

        Ok(closing)
    }

    /// Summarizes the activity of business date `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_daily_summary(&self, date: NaiveDate) -> Result<DailySummary, CashClosingError> {
        let window = self.clock.window(date)?;

        let sale_rows = window_sales(&self.db, &window).await?;
        let mut sales_breakdown = MethodBreakdown::default();
        for sale in &sale_rows {
            sales_breakdown.add_sale(
                sale.payment_method.into(),
                sale.total_amount,
                sale.components().as_ref(),
            );
        }
        let sales_total: Decimal = sale_rows.iter().map(|s| s.total_amount).sum();

        let debt_payments = payments::Entity::find()
            .filter(payments::Column::SaleId.is_null())
            .filter(payments::Column::IsVoided.eq(false))
            .filter(
                payments::Column::PaymentKind
                    .is_in([PaymentKind::DebtPayment, PaymentKind::AdvancePayment]),
            )
            .filter(payments::Column::PaymentDate.gte(window.start))
            .filter(payments::Column::PaymentDate.lt(window.end))
            .all(&self.db)
            .await?;
        let mut debt_payments_breakdown = MethodBreakdown::default();
        for payment in &debt_payments {
            debt_payments_breakdown.add(payment.payment_method.into(), payment.amount);
        }

        let expense_rows = expense::expenses_for_date(&self.db, date).await?;
        let expenses_breakdown = expense::breakdown(&expense_rows);
        let expenses_total: Decimal = expense_rows.iter().map(|e| e.amount).sum();

        let closing = find_by_date(&self.db, date).await?;
        let expected_cash = closing
            .as_ref()
            .map(|c| c.opening_balance + sales_total - expenses_total);

        Ok(DailySummary {
            window,
            sale_count: sale_rows.len() as u64,
            sales_total,
            sales_breakdown,
            debt_payments_total: debt_payments_breakdown.total(),
            debt_payments_breakdown,
            expenses_total,
            expenses_breakdown,
            register_state: closing.as_ref().map(cash_closings::Model::state),
            expected_cash,
            closing,
        })
    }

    /// Reports the unfinalized register, if any. A status, never a gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn check_pending_cash_register(
        &self,
        now: DateTime<Utc>,
    ) -> Result<PendingRegister, CashClosingError> {
        let pending = find_unfinalized(&self.db)
            .await?
            .map(|c| (c.closing_date, c.state()));
        Ok(PendingRegister::assess(&self.clock, pending, now))
    }

    /// Gets the register of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_closing_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<cash_closings::Model>, CashClosingError> {
        Ok(find_by_date(&self.db, date).await?)
    }
}

async fn find_by_date<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
) -> Result<Option<cash_closings::Model>, DbErr> {
    cash_closings::Entity::find()
        .filter(cash_closings::Column::ClosingDate.eq(date))
        .one(conn)
        .await
}

async fn find_unfinalized<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<cash_closings::Model>, DbErr> {
    cash_closings::Entity::find()
        .filter(cash_closings::Column::IsFinalized.eq(false))
        .order_by_asc(cash_closings::Column::ClosingDate)
        .one(conn)
        .await
}

async fn window_sales<C: ConnectionTrait>(
    conn: &C,
    window: &BusinessDayWindow,
) -> Result<Vec<sales::Model>, DbErr> {
    sales::Entity::find()
        .filter(sales::Column::IsVoided.eq(false))
        .filter(sales::Column::SaleDate.gte(window.start))
        .filter(sales::Column::SaleDate.lt(window.end))
        .all(conn)
        .await
}
