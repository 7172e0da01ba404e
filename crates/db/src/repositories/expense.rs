//! Expense repository.

use chrono::{NaiveDate, Utc};
use mostrador_core::closing::MethodBreakdown;
use mostrador_core::sales::PaymentMethod;
use mostrador_shared::types::{ActorId, ExpenseId, Money, MoneyError};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::expenses;

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Amount is not a positive money value.
    #[error("Monto inválido: {0}")]
    InvalidAmount(#[from] MoneyError),

    /// Expenses are paid in cash, transfer or card only.
    #[error("Medio de pago no admitido para gastos: {0}")]
    UnsupportedMethod(&'static str),

    /// Description is blank.
    #[error("La descripción del gasto es obligatoria")]
    DescriptionRequired,

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl ExpenseError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::UnsupportedMethod(_) => "UNSUPPORTED_PAYMENT_METHOD",
            Self::DescriptionRequired => "EXPENSE_DESCRIPTION_REQUIRED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Database(_) => 500,
            _ => 400,
        }
    }
}

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct RecordExpenseInput {
    /// Business date the expense belongs to.
    pub expense_date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// Cash, transfer or card.
    pub method: PaymentMethod,
    /// Optional grouping.
    pub category: Option<String>,
    /// What was paid for.
    pub description: String,
    /// Acting user.
    pub actor: ActorId,
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, the method is not a
    /// tender or the description is blank.
    pub async fn record_expense(
        &self,
        input: RecordExpenseInput,
    ) -> Result<expenses::Model, ExpenseError> {
        let amount = Money::positive(input.amount)?;
        if !input.method.is_tender() {
            return Err(ExpenseError::UnsupportedMethod(input.method.as_str()));
        }
        let description = input.description.trim();
        if description.is_empty() {
            return Err(ExpenseError::DescriptionRequired);
        }

        let expense = expenses::ActiveModel {
            id: Set(ExpenseId::new().into_inner()),
            expense_date: Set(input.expense_date),
            amount: Set(amount.amount()),
            payment_method: Set(input.method.into()),
            category: Set(input.category),
            description: Set(description.to_owned()),
            created_by: Set(input.actor.0),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(
            expense_date = %input.expense_date,
            amount = %amount,
            method = input.method.as_str(),
            "Expense recorded"
        );

        Ok(expense)
    }

    /// Lists the expenses of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_expenses_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<expenses::Model>, ExpenseError> {
        Ok(expenses_for_date(&self.db, date).await?)
    }

    /// Per-method expense totals of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sum_expenses_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<MethodBreakdown, ExpenseError> {
        let rows = expenses_for_date(&self.db, date).await?;
        Ok(breakdown(&rows))
    }
}

pub(crate) async fn expenses_for_date<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
) -> Result<Vec<expenses::Model>, DbErr> {
    expenses::Entity::find()
        .filter(expenses::Column::ExpenseDate.eq(date))
        .order_by_asc(expenses::Column::CreatedAt)
        .all(conn)
        .await
}

pub(crate) fn breakdown(rows: &[expenses::Model]) -> MethodBreakdown {
    let mut totals = MethodBreakdown::default();
    for row in rows {
        totals.add(row.payment_method.into(), row.amount);
    }
    totals
}
