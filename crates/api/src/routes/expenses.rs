//! Register expense routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use mostrador_core::closing::MethodBreakdown;
use mostrador_core::sales::PaymentMethod;
use mostrador_db::{
    entities::expenses,
    repositories::{ExpenseRepository, RecordExpenseInput},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiResult, extractors::Actor};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/expenses", get(list_expenses).post(record_expense))
}

/// Request body for an expense paid from the register.
#[derive(Debug, Deserialize)]
pub struct RecordExpenseRequest {
    /// Business date; defaults to today.
    pub expense_date: Option<NaiveDate>,
    /// Amount paid.
    pub amount: Decimal,
    /// Cash, transfer or card.
    pub method: PaymentMethod,
    /// Optional grouping.
    pub category: Option<String>,
    /// What was paid for.
    pub description: String,
}

/// Query for one day's expenses.
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    /// Business date; defaults to today.
    pub date: Option<NaiveDate>,
}

/// Expenses of a day with their per-method totals.
#[derive(Debug, Serialize)]
pub struct DailyExpenses {
    /// Business date.
    pub date: NaiveDate,
    /// Rows, oldest first.
    pub expenses: Vec<expenses::Model>,
    /// Totals by method.
    pub totals: MethodBreakdown,
}

/// POST `/expenses`
async fn record_expense(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<RecordExpenseRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = ExpenseRepository::new((*state.db).clone());
    let expense_date = payload
        .expense_date
        .unwrap_or_else(|| state.clock.business_day(Utc::now()));
    let expense = repo
        .record_expense(RecordExpenseInput {
            expense_date,
            amount: payload.amount,
            method: payload.method,
            category: payload.category,
            description: payload.description,
            actor: actor.id(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET `/expenses?date=..`
async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = ExpenseRepository::new((*state.db).clone());
    let date = query
        .date
        .unwrap_or_else(|| state.clock.business_day(Utc::now()));
    let expenses = repo.list_expenses_for_date(date).await?;
    let totals = repo.sum_expenses_for_date(date).await?;
    Ok(Json(DailyExpenses {
        date,
        expenses,
        totals,
    }))
}
