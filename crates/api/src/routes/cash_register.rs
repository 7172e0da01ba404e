//! Daily cash register routes.
//!
//! Dates are business dates; when omitted they default to the business day
//! the shop clock reports for the current instant.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use mostrador_db::repositories::CashClosingRepository;
use mostrador_shared::types::CashClosingId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::Actor,
};

/// Creates the cash register routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash-register/open", post(open_register))
        .route("/cash-register/close", post(close_register))
        .route("/cash-register/pending", get(check_pending))
        .route("/cash-register/summary", get(daily_summary))
        .route(
            "/cash-register/closings/{closing_id}/finalize",
            post(finalize_closing),
        )
        .route(
            "/cash-register/closings/by-date/{date}",
            get(get_closing_by_date),
        )
}

fn repo(state: &AppState) -> CashClosingRepository {
    CashClosingRepository::new((*state.db).clone(), state.clock, state.cash_tolerance)
}

fn date_or_today(state: &AppState, date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| state.clock.business_day(Utc::now()))
}

/// Request body for opening the register.
#[derive(Debug, Deserialize)]
pub struct OpenRegisterRequest {
    /// Business date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Cash in the drawer at opening.
    pub opening_balance: Decimal,
}

/// Request body for a draft closing.
#[derive(Debug, Deserialize)]
pub struct CloseRegisterRequest {
    /// Business date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Cash physically counted.
    pub cash_count: Decimal,
    /// Notes for the owner.
    pub notes: Option<String>,
}

/// Optional business date.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// Business date; defaults to today.
    pub date: Option<NaiveDate>,
}

/// POST `/cash-register/open`
async fn open_register(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<OpenRegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let date = date_or_today(&state, payload.date);
    let closing = repo(&state)
        .open_cash_register(date, payload.opening_balance, actor.id())
        .await?;
    Ok((StatusCode::CREATED, Json(closing)))
}

/// POST `/cash-register/close` - Count the drawer; may be repeated until finalized.
async fn close_register(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CloseRegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let date = date_or_today(&state, payload.date);
    let result = repo(&state)
        .create_closing(date, payload.cash_count, payload.notes, actor.id())
        .await?;
    Ok(Json(result))
}

/// POST `/cash-register/closings/{closing_id}/finalize`
async fn finalize_closing(
    State(state): State<AppState>,
    actor: Actor,
    Path(closing_id): Path<CashClosingId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).finalize_closing(closing_id, actor.id()).await?))
}

/// GET `/cash-register/pending` - Warn about a register left open on a past day.
async fn check_pending(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).check_pending_cash_register(Utc::now()).await?))
}

/// GET `/cash-register/summary?date=..`
async fn daily_summary(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> ApiResult<impl IntoResponse> {
    let date = date_or_today(&state, query.date);
    Ok(Json(repo(&state).get_daily_summary(date).await?))
}

/// GET `/cash-register/closings/by-date/{date}`
async fn get_closing_by_date(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<impl IntoResponse> {
    let closing = repo(&state)
        .get_closing_by_date(date)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(
                "CLOSING_NOT_FOUND",
                format!("No hay caja registrada para {date}"),
            )
        })?;
    Ok(Json(closing))
}
