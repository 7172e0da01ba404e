//! Customer account routes: balance, manual postings, standalone payments,
//! credit administration and statements.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use mostrador_core::ledger::{ReferenceType, TransactionKind};
use mostrador_core::sales::{MixedComponents, PaymentMethod};
use mostrador_db::repositories::{
    CustomerAccountRepository, RecordTransactionInput, RegisterPaymentInput,
};
use mostrador_shared::types::CustomerId;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::Actor,
};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/{customer_id}/account", get(get_account))
        .route("/customers/{customer_id}/credit", get(check_credit))
        .route(
            "/customers/{customer_id}/transactions",
            get(list_transactions).post(record_transaction),
        )
        .route("/customers/{customer_id}/payments", post(register_payment))
        .route("/customers/{customer_id}/statement", get(get_statement))
        .route("/customers/{customer_id}/credit-limit", put(set_credit_limit))
        .route("/customers/{customer_id}/block", post(block_account))
        .route("/customers/{customer_id}/unblock", post(unblock_account))
        .route("/customers/{customer_id}/deactivate", post(deactivate_account))
}

fn repo(state: &AppState) -> CustomerAccountRepository {
    CustomerAccountRepository::new((*state.db).clone())
}

/// Request body for a manual ledger posting.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    /// Transaction kind, e.g. `CREDIT_NOTE`.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Originating document type.
    pub reference_type: Option<ReferenceType>,
    /// Originating document id.
    pub reference_id: Option<Uuid>,
    /// Statement description.
    pub description: Option<String>,
    /// Business timestamp; defaults to now.
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Request body for a standalone payment.
#[derive(Debug, Deserialize)]
pub struct RegisterPaymentRequest {
    /// Amount paid (ignored for mixed payments).
    #[serde(default)]
    pub amount: Decimal,
    /// Cash, transfer, card or mixed.
    pub method: PaymentMethod,
    /// Components of a mixed payment.
    pub mixed: Option<MixedComponents>,
    /// Accept amounts beyond the current debt.
    #[serde(default)]
    pub allow_overpayment: bool,
    /// Required for advance payments.
    pub notes: Option<String>,
}

/// Request body for a new credit limit.
#[derive(Debug, Deserialize)]
pub struct CreditLimitRequest {
    /// Limit; zero means no limit.
    pub credit_limit: Decimal,
}

/// Request body for blocking an account.
#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    /// End of the block.
    pub until: DateTime<Utc>,
    /// Reason shown to operators.
    pub reason: Option<String>,
}

/// Statement window, both ends inclusive.
#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    /// Start of the window.
    pub start: DateTime<Utc>,
    /// End of the window.
    pub end: DateTime<Utc>,
}

/// GET `/customers/{customer_id}/account`
async fn get_account(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).get_customer_account(customer_id).await?))
}

/// GET `/customers/{customer_id}/credit` - Whether the balance is in the customer's favor.
async fn check_credit(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).check_credit_availability(customer_id).await?))
}

/// GET `/customers/{customer_id}/transactions` - Ledger rows, oldest first.
async fn list_transactions(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).list_transactions(customer_id).await?))
}

/// POST `/customers/{customer_id}/transactions` - Manual posting (notes, adjustments, opening balance).
async fn record_transaction(
    State(state): State<AppState>,
    actor: Actor,
    Path(customer_id): Path<CustomerId>,
    Json(payload): Json<RecordTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let reference = match (payload.reference_type, payload.reference_id) {
        (Some(reference_type), Some(reference_id)) => Some((reference_type, reference_id)),
        (None, None) => None,
        _ => {
            return Err(ApiError::bad_request(
                "INCOMPLETE_REFERENCE",
                "reference_type y reference_id deben enviarse juntos",
            ));
        }
    };

    let row = repo(&state)
        .record_transaction(RecordTransactionInput {
            customer_id,
            kind: payload.kind,
            amount: payload.amount,
            reference,
            description: payload.description,
            transaction_date: payload.transaction_date,
            actor: actor.id(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// POST `/customers/{customer_id}/payments` - Debt payment or advance.
async fn register_payment(
    State(state): State<AppState>,
    actor: Actor,
    Path(customer_id): Path<CustomerId>,
    Json(payload): Json<RegisterPaymentRequest>,
) -> ApiResult<impl IntoResponse> {
    let recorded = repo(&state)
        .register_payment(RegisterPaymentInput {
            customer_id,
            amount: payload.amount,
            method: payload.method,
            mixed: payload.mixed,
            allow_overpayment: payload.allow_overpayment,
            notes: payload.notes,
            actor: actor.id(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// GET `/customers/{customer_id}/statement?start=..&end=..`
async fn get_statement(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Query(window): Query<StatementQuery>,
) -> ApiResult<impl IntoResponse> {
    if window.end < window.start {
        return Err(ApiError::bad_request(
            "INVALID_DATE_RANGE",
            "La fecha final es anterior a la inicial",
        ));
    }
    let statement = repo(&state)
        .get_statement(customer_id, window.start, window.end)
        .await?;
    Ok(Json(statement))
}

/// PUT `/customers/{customer_id}/credit-limit`
async fn set_credit_limit(
    State(state): State<AppState>,
    _actor: Actor,
    Path(customer_id): Path<CustomerId>,
    Json(payload): Json<CreditLimitRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = repo(&state)
        .set_credit_limit(customer_id, payload.credit_limit)
        .await?;
    Ok(Json(account))
}

/// POST `/customers/{customer_id}/block`
async fn block_account(
    State(state): State<AppState>,
    _actor: Actor,
    Path(customer_id): Path<CustomerId>,
    Json(payload): Json<BlockRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = repo(&state)
        .block_account(customer_id, payload.until, payload.reason)
        .await?;
    Ok(Json(account))
}

/// POST `/customers/{customer_id}/unblock`
async fn unblock_account(
    State(state): State<AppState>,
    _actor: Actor,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).unblock_account(customer_id).await?))
}

/// POST `/customers/{customer_id}/deactivate`
async fn deactivate_account(
    State(state): State<AppState>,
    _actor: Actor,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(repo(&state).deactivate_account(customer_id).await?))
}
