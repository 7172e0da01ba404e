//! Receivables report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use mostrador_db::repositories::CustomerAccountRepository;
use serde::Deserialize;

use crate::{AppState, error::ApiResult};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/accounts-summary", get(get_accounts_summary))
        .route("/reports/aging", get(get_aging_report))
}

/// Query parameters for the aging report.
#[derive(Debug, Deserialize)]
pub struct AgingQuery {
    /// Reference date; defaults to today.
    pub as_of: Option<NaiveDate>,
}

/// GET `/reports/accounts-summary` - Totals owed to and by customers.
async fn get_accounts_summary(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let repo = CustomerAccountRepository::new((*state.db).clone());
    Ok(Json(repo.get_account_summary().await?))
}

/// GET `/reports/aging?as_of=YYYY-MM-DD` - Debtors grouped by days since their last payment.
async fn get_aging_report(
    State(state): State<AppState>,
    Query(query): Query<AgingQuery>,
) -> ApiResult<impl IntoResponse> {
    let repo = CustomerAccountRepository::new((*state.db).clone());
    let as_of = query
        .as_of
        .unwrap_or_else(|| state.clock.business_day(Utc::now()));
    Ok(Json(repo.get_aging_report(as_of).await?))
}
