//! Customer registry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use mostrador_db::repositories::{CreateCustomerInput, CustomerRepository};
use mostrador_shared::types::{CustomerId, PageRequest};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::ApiResult, extractors::Actor};

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/{customer_id}", get(get_customer))
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Credit limit; zero or absent means no limit.
    #[serde(default)]
    pub credit_limit: Decimal,
}

/// POST `/customers` - Create a customer and their account.
async fn create_customer(
    State(state): State<AppState>,
    _actor: Actor,
    Json(payload): Json<CreateCustomerRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CustomerRepository::new((*state.db).clone());
    let created = repo
        .create_customer(CreateCustomerInput {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            credit_limit: payload.credit_limit,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET `/customers` - List active customers.
async fn list_customers(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = CustomerRepository::new((*state.db).clone());
    Ok(Json(repo.list_customers(&page).await?))
}

/// GET `/customers/{customer_id}` - Customer with account.
async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<impl IntoResponse> {
    let repo = CustomerRepository::new((*state.db).clone());
    Ok(Json(repo.get_customer(customer_id).await?))
}
