//! Sale routes: checkout, credit application and voids.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use mostrador_core::sales::PaymentRequest;
use mostrador_db::repositories::{CreateSaleInput, SaleItemInput, SaleRepository};
use mostrador_shared::types::{CustomerId, ProductId, SaleId};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::ApiResult, extractors::Actor};

/// Creates the sale routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", post(create_sale))
        .route("/sales/{sale_id}", get(get_sale))
        .route("/sales/{sale_id}/void", post(void_sale))
        .route("/sales/{sale_id}/apply-credit", post(apply_credit))
        .route("/sales/{sale_id}/payment-status", post(refresh_payment_status))
}

/// One requested sale line.
#[derive(Debug, Deserialize)]
pub struct SaleItemRequest {
    /// Product.
    pub product_id: ProductId,
    /// Units.
    pub quantity: i32,
    /// Line discount.
    #[serde(default)]
    pub discount: Decimal,
}

/// Request body for a sale.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    /// Customer; omit for walk-in sales.
    pub customer_id: Option<CustomerId>,
    /// Lines.
    pub items: Vec<SaleItemRequest>,
    /// Sale-level discount.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Tax percent.
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Payment taken at the counter.
    pub payment: PaymentRequest,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Sale timestamp; defaults to now.
    pub sale_date: Option<DateTime<Utc>>,
}

/// Request body for voiding a sale.
#[derive(Debug, Deserialize)]
pub struct VoidSaleRequest {
    /// Why the sale is voided.
    pub reason: String,
}

/// Request body for paying a sale from prepaid credit.
#[derive(Debug, Deserialize)]
pub struct ApplyCreditRequest {
    /// Customer whose credit is drawn.
    pub customer_id: CustomerId,
    /// Amount to apply.
    pub amount: Decimal,
}

/// POST `/sales` - Record a sale with its payment.
async fn create_sale(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateSaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let items = payload
        .items
        .into_iter()
        .map(|item| SaleItemInput {
            product_id: item.product_id,
            quantity: item.quantity,
            discount: item.discount,
        })
        .collect();

    let sale = repo
        .create_sale_with_payment(CreateSaleInput {
            customer_id: payload.customer_id,
            items,
            discount_amount: payload.discount_amount,
            tax_rate: payload.tax_rate,
            payment: payload.payment,
            notes: payload.notes,
            sale_date: payload.sale_date,
            actor: actor.id(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// GET `/sales/{sale_id}` - Sale with lines and payments.
async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<SaleId>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    Ok(Json(repo.get_sale(sale_id).await?))
}

/// POST `/sales/{sale_id}/void`
async fn void_sale(
    State(state): State<AppState>,
    actor: Actor,
    Path(sale_id): Path<SaleId>,
    Json(payload): Json<VoidSaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    Ok(Json(repo.void_sale(sale_id, &payload.reason, actor.id()).await?))
}

/// POST `/sales/{sale_id}/apply-credit`
async fn apply_credit(
    State(state): State<AppState>,
    actor: Actor,
    Path(sale_id): Path<SaleId>,
    Json(payload): Json<ApplyCreditRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    let applied = repo
        .apply_credit(payload.customer_id, sale_id, payload.amount, actor.id())
        .await?;
    Ok(Json(applied))
}

/// POST `/sales/{sale_id}/payment-status` - Recompute status from the paid amount.
async fn refresh_payment_status(
    State(state): State<AppState>,
    _actor: Actor,
    Path(sale_id): Path<SaleId>,
) -> ApiResult<impl IntoResponse> {
    let repo = SaleRepository::new((*state.db).clone());
    Ok(Json(repo.update_sale_payment_status(sale_id).await?))
}
