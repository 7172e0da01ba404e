//! Product catalog and stock routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use mostrador_db::repositories::{CreateProductInput, ProductRepository};
use mostrador_shared::types::ProductId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::Actor,
};

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/{product_id}", get(get_product))
        .route("/products/{product_id}/stock", post(adjust_stock))
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Unique stock-keeping code.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Initial units on hand.
    #[serde(default)]
    pub stock: i32,
}

/// Manual stock movement. Positive values add units, negative values remove them.
#[derive(Debug, Deserialize)]
pub struct StockAdjustmentRequest {
    /// Signed unit delta.
    pub delta: i32,
}

/// POST `/products`
async fn create_product(
    State(state): State<AppState>,
    _actor: Actor,
    Json(payload): Json<CreateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    let product = repo
        .create_product(CreateProductInput {
            sku: payload.sku,
            name: payload.name,
            price: payload.price,
            stock: payload.stock,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET `/products/{product_id}`
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    Ok(Json(repo.get_product(product_id).await?))
}

/// POST `/products/{product_id}/stock` - Receive or write off units.
async fn adjust_stock(
    State(state): State<AppState>,
    _actor: Actor,
    Path(product_id): Path<ProductId>,
    Json(payload): Json<StockAdjustmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = ProductRepository::new((*state.db).clone());
    let product = match payload.delta {
        delta @ (0 | i32::MIN) => {
            return Err(ApiError::bad_request(
                "INVALID_QUANTITY",
                format!("Ajuste de stock inválido: {delta}"),
            ));
        }
        delta if delta > 0 => repo.restore_stock(product_id, delta).await?,
        delta => repo.decrement_stock(product_id, -delta).await?,
    };
    Ok(Json(product))
}
