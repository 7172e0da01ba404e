//! HTTP API layer with Axum routes and extractors.
//!
//! This crate provides:
//! - REST API routes for customers, accounts, sales and the cash register
//! - The acting-user extractor
//! - Error to JSON response mapping

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use mostrador_core::closing::BusinessDayClock;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Business-day clock of the shop.
    pub clock: BusinessDayClock,
    /// Cash difference still considered balanced.
    pub cash_tolerance: Decimal,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
