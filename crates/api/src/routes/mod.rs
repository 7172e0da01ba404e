//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod cash_register;
pub mod customers;
pub mod expenses;
pub mod health;
pub mod products;
pub mod reports;
pub mod sales;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(customers::routes())
        .merge(accounts::routes())
        .merge(products::routes())
        .merge(sales::routes())
        .merge(cash_register::routes())
        .merge(expenses::routes())
        .merge(reports::routes())
}
