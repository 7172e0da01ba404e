//! Mostrador API server.
//!
//! Main entry point for the point-of-sale backend.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mostrador_api::{AppState, create_router};
use mostrador_core::closing::{BusinessDayClock, PendingSeverity};
use mostrador_db::{CashClosingRepository, connect_with_pool};
use mostrador_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mostrador=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let clock = BusinessDayClock::from_config(&config.register)?;
    info!(
        cutoff_hour = config.register.cutoff_hour,
        timezone = %config.register.timezone,
        tolerance = %config.register.cash_difference_tolerance,
        "Register configured"
    );

    let state = AppState {
        db: Arc::new(db),
        clock,
        cash_tolerance: config.register.cash_difference_tolerance,
    };

    // Surface a register left open on a past day; sales keep working.
    let registers =
        CashClosingRepository::new((*state.db).clone(), state.clock, state.cash_tolerance);
    match registers.check_pending_cash_register(Utc::now()).await {
        Ok(pending) if pending.severity != PendingSeverity::None => {
            warn!(message = %pending.message, "Cash register pending");
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Could not check pending cash register"),
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
