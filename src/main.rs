// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon Tracker API Server
//!
//! Records user activities, estimates their CO2 footprint and exposes
//! aggregate statistics and Prometheus metrics.

use carbon_tracker::{config::Config, db::ActivityStore, metrics::Metrics, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Carbon Tracker API");

    let store = ActivityStore::connect(config.firestore_project_id.as_deref()).await?;
    let metrics = Metrics::new()?;

    let state = Arc::new(AppState::new(config.clone(), store, metrics));

    // Publish gauges for whatever is already stored before the first write.
    if let Err(e) = state.activities.refresh_gauges().await {
        tracing::warn!(error = %e, "Initial gauge refresh failed");
    }

    let app = carbon_tracker::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("carbon_tracker=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
