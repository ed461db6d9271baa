// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod api;

use crate::config::Config;
use crate::error::Result;
use crate::middleware::track_request_duration;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const BANNER: &str = "Carbon Footprint Tracker - Backend";

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the process started serving
    pub uptime: f64,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Prometheus scrape endpoint.
async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, state.metrics.content_type())], body).into_response())
}

async fn banner() -> &'static str {
    BANNER
}

/// Allow the configured origin plus localhost, or any origin when unset.
fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    match config.cors_allowed_origin.clone() {
        Some(allowed) => cors.allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == allowed
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        )),
        None => cors.allow_origin(Any),
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    // Timed routes; route_layer only wraps what is registered above it.
    let routes = Router::new()
        .route("/", get(banner))
        .route("/api/health", get(health_check))
        .route("/metrics", get(metrics))
        .merge(api::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            track_request_duration,
        ));

    routes
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
