// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity and statistics API routes.

use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::services::{emissions, NewActivity};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Most records returned by the per-user listing.
const MAX_ACTIVITIES_PER_USER: u32 = 200;

/// Activity and stats routes.
///
/// Listing (by user ID) and deletion (by activity ID) share one path
/// template, since the router cannot hold two differently named
/// parameters at the same position.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", post(create_activity))
        .route(
            "/api/activities/{id}",
            get(list_activities).delete(delete_activity),
        )
        .route("/api/stats/{user_id}", get(get_user_stats))
        .route("/api/global-stats", get(get_global_stats))
}

// ─── Activities ──────────────────────────────────────────────

/// Create-activity body. `type`, `value` and `timestamp` are accepted as
/// aliases for `category`, `quantity` and `recordedAt`.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateActivityRequest {
    #[validate(length(max = 128))]
    user_id: Option<String>,
    #[serde(alias = "type")]
    #[validate(length(max = 64))]
    category: Option<String>,
    #[validate(length(max = 64))]
    subtype: Option<String>,
    /// Loosely typed: numbers and numeric strings are accepted
    #[serde(alias = "value")]
    quantity: Option<Value>,
    /// RFC 3339 string or epoch milliseconds
    #[serde(alias = "timestamp")]
    recorded_at: Option<Value>,
}

/// Stored activity as returned by the API.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    pub id: String,
    pub user_id: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub quantity: f64,
    pub co2_kg: f64,
    pub recorded_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Activity> for ActivityResponse {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            category: a.category,
            subtype: a.subtype,
            quantity: a.quantity,
            co2_kg: a.co2_kg,
            recorded_at: format_utc_rfc3339(a.recorded_at),
            created_at: format_utc_rfc3339(a.created_at),
            updated_at: format_utc_rfc3339(a.updated_at),
        }
    }
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

fn parse_recorded_at(raw: Option<&Value>) -> Result<Option<DateTime<Utc>>> {
    let invalid = || {
        AppError::BadRequest(
            "Invalid 'recordedAt': must be an RFC3339 datetime or epoch milliseconds".to_string(),
        )
    };

    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| invalid()),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole_millis))
            .and_then(DateTime::from_timestamp_millis)
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

/// Epoch milliseconds sent as a float, e.g. `1714559400000.0`.
fn whole_millis(ms: f64) -> Option<i64> {
    let in_range = ms >= i64::MIN as f64 && ms < i64::MAX as f64;
    (ms.fract() == 0.0 && in_range).then_some(ms as i64)
}

/// Record a new activity.
async fn create_activity(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ActivityResponse>)> {
    let Json(body) = payload?;
    body.validate()?;

    let (Some(user_id), Some(category)) =
        (required(body.user_id), required(body.category))
    else {
        return Err(AppError::BadRequest(
            "userId and category required".to_string(),
        ));
    };

    let quantity = emissions::coerce_quantity(body.quantity.as_ref());
    if quantity < 0.0 {
        return Err(AppError::BadRequest(
            "quantity must not be negative".to_string(),
        ));
    }
    let recorded_at = parse_recorded_at(body.recorded_at.as_ref())?;

    tracing::debug!(
        user_id = %user_id,
        category = %category,
        subtype = ?body.subtype,
        quantity,
        "Creating activity"
    );

    let activity = state
        .activities
        .record_activity(NewActivity {
            user_id,
            category,
            subtype: body.subtype,
            quantity,
            recorded_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(activity.into())))
}

/// List a user's most recent activities, newest first.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ActivityResponse>>> {
    tracing::debug!(user_id = %user_id, "Fetching activities");

    let activities = state
        .store
        .recent_activities_for_user(&user_id, MAX_ACTIVITIES_PER_USER)
        .await?;

    Ok(Json(activities.into_iter().map(Into::into).collect()))
}

/// Response for activity deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteActivityResponse {
    pub ok: bool,
}

/// Delete an activity by ID.
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteActivityResponse>> {
    state.activities.delete_activity(&id).await?;
    Ok(Json(DeleteActivityResponse { ok: true }))
}

// ─── Stats ───────────────────────────────────────────────────

/// Per-user CO2 totals.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStatsResponse {
    #[serde(rename = "totalCO2Kg")]
    pub total_co2_kg: f64,
    /// CO2 per category: { "transport": 1.92 }
    #[serde(rename = "byType")]
    pub by_type: HashMap<String, f64>,
    #[serde(rename = "activitiesCount")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activities_count: u64,
}

async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserStatsResponse>> {
    let stats = state.store.user_stats(&user_id).await?;

    Ok(Json(UserStatsResponse {
        total_co2_kg: stats.total_co2_kg,
        by_type: stats.by_category,
        activities_count: stats.activities_count,
    }))
}

/// Totals across all users.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GlobalStatsResponse {
    #[serde(rename = "totalUsers")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_users: u64,
    #[serde(rename = "totalCO2Kg")]
    pub total_co2_kg: f64,
    #[serde(rename = "activitiesCount")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activities_count: u64,
}

async fn get_global_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GlobalStatsResponse>> {
    let stats = state.store.global_stats().await?;

    Ok(Json(GlobalStatsResponse {
        total_users: stats.total_users(),
        total_co2_kg: stats.total_co2_kg,
        activities_count: stats.activities_count,
    }))
}
