// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity ingestion service.
//!
//! Handles the write workflow:
//! 1. Estimate CO2 from the emission factor table
//! 2. Store the record
//! 3. Count it per category
//! 4. Recompute and publish the store-wide gauges
//!
//! Gauges are re-derived from a full aggregation after every mutation, so
//! under concurrent writers the last recomputation wins. Republication is
//! not atomic with the write: a failed recomputation fails the request but
//! leaves the record in place.

use crate::db::ActivityStore;
use crate::error::{AppError, Result};
use crate::metrics::Metrics;
use crate::models::Activity;
use crate::services::emissions;
use chrono::{DateTime, Utc};

/// A validated activity ready to be stored.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: String,
    pub category: String,
    pub subtype: Option<String>,
    pub quantity: f64,
    /// Defaults to ingestion time
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Records and removes activities, keeping metrics in step.
#[derive(Clone)]
pub struct ActivityService {
    store: ActivityStore,
    metrics: Metrics,
}

impl ActivityService {
    pub fn new(store: ActivityStore, metrics: Metrics) -> Self {
        Self { store, metrics }
    }

    /// Estimate, store and count a new activity.
    pub async fn record_activity(&self, new: NewActivity) -> Result<Activity> {
        let co2_kg = emissions::estimate(&new.category, new.subtype.as_deref(), new.quantity);
        let now = Utc::now();

        let activity = Activity {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new.user_id,
            category: new.category,
            subtype: new.subtype,
            quantity: new.quantity,
            co2_kg,
            recorded_at: new.recorded_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_activity(&activity).await?;

        tracing::info!(
            activity_id = %activity.id,
            user_id = %activity.user_id,
            category = %activity.category,
            co2_kg = activity.co2_kg,
            "Activity recorded"
        );

        self.metrics.inc_activities_tracked(&activity.category);
        self.refresh_gauges().await?;

        Ok(activity)
    }

    /// Delete an activity by ID.
    ///
    /// Gauges are republished whether or not anything was removed.
    pub async fn delete_activity(&self, id: &str) -> Result<()> {
        let removed = self.store.delete_activity(id).await?;
        self.refresh_gauges().await?;

        if !removed {
            return Err(AppError::NotFound(format!("Activity {} not found", id)));
        }

        tracing::info!(activity_id = id, "Activity deleted");
        Ok(())
    }

    /// Recompute total CO2 and distinct users from the store and publish them.
    pub async fn refresh_gauges(&self) -> Result<()> {
        let totals = self.store.global_stats().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to recompute gauges after mutation");
        })?;

        self.metrics
            .set_totals(totals.total_co2_kg, totals.total_users());

        tracing::debug!(
            total_co2_kg = totals.total_co2_kg,
            active_users = totals.total_users(),
            "Gauges refreshed"
        );
        Ok(())
    }
}
