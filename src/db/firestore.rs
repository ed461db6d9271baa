// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed activity operations.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Activity, GlobalStats, UserStats};
use futures_util::TryStreamExt;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Connect to the emulator without credentials.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any bearer token; an unsigned JWT avoids
        // looking up local application-default credentials.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJjYXJib24ifQ."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let client = firestore::FirestoreDb::with_options_token_source(
            firestore::FirestoreDbOptions::new(project_id.to_string()),
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore emulator");

        Ok(Self { client })
    }

    /// Store a new activity under its ID.
    pub async fn insert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        let _: Activity = self
            .client
            .fluent()
            .insert()
            .into(collections::ACTIVITIES)
            .document_id(&activity.id)
            .object(activity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get an activity by ID.
    pub async fn get_activity(&self, id: &str) -> Result<Option<Activity>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::ACTIVITIES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recent activities for a user, newest first.
    pub async fn recent_activities_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let user_id = user_id.to_string();
        self.client
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([(
                "recorded_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Aggregate every activity of a user.
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats, AppError> {
        let user_id = user_id.to_string();
        let activities: Vec<Activity> = self
            .client
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(UserStats::from_activities(&activities))
    }

    /// Aggregate the whole collection.
    ///
    /// Streams documents so the full set is never held in memory.
    pub async fn global_stats(&self) -> Result<GlobalStats, AppError> {
        let stream = self
            .client
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .obj::<Activity>()
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        stream
            .try_fold(GlobalStats::default(), |mut stats, activity| async move {
                stats.add_activity(&activity);
                Ok(stats)
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an activity. Returns `false` if no document had that ID.
    ///
    /// The delete carries an `exists` precondition, so of two concurrent
    /// deletes of the same ID only one reports success.
    pub async fn delete_activity(&self, id: &str) -> Result<bool, AppError> {
        let result = self
            .client
            .fluent()
            .delete()
            .from(collections::ACTIVITIES)
            .document_id(id)
            .precondition(firestore::FirestoreWritePrecondition::Exists(true))
            .execute()
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(firestore::errors::FirestoreError::DataNotFoundError(_)) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }
}
