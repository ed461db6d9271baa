// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity record store (Firestore or in-process).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Activity, GlobalStats, UserStats};

/// Collection names as constants.
pub mod collections {
    pub const ACTIVITIES: &str = "activities";
}

/// Persistence boundary for activity records.
#[derive(Clone)]
pub enum ActivityStore {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl ActivityStore {
    /// Connect to Firestore when a project is given, else keep records in memory.
    pub async fn connect(project_id: Option<&str>) -> Result<Self, AppError> {
        match project_id {
            Some(project_id) => Ok(Self::Firestore(FirestoreDb::new(project_id).await?)),
            None => {
                tracing::warn!(
                    "FIRESTORE_PROJECT_ID not set, activities will be kept in memory only"
                );
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::Memory(MemoryDb::new())
    }

    pub async fn insert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.insert_activity(activity).await,
            Self::Memory(db) => {
                db.insert_activity(activity);
                Ok(())
            }
        }
    }

    pub async fn get_activity(&self, id: &str) -> Result<Option<Activity>, AppError> {
        match self {
            Self::Firestore(db) => db.get_activity(id).await,
            Self::Memory(db) => Ok(db.get_activity(id)),
        }
    }

    /// Most recent activities for a user, ordered by `recorded_at` descending.
    pub async fn recent_activities_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError> {
        match self {
            Self::Firestore(db) => db.recent_activities_for_user(user_id, limit).await,
            Self::Memory(db) => Ok(db.recent_activities_for_user(user_id, limit)),
        }
    }

    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats, AppError> {
        match self {
            Self::Firestore(db) => db.user_stats(user_id).await,
            Self::Memory(db) => Ok(db.user_stats(user_id)),
        }
    }

    pub async fn global_stats(&self) -> Result<GlobalStats, AppError> {
        match self {
            Self::Firestore(db) => db.global_stats().await,
            Self::Memory(db) => Ok(db.global_stats()),
        }
    }

    /// Delete by ID. Returns `false` if nothing matched.
    pub async fn delete_activity(&self, id: &str) -> Result<bool, AppError> {
        match self {
            Self::Firestore(db) => db.delete_activity(id).await,
            Self::Memory(db) => Ok(db.delete_activity(id)),
        }
    }
}
