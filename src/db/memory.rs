// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process activity store for local development and tests.

use crate::models::{Activity, GlobalStats, UserStats};
use dashmap::DashMap;
use std::sync::Arc;

/// Activities keyed by ID, shared across clones.
#[derive(Clone, Default)]
pub struct MemoryDb {
    activities: Arc<DashMap<String, Activity>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_activity(&self, activity: &Activity) {
        self.activities
            .insert(activity.id.clone(), activity.clone());
    }

    pub fn get_activity(&self, id: &str) -> Option<Activity> {
        self.activities.get(id).map(|entry| entry.value().clone())
    }

    /// Most recent activities for a user, newest first.
    pub fn recent_activities_for_user(&self, user_id: &str, limit: u32) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self
            .activities
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();

        activities.sort_by(|a, b| {
            b.recorded_at
                .cmp(&a.recorded_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        activities.truncate(limit as usize);
        activities
    }

    pub fn user_stats(&self, user_id: &str) -> UserStats {
        let mut stats = UserStats::default();
        for entry in self.activities.iter().filter(|e| e.user_id == user_id) {
            stats.add_activity(entry.value());
        }
        stats
    }

    pub fn global_stats(&self) -> GlobalStats {
        let mut stats = GlobalStats::default();
        for entry in self.activities.iter() {
            stats.add_activity(entry.value());
        }
        stats
    }

    /// Returns `false` if no activity had that ID.
    pub fn delete_activity(&self, id: &str) -> bool {
        self.activities.remove(id).is_some()
    }
}
