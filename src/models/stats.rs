// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CO2 aggregates computed from stored activities.
//!
//! Aggregates are derived on demand by folding over activity records;
//! nothing here is persisted.

use std::collections::{HashMap, HashSet};

use crate::models::Activity;

/// Per-user CO2 totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserStats {
    /// Sum of `co2_kg` over the user's activities
    pub total_co2_kg: f64,
    /// Sum of `co2_kg` per category
    pub by_category: HashMap<String, f64>,
    /// Number of activities
    pub activities_count: u64,
}

impl UserStats {
    /// Fold one activity into the totals.
    pub fn add_activity(&mut self, activity: &Activity) {
        self.total_co2_kg += activity.co2_kg;
        *self
            .by_category
            .entry(activity.category.clone())
            .or_insert(0.0) += activity.co2_kg;
        self.activities_count += 1;
    }

    pub fn from_activities<'a>(activities: impl IntoIterator<Item = &'a Activity>) -> Self {
        let mut stats = Self::default();
        for activity in activities {
            stats.add_activity(activity);
        }
        stats
    }
}

/// Totals across every stored activity.
#[derive(Debug, Clone, Default)]
pub struct GlobalStats {
    users: HashSet<String>,
    /// Sum of `co2_kg` over all activities
    pub total_co2_kg: f64,
    /// Number of activities
    pub activities_count: u64,
}

impl GlobalStats {
    /// Fold one activity into the totals.
    pub fn add_activity(&mut self, activity: &Activity) {
        self.users.insert(activity.user_id.clone());
        self.total_co2_kg += activity.co2_kg;
        self.activities_count += 1;
    }

    pub fn from_activities<'a>(activities: impl IntoIterator<Item = &'a Activity>) -> Self {
        let mut stats = Self::default();
        for activity in activities {
            stats.add_activity(activity);
        }
        stats
    }

    /// Number of distinct users with at least one activity.
    pub fn total_users(&self) -> u64 {
        self.users.len() as u64
    }
}
