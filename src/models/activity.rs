// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Record ID (also used as document ID)
    pub id: String,
    /// Reporting user
    pub user_id: String,
    /// Category as reported; unknown values are kept verbatim
    pub category: String,
    /// Optional qualifier within the category (car, beef, ...)
    #[serde(default)]
    pub subtype: Option<String>,
    /// Amount in the category's unit (km, kWh, meals, kg)
    #[serde(default)]
    pub quantity: f64,
    /// Estimated CO2 in kilograms, fixed at creation
    #[serde(default)]
    pub co2_kg: f64,
    /// When the activity happened
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub recorded_at: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Activity categories with known emission factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Transport,
    Electricity,
    Diet,
    Waste,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Transport,
        Category::Electricity,
        Category::Diet,
        Category::Waste,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Transport => "transport",
            Category::Electricity => "electricity",
            Category::Diet => "diet",
            Category::Waste => "waste",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known categories.
#[derive(Debug, thiserror::Error)]
#[error("unknown activity category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
