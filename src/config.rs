// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

const DEFAULT_PORT: u16 = 4000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project hosting the Firestore database.
    /// When unset, activities are kept in process memory.
    pub firestore_project_id: Option<String>,
    /// Browser origin allowed by CORS in addition to localhost.
    /// When unset, any origin is allowed.
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Config for tests: in-memory store, permissive CORS.
    pub fn test_default() -> Self {
        Self {
            port: DEFAULT_PORT,
            firestore_project_id: None,
            cors_allowed_origin: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            firestore_project_id: non_empty_var("FIRESTORE_PROJECT_ID"),
            cors_allowed_origin: non_empty_var("CORS_ALLOWED_ORIGIN"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
