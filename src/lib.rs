// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Carbon Tracker: record everyday activities and estimate their CO2 cost.
//!
//! This crate provides the backend API for ingesting activities, converting
//! them to kilograms of CO2 with static emission factors, and reporting
//! per-user and global totals alongside Prometheus metrics.

pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::ActivityStore;
use metrics::Metrics;
use services::ActivityService;
use std::time::Instant;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: ActivityStore,
    pub metrics: Metrics,
    pub activities: ActivityService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, store: ActivityStore, metrics: Metrics) -> Self {
        let activities = ActivityService::new(store.clone(), metrics.clone());
        Self {
            config,
            store,
            metrics,
            activities,
            started_at: Instant::now(),
        }
    }
}
