// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prometheus metrics for the service.
//!
//! One [`Metrics`] instance is built at startup and shared through
//! application state. Every collector is registered on its own
//! [`Registry`] rather than the prometheus default registry.

use prometheus::{
    Encoder, Gauge, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Histogram buckets for request latency, in seconds.
const HTTP_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0];

/// Process-scoped metrics registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    http_request_duration: HistogramVec,
    total_carbon: Gauge,
    active_users: IntGauge,
    activities_tracked: IntCounterVec,
}

impl Metrics {
    /// Create and register all collectors.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
            )
            .buckets(HTTP_DURATION_BUCKETS.to_vec()),
            &["route", "method", "status_code"],
        )?;
        let total_carbon = Gauge::new(
            "total_carbon_footprint_kg",
            "Total carbon footprint recorded (kg)",
        )?;
        let active_users = IntGauge::new("active_users_total", "Number of active users")?;
        let activities_tracked = IntCounterVec::new(
            Opts::new("activities_tracked_total", "Number of activities tracked"),
            &["type"],
        )?;

        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(total_carbon.clone()))?;
        registry.register(Box::new(active_users.clone()))?;
        registry.register(Box::new(activities_tracked.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            http_request_duration,
            total_carbon,
            active_users,
            activities_tracked,
        })
    }

    /// Record one finished HTTP request.
    pub fn observe_request(&self, route: &str, method: &str, status_code: u16, seconds: f64) {
        let status = status_code.to_string();
        self.http_request_duration
            .with_label_values(&[route, method, status.as_str()])
            .observe(seconds);
    }

    /// Count an ingested activity under its category.
    pub fn inc_activities_tracked(&self, category: &str) {
        self.activities_tracked
            .with_label_values(&[category])
            .inc();
    }

    /// Publish the recomputed store-wide totals.
    pub fn set_totals(&self, total_co2_kg: f64, active_users: u64) {
        self.total_carbon.set(total_co2_kg);
        self.active_users
            .set(i64::try_from(active_users).unwrap_or(i64::MAX));
    }

    pub fn total_carbon_kg(&self) -> f64 {
        self.total_carbon.get()
    }

    pub fn active_users(&self) -> i64 {
        self.active_users.get()
    }

    #[cfg(test)]
    pub fn activities_tracked(&self, category: &str) -> u64 {
        self.activities_tracked
            .with_label_values(&[category])
            .get()
    }

    /// Content type of [`Metrics::render`] output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
