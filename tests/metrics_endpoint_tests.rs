// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prometheus exposition and gauge maintenance tests.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{activities_tracked, assert_close, create_test_app, send};

async fn scrape(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_gauges_follow_creates_and_deletes() {
    let (app, state) = create_test_app();

    send(
        &app,
        "POST",
        "/api/activities",
        Some(json!({ "userId": "alice", "category": "waste", "quantity": 10 })),
    )
    .await;
    let (_, second) = send(
        &app,
        "POST",
        "/api/activities",
        Some(json!({ "userId": "bob", "category": "electricity", "quantity": 10 })),
    )
    .await;

    assert_close(state.metrics.total_carbon_kg(), 9.75);
    assert_eq!(state.metrics.active_users(), 2);
    assert_eq!(activities_tracked(&state, "waste"), Some(1));
    assert_eq!(activities_tracked(&state, "electricity"), Some(1));

    let id = second["id"].as_str().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/api/activities/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    assert_close(state.metrics.total_carbon_kg(), 5.0);
    assert_eq!(state.metrics.active_users(), 1);
    // Counters are monotonic; deletion does not decrement them.
    assert_eq!(activities_tracked(&state, "electricity"), Some(1));
    assert_eq!(activities_tracked(&state, "transport"), None);
}

#[tokio::test]
async fn test_scrape_contains_application_metrics() {
    let (app, _state) = create_test_app();

    send(
        &app,
        "POST",
        "/api/activities",
        Some(json!({ "userId": "alice", "type": "diet", "subtype": "vegan", "value": 2 })),
    )
    .await;
    send(&app, "GET", "/api/global-stats", None).await;

    let text = scrape(&app).await;

    assert!(text.contains("activities_tracked_total{type=\"diet\"} 1"));
    assert!(text.contains("total_carbon_footprint_kg 3"));
    assert!(text.contains("active_users_total 1"));
    assert!(text.contains(
        "http_request_duration_seconds_count{method=\"POST\",route=\"/api/activities\",status_code=\"201\"} 1"
    ));
    assert!(text.contains(
        "http_request_duration_seconds_count{method=\"GET\",route=\"/api/global-stats\",status_code=\"200\"} 1"
    ));
}

#[tokio::test]
async fn test_requests_labelled_by_route_template() {
    let (app, _state) = create_test_app();

    send(&app, "GET", "/api/activities/alice", None).await;
    send(&app, "GET", "/api/activities/bob", None).await;
    send(&app, "DELETE", "/api/activities/missing", None).await;

    let text = scrape(&app).await;

    assert!(text.contains(
        "http_request_duration_seconds_count{method=\"GET\",route=\"/api/activities/{id}\",status_code=\"200\"} 2"
    ));
    assert!(text.contains(
        "http_request_duration_seconds_count{method=\"DELETE\",route=\"/api/activities/{id}\",status_code=\"404\"} 1"
    ));
    assert!(!text.contains("/api/activities/alice"));
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let (app, _state) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["referrer-policy"], "no-referrer");
}
