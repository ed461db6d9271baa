// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it; otherwise they are skipped.

use carbon_tracker::db::ActivityStore;
use carbon_tracker::metrics::Metrics;
use carbon_tracker::models::Activity;
use carbon_tracker::services::{ActivityService, NewActivity};
use chrono::{DateTime, Duration, TimeZone, Utc};

mod common;
use common::test_db;

/// Generate a unique user ID for test isolation.
fn unique_user_id() -> String {
    format!("user-{}", uuid::Uuid::new_v4())
}

fn test_activity(user_id: &str, recorded_at: DateTime<Utc>, co2_kg: f64) -> Activity {
    Activity {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        category: "waste".to_string(),
        subtype: None,
        quantity: co2_kg * 2.0,
        co2_kg,
        recorded_at,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_insert_and_get_activity() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let recorded_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
    let activity = test_activity(&user_id, recorded_at, 2.5);

    db.insert_activity(&activity).await.unwrap();

    let fetched = db
        .get_activity(&activity.id)
        .await
        .unwrap()
        .expect("Activity should exist after insert");
    assert_eq!(fetched.user_id, user_id);
    assert_eq!(fetched.co2_kg, 2.5);
    assert_eq!(fetched.recorded_at, recorded_at);
}

#[tokio::test]
async fn test_recent_activities_ordering_and_limit() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for day in [3, 1, 4, 2] {
        db.insert_activity(&test_activity(&user_id, base + Duration::days(day), 1.0))
            .await
            .unwrap();
    }

    let recent = db.recent_activities_for_user(&user_id, 3).await.unwrap();

    let days: Vec<i64> = recent
        .iter()
        .map(|a| (a.recorded_at - base).num_days())
        .collect();
    assert_eq!(days, vec![4, 3, 2]);
}

#[tokio::test]
async fn test_user_stats_and_delete() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id();
    let first = test_activity(&user_id, Utc::now(), 1.5);
    let second = test_activity(&user_id, Utc::now(), 0.5);
    db.insert_activity(&first).await.unwrap();
    db.insert_activity(&second).await.unwrap();

    let stats = db.user_stats(&user_id).await.unwrap();
    assert_eq!(stats.activities_count, 2);
    assert_eq!(stats.total_co2_kg, 2.0);

    assert!(db.delete_activity(&first.id).await.unwrap());
    assert!(!db.delete_activity(&first.id).await.unwrap());

    let stats = db.user_stats(&user_id).await.unwrap();
    assert_eq!(stats.activities_count, 1);
    assert_eq!(stats.by_category.get("waste"), Some(&0.5));
}

#[tokio::test]
async fn test_service_refreshes_gauges_from_firestore() {
    require_emulator!();

    let store = ActivityStore::Firestore(test_db().await);
    let metrics = Metrics::new().unwrap();
    let service = ActivityService::new(store.clone(), metrics.clone());
    let user_id = unique_user_id();

    let before = store.global_stats().await.unwrap();

    let activity = service
        .record_activity(NewActivity {
            user_id: user_id.clone(),
            category: "diet".to_string(),
            subtype: Some("beef".to_string()),
            quantity: 1.0,
            recorded_at: None,
        })
        .await
        .unwrap();

    // Other tests share the emulator, so compare against a lower bound.
    assert!(metrics.total_carbon_kg() >= before.total_co2_kg + 27.0 - 1e-9);
    assert!(metrics.active_users() as u64 >= before.total_users() + 1);

    service.delete_activity(&activity.id).await.unwrap();
    assert!(store.get_activity(&activity.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_deletes_report_one_success() {
    require_emulator!();

    let db = test_db().await;
    let activity = test_activity(&unique_user_id(), Utc::now(), 1.0);
    db.insert_activity(&activity).await.unwrap();

    let (first, second) = tokio::join!(
        db.delete_activity(&activity.id),
        db.delete_activity(&activity.id)
    );

    let successes = [first.unwrap(), second.unwrap()]
        .into_iter()
        .filter(|removed| *removed)
        .count();
    assert_eq!(successes, 1);
    assert!(db.get_activity(&activity.id).await.unwrap().is_none());
}
