//! Integration tests for content management and schedule resolution.
//!
//! Requires TEST_DATABASE_URL; tests skip silently without it.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{
    admin_token, create_test_app, create_test_masjid, json_request, json_request_with_auth,
    parse_response_body, request_with_device_auth, try_create_test_pool,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

macro_rules! require_pool {
    () => {
        match try_create_test_pool().await {
            Some(pool) => pool,
            None => {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

/// Drive the pairing flow to a claimed screen; returns (screen_id, api_key).
async fn pair_screen(app: &Router, token: &str) -> (Uuid, String) {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/screens/unpaired",
            json!({}),
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    let code = body["pairing_code"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/screens/pair",
            json!({"pairing_code": code, "name": "Test screen"}),
            token,
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    let screen_id: Uuid = body["screen"]["id"].as_str().unwrap().parse().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/screens/unpaired/check",
            json!({"pairing_code": code}),
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    let api_key = body["api_key"].as_str().unwrap().to_string();

    (screen_id, api_key)
}

/// Create a content item via the API; returns its id.
async fn create_item(app: &Router, token: &str, title: &str) -> Uuid {
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/content",
            json!({"type": "ANNOUNCEMENT", "title": title, "duration_secs": 10}),
            token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    body["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_resolver_orders_by_position_with_eligibility() {
    let pool = require_pool!();
    let masjid_id = create_test_masjid(&pool).await;
    let app = create_test_app(pool.clone());
    let token = admin_token(masjid_id);
    let (screen_id, api_key) = pair_screen(&app, &token).await;

    let hadith = create_item(&app, &token, "Hadith of the day").await;
    let announcement = create_item(&app, &token, "Friday announcement").await;
    let event = create_item(&app, &token, "Community event").await;
    let expired = create_item(&app, &token, "Expired notice").await;

    // Expired window: must be filtered out of the resolved items
    sqlx::query(
        "UPDATE content_items SET end_date = NOW() - INTERVAL '1 day' WHERE id = $1",
    )
    .bind(expired)
    .execute(&pool)
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/schedules",
            json!({"name": "Daily", "is_default": true, "item_ids": []}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    let schedule_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    // Jumbled positions: 2=Hadith, 0=Announcement, 1=Event, 3=Expired
    for (item_id, position) in [(hadith, 2), (announcement, 0), (event, 1), (expired, 3)] {
        sqlx::query(
            "INSERT INTO content_schedule_items (schedule_id, content_item_id, position) VALUES ($1, $2, $3)",
        )
        .bind(schedule_id)
        .bind(item_id)
        .bind(position)
        .execute(&pool)
        .await
        .unwrap();
    }

    let response = app
        .oneshot(request_with_device_auth(
            Method::GET,
            "/api/v1/screen/content",
            None,
            screen_id,
            &api_key,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;

    assert_eq!(body["schedule"]["id"], schedule_id.to_string());
    assert_eq!(body["schedule"]["is_default"], true);
    let titles: Vec<&str> = body["schedule"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["Friday announcement", "Community event", "Hadith of the day"]
    );
}

#[tokio::test]
async fn test_screen_override_beats_default_schedule() {
    let pool = require_pool!();
    let masjid_id = create_test_masjid(&pool).await;
    let app = create_test_app(pool);
    let token = admin_token(masjid_id);
    let (screen_id, api_key) = pair_screen(&app, &token).await;

    let item = create_item(&app, &token, "Shared item").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/schedules",
            json!({"name": "Default", "is_default": true, "item_ids": [item]}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/schedules",
            json!({"name": "Override", "item_ids": [item]}),
            &token,
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    let override_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/admin/screens/{}", screen_id),
            json!({"schedule_id": override_id}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request_with_device_auth(
            Method::GET,
            "/api/v1/screen/content",
            None,
            screen_id,
            &api_key,
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["schedule"]["name"], "Override");

    // Clearing the override falls back to the default
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/admin/screens/{}", screen_id),
            json!({"schedule_id": null}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request_with_device_auth(
            Method::GET,
            "/api/v1/screen/content",
            None,
            screen_id,
            &api_key,
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["schedule"]["name"], "Default");
}

#[tokio::test]
async fn test_second_default_schedule_conflicts() {
    let pool = require_pool!();
    let masjid_id = create_test_masjid(&pool).await;
    let app = create_test_app(pool);
    let token = admin_token(masjid_id);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/schedules",
            json!({"name": "First default", "is_default": true}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/schedules",
            json!({"name": "Second default", "is_default": true}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // set-default is the sanctioned way to move the flag
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/schedules",
            json!({"name": "Second"}),
            &token,
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    let second_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/admin/schedules/{}/default", second_id),
            json!({}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["is_default"], true);
}

#[tokio::test]
async fn test_schedule_duplicate_copies_items() {
    let pool = require_pool!();
    let masjid_id = create_test_masjid(&pool).await;
    let app = create_test_app(pool);
    let token = admin_token(masjid_id);

    let a = create_item(&app, &token, "A").await;
    let b = create_item(&app, &token, "B").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/schedules",
            json!({"name": "Original", "is_default": true, "item_ids": [a, b]}),
            &token,
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    let schedule_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/admin/schedules/{}/duplicate", schedule_id),
            json!({"name": "Copy"}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["name"], "Copy");
    // The copy never inherits the default flag
    assert_eq!(body["is_default"], false);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tenant_isolation_on_screens() {
    let pool = require_pool!();
    let masjid_a = create_test_masjid(&pool).await;
    let masjid_b = create_test_masjid(&pool).await;
    let app = create_test_app(pool);
    let token_a = admin_token(masjid_a);
    let token_b = admin_token(masjid_b);

    let (screen_id, _api_key) = pair_screen(&app, &token_a).await;

    // Masjid B cannot see, update, or delete A's screen
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::GET,
            &format!("/api/v1/admin/screens/{}", screen_id),
            json!({}),
            &token_b,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::DELETE,
            &format!("/api/v1/admin/screens/{}", screen_id),
            json!({}),
            &token_b,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner still can
    let response = app
        .oneshot(json_request_with_auth(
            Method::GET,
            &format!("/api/v1/admin/screens/{}", screen_id),
            json!({}),
            &token_a,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_content_item_type_filter_and_update() {
    let pool = require_pool!();
    let masjid_id = create_test_masjid(&pool).await;
    let app = create_test_app(pool);
    let token = admin_token(masjid_id);

    create_item(&app, &token, "Plain announcement").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/content",
            json!({"type": "EVENT", "title": "Eid gathering", "duration_secs": 20}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    let event_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::GET,
            "/api/v1/admin/content?type=EVENT",
            json!({}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Eid gathering");

    let response = app
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/admin/content/{}", event_id),
            json!({"title": "Eid gathering (moved)", "is_active": false}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["title"], "Eid gathering (moved)");
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
async fn test_prayer_times_included_when_loaded() {
    let pool = require_pool!();
    let masjid_id = create_test_masjid(&pool).await;
    let app = create_test_app(pool.clone());
    let token = admin_token(masjid_id);
    let (screen_id, api_key) = pair_screen(&app, &token).await;

    seed_prayer_times(&pool, masjid_id).await;

    let response = app
        .oneshot(request_with_device_auth(
            Method::GET,
            "/api/v1/screen/content",
            None,
            screen_id,
            &api_key,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert!(body["prayer_times"]["fajr"].is_string());
    assert_eq!(body["prayer_times"]["masjid_id"], masjid_id.to_string());
}

async fn seed_prayer_times(pool: &PgPool, masjid_id: Uuid) {
    sqlx::query(
        r#"
        INSERT INTO prayer_times (masjid_id, date, fajr, sunrise, dhuhr, asr, maghrib, isha)
        VALUES ($1, CURRENT_DATE,
                NOW() - INTERVAL '8 hours', NOW() - INTERVAL '6 hours',
                NOW(), NOW() + INTERVAL '3 hours',
                NOW() + INTERVAL '6 hours', NOW() + INTERVAL '8 hours')
        "#,
    )
    .bind(masjid_id)
    .execute(pool)
    .await
    .expect("Failed to seed prayer times");
}
