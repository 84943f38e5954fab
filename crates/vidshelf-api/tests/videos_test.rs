//! Video record API integration tests.
//!
//! Run with: `cargo test -p vidshelf-api --test videos_test`

mod helpers;

use axum::http::StatusCode;
use helpers::{create_test_config, setup_test_app, setup_test_app_with, PUBLIC_DOMAIN};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_root_returns_liveness_message() {
    let app = setup_test_app();

    let response = app.client().get("/").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Video App Backend is running!" })
    );
}

#[tokio::test]
async fn test_register_then_list_contains_record_once() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post("/api/videos")
        .json(&json!({
            "title": "Holiday",
            "video_key": "1700000000-holiday.mp4",
            "size": 1048576
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Value>();
    assert_eq!(created["title"], "Holiday");
    assert_eq!(created["video_key"], "1700000000-holiday.mp4");
    assert_eq!(created["size"], 1048576);
    assert_eq!(
        created["url"],
        format!("{}/1700000000-holiday.mp4", PUBLIC_DOMAIN)
    );
    assert!(created["deleted_at"].is_null());

    let listed = client.get("/api/videos").await.json::<Vec<Value>>();
    let matching: Vec<_> = listed
        .iter()
        .filter(|v| v["video_key"] == "1700000000-holiday.mp4")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["id"], created["id"]);
    assert_eq!(matching[0]["url"], created["url"]);
}

#[tokio::test]
async fn test_list_is_ordered_by_id() {
    let app = setup_test_app();
    let first = app.store.add_video("1-a.mp4", 10);
    let second = app.store.add_video("2-b.mp4", 20);
    let third = app.store.add_video("3-c.mp4", 30);

    let listed = app.client().get("/api/videos").await.json::<Vec<Value>>();

    let ids: Vec<i64> = listed.iter().map(|v| v["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
}

#[tokio::test]
async fn test_list_empty() {
    let app = setup_test_app();

    let response = app.client().get("/api/videos").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_register_requires_public_domain() {
    let mut config = create_test_config();
    config.public_domain = None;
    let app = setup_test_app_with(config);

    let response = app
        .client()
        .post("/api/videos")
        .json(&json!({ "title": "Holiday", "video_key": "k.mp4", "size": 1 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "CONFIGURATION_ERROR");
    assert_eq!(body["error"], "Public domain configuration missing");
    assert_eq!(app.store.video_count(), 0);
}

#[tokio::test]
async fn test_register_rejects_blank_fields() {
    let app = setup_test_app();

    for body in [
        json!({ "title": "", "video_key": "k.mp4", "size": 1 }),
        json!({ "title": "Holiday", "video_key": "  ", "size": 1 }),
    ] {
        let response = app.client().post("/api/videos").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
    }
    assert_eq!(app.store.video_count(), 0);
}

#[tokio::test]
async fn test_register_rejects_bad_size_and_missing_fields() {
    let app = setup_test_app();

    for body in [
        json!({ "title": "Holiday", "video_key": "k.mp4", "size": -1 }),
        json!({ "title": "Holiday", "video_key": "k.mp4", "size": "big" }),
        json!({ "title": "Holiday", "size": 1 }),
        json!({ "title": "Holiday", "video_key": "k.mp4", "size": u64::MAX }),
        json!({ "title": "Holiday", "video_key": "k.mp4", "size": 9_223_372_036_854_775_808u64 }),
    ] {
        let response = app.client().post("/api/videos").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
    }
    assert_eq!(app.store.video_count(), 0);
}

#[tokio::test]
async fn test_register_rejects_malformed_json() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/videos")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_delete_removes_object_then_record() {
    let app = setup_test_app();
    let video = app.store.add_video("1700000000-holiday.mp4", 100);

    let response = app
        .client()
        .delete(&format!("/api/videos/{}", video.id))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Video deleted successfully" })
    );
    assert_eq!(app.storage.deleted_keys(), vec!["1700000000-holiday.mp4"]);
    assert_eq!(app.store.video_count(), 0);
}

#[tokio::test]
async fn test_delete_unknown_id_is_404_without_storage_call() {
    let app = setup_test_app();
    app.store.add_video("1-a.mp4", 100);

    let response = app.client().delete("/api/videos/999").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "Video not found");
    assert_eq!(body["error_type"], "NotFound");
    assert!(app.storage.deleted_keys().is_empty());
    assert_eq!(app.store.video_count(), 1);
}

#[tokio::test]
async fn test_delete_non_numeric_id_is_400() {
    let app = setup_test_app();

    let response = app.client().delete("/api/videos/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
    assert!(app.storage.deleted_keys().is_empty());
}

#[tokio::test]
async fn test_delete_keeps_record_when_storage_fails() {
    let app = setup_test_app();
    let video = app.store.add_video("1-a.mp4", 100);
    app.storage.fail_delete.store(true, Ordering::SeqCst);

    let response = app
        .client()
        .delete(&format!("/api/videos/{}", video.id))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert!(body.get("details").is_none());

    let listed = app.client().get("/api/videos").await.json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], video.id);

    // A retry after storage recovers succeeds
    app.storage.fail_delete.store(false, Ordering::SeqCst);
    app.client()
        .delete(&format!("/api/videos/{}", video.id))
        .await
        .assert_status_ok();
    assert_eq!(app.store.video_count(), 0);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/")
        .add_header("X-Request-ID", "req-123")
        .await;
    assert_eq!(response.header("X-Request-ID"), "req-123");

    let response = app.client().get("/").await;
    assert!(!response.header("X-Request-ID").is_empty());
}

#[tokio::test]
async fn test_health_and_liveness_endpoints() {
    let app = setup_test_app();

    let response = app.client().get("/live").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "alive");

    let response = app.client().get("/health").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
}
