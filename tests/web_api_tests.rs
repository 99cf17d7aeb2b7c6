//! Integration tests for the Reading Atlas web API.
//!
//! These tests require the `web` feature (enabled by default):
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use reading_atlas::config::{Config, UiConfig};
use reading_atlas::web::{create_router, AppState};

mod fixtures;
use fixtures::{scenario_dataset, AXIS_KEYS};

/// Creates a router over the three-reading scenario dataset.
fn create_test_app() -> axum::Router {
    let config = Config {
        ui: UiConfig {
            title: "Test Atlas".to_string(),
        },
        ..Config::default()
    };
    create_router(AppState::new(config, scenario_dataset()))
}

/// Helper to make a GET request and parse the JSON response.
async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with a JSON body and parse the JSON response.
async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

fn default_selection() -> Value {
    json!({
        "x": AXIS_KEYS[0],
        "y": AXIS_KEYS[1],
        "z": AXIS_KEYS[2],
        "section": "all",
        "category": "all",
        "author": "all",
        "view": "3d"
    })
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert_eq!(json["readings"], 3);
    assert_eq!(json["axes"], 3);
}

// ============================================================================
// Options Tests
// ============================================================================

#[tokio::test]
async fn test_options_lists_axes_in_definition_order() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/options").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Test Atlas");

    let keys: Vec<&str> = json["axes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["value"].as_str().unwrap())
        .collect();
    assert_eq!(keys, AXIS_KEYS);
    assert_eq!(json["axes"][0]["label"], "Culture vs. Power");

    assert_eq!(json["sections"], json!(["L1-4", "L5"]));
    assert_eq!(json["categories"], json!(["Game Theory", "Historical"]));
    assert_eq!(json["views"].as_array().unwrap().len(), 4);
    assert_eq!(json["default_selection"]["x"], AXIS_KEYS[0]);
    assert_eq!(json["default_selection"]["section"], "all");
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[tokio::test]
async fn test_dispatch_without_event_renders_selection() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/dispatch",
        json!({ "selection": default_selection() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["applied"], false);
    assert!(json.get("ignored_reason").is_none());
    assert_eq!(json["figure"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["explanation"].as_array().unwrap().len(), 3);
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_dispatch_applies_filter_event() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/dispatch",
        json!({
            "selection": default_selection(),
            "event": {"type": "filter_changed", "filter": "section", "value": "L5"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["applied"], true);
    assert_eq!(json["selection"]["section"], "L5");

    let traces = json["figure"]["data"].as_array().unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0]["text"], json!(["R2"]));
}

#[tokio::test]
async fn test_dispatch_point_click_returns_details() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/dispatch",
        json!({
            "selection": default_selection(),
            "event": {"type": "point_clicked", "reading": 2}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["selection"]["selected"], 2);
    assert_eq!(json["details"]["title"], "R3");
    assert_eq!(json["details"]["dimensions"][2]["value"], 10);
}

#[tokio::test]
async fn test_dispatch_ignores_unknown_axis() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/dispatch",
        json!({
            "selection": default_selection(),
            "event": {"type": "axis_changed", "slot": "x", "key": "shoe_size"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["applied"], false);
    assert!(json["ignored_reason"]
        .as_str()
        .unwrap()
        .contains("shoe_size"));
    assert_eq!(json["selection"]["x"], AXIS_KEYS[0]);
}

#[tokio::test]
async fn test_dispatch_rejects_invalid_selection() {
    let app = create_test_app();

    let mut selection = default_selection();
    selection["category"] = json!("Astrology");

    let (status, json) = post_json(&app, "/api/dispatch", json!({ "selection": selection })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "Invalid selection");
    assert!(json["details"].as_str().unwrap().contains("Astrology"));
}

#[tokio::test]
async fn test_successive_events_build_on_returned_selection() {
    let app = create_test_app();

    let (_, first) = post_json(
        &app,
        "/api/dispatch",
        json!({
            "selection": default_selection(),
            "event": {"type": "axis_changed", "slot": "x", "key": AXIS_KEYS[2]}
        }),
    )
    .await;

    let (status, second) = post_json(
        &app,
        "/api/dispatch",
        json!({
            "selection": first["selection"],
            "event": {"type": "axis_changed", "slot": "y", "key": AXIS_KEYS[0]}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["selection"]["x"], AXIS_KEYS[2]);
    assert_eq!(second["selection"]["y"], AXIS_KEYS[0]);
    assert_eq!(second["selection"]["z"], AXIS_KEYS[2]);
}

#[tokio::test]
async fn test_dispatch_rejects_malformed_event_as_json() {
    let app = create_test_app();

    let (status, json) = post_json(
        &app,
        "/api/dispatch",
        json!({
            "selection": default_selection(),
            "event": {"type": "axis_changed", "slot": "w", "key": AXIS_KEYS[1]}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "Invalid request");
    assert!(json["details"].is_string());

    let (status, json) = post_json(
        &app,
        "/api/dispatch",
        json!({
            "selection": default_selection(),
            "event": {"type": "view_preset_selected", "preset": "4d"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "Invalid request");
}

// ============================================================================
// Figure Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_get_figure_defaults() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/figure").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["type"], "scatter3d");
    assert_eq!(json["layout"]["scene"]["xaxis"]["range"], json!([1.0, 10.0]));
}

#[tokio::test]
async fn test_get_figure_with_query() {
    let app = create_test_app();

    let (status, json) = get_json(
        &app,
        "/api/figure?section=L1-4&category=Historical&view=xy",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let traces = json["data"].as_array().unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0]["text"], json!(["R3"]));
    assert_eq!(json["layout"]["scene"]["zaxis"]["visible"], false);
}

#[tokio::test]
async fn test_get_figure_unknown_axis() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/figure?x=nope").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["details"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_get_figure_unknown_view_is_json_error() {
    let app = create_test_app();

    let (status, json) = get_json(&app, "/api/figure?view=4d").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "Invalid request");
    assert!(json["details"].as_str().unwrap().contains("4d"));
}

// ============================================================================
// Page Tests
// ============================================================================

#[tokio::test]
async fn test_root_serves_page() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_unknown_api_route_is_not_found() {
    let app = create_test_app();

    let (status, _) = get_json(&app, "/api/nothing-here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
