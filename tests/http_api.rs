use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use event_discovery::{
    config::Config,
    controllers,
    store::{EventStore, InMemoryEventStore},
    AppState,
};

fn memory_config() -> Config {
    Config::from_lookup(|key| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .unwrap()
}

fn app() -> Router {
    let store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
    controllers::app(AppState::with_store(memory_config(), store))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn meetup(location: &str, days_ahead: i64) -> Value {
    json!({
        "title": "Meetup",
        "description": "desc",
        "location": location,
        "date": (Utc::now() + Duration::days(days_ahead)).to_rfc3339(),
        "maxParticipants": 10,
    })
}

#[tokio::test]
async fn create_returns_201_with_envelope() {
    let app = app();
    let (status, body) = send(&app, post_json("/api/events", &meetup("Pune", 1))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Event created successfully");
    assert_eq!(body["data"]["currentParticipants"], 0);
    assert_eq!(body["data"]["availableSpots"], 10);
    assert_eq!(body["data"]["isFull"], false);
    assert_eq!(body["data"]["id"].as_str().unwrap().len(), 24);
}

#[tokio::test]
async fn create_then_fetch_by_id() {
    let app = app();
    let (_, created) = send(&app, post_json("/api/events", &meetup("Pune", 2))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, fetched) = send(&app, get(&format!("/api/events/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["success"], true);
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
async fn validation_failures_are_400_with_joined_messages() {
    let app = app();
    let mut body = meetup("Pune", -1);
    body["maxParticipants"] = json!(5);
    body["currentParticipants"] = json!(6);

    let (status, json) = send(&app, post_json("/api/events", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(
        json["message"],
        "Event date cannot be in the past, Current participants cannot exceed maximum participants"
    );
}

#[tokio::test]
async fn missing_fields_are_listed() {
    let app = app();
    let (status, json) = send(&app, post_json("/api/events", &json!({ "title": "Meetup" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Please provide all required fields: description, location, date, maxParticipants"
    );
}

#[tokio::test]
async fn malformed_body_is_400() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/events")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid request body");
}

#[tokio::test]
async fn list_filters_by_location_and_sorts_by_date() {
    let app = app();
    send(&app, post_json("/api/events", &meetup("Mumbai, Maharashtra", 5))).await;
    send(&app, post_json("/api/events", &meetup("Pune", 3))).await;
    send(&app, post_json("/api/events", &meetup("navi mumbai", 1))).await;

    let (status, all) = send(&app, get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["count"], 3);
    let locations: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["location"].as_str().unwrap())
        .collect();
    assert_eq!(locations, vec!["navi mumbai", "Pune", "Mumbai, Maharashtra"]);

    let (_, filtered) = send(&app, get("/api/events?location=MUMBAI")).await;
    assert_eq!(filtered["count"], 2);

    let (_, blank) = send(&app, get("/api/events?location=")).await;
    assert_eq!(blank["count"], 3);
}

#[tokio::test]
async fn invalid_id_is_400_and_absent_id_is_404() {
    let app = app();

    let (status, json) = send(&app, get("/api/events/not-24-hex-chars")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid event ID format");

    let (status, json) = send(&app, get("/api/events/65f1c2d3e4b5a69788990a1b")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Event not found");
}

#[tokio::test]
async fn health_and_fallback() {
    let app = app();

    let (status, json) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json["timestamp"].is_string());

    let (status, json) = send(&app, get("/api/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "success": false, "message": "Route not found" }));
}

#[tokio::test]
async fn duplicate_query_parameter_is_wrapped_400() {
    let app = app();
    let (status, json) = send(&app, get("/api/events?location=a&location=b")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({ "success": false, "message": "Invalid query parameters" })
    );
}

#[tokio::test]
async fn non_utf8_id_is_wrapped_400() {
    let app = app();
    let (status, json) = send(&app, get("/api/events/%FF%FE")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({ "success": false, "message": "Invalid event ID format" })
    );
}

#[tokio::test]
async fn unsupported_method_gets_json_404() {
    let app = app();
    for (method, uri) in [
        (Method::DELETE, "/api/events"),
        (Method::PUT, "/api/events/65f1c2d3e4b5a69788990a1b"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "success": false, "message": "Route not found" }));
    }
}

#[tokio::test]
async fn location_filter_is_not_trimmed() {
    let app = app();
    send(&app, post_json("/api/events", &meetup("Navimumbai", 1))).await;
    send(&app, post_json("/api/events", &meetup("Navi Mumbai", 2))).await;

    let (_, json) = send(&app, get("/api/events?location=Navi%20")).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["location"], "Navi Mumbai");
}
