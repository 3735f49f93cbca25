//! Integration tests for the aggregation endpoint
//!
//! Providers are pointed at an unreachable address, so every upstream call
//! fails fast and the degradation paths are exercised end to end without
//! touching the network.

use std::sync::Arc;

use adventure_aggregator::{Aggregator, AggregatorConfig, web};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

fn offline_config() -> AggregatorConfig {
    let mut config = AggregatorConfig::default();
    config.providers.geocoding_base_url = "http://127.0.0.1:1".to_string();
    config.providers.weather_base_url = "http://127.0.0.1:1".to_string();
    config.providers.news_base_url = "http://127.0.0.1:1".to_string();
    config.providers.chat_base_url = "http://127.0.0.1:1".to_string();
    config.providers.weather_api_key = Some("test-weather-key".to_string());
    config.providers.news_api_key = Some("test-news-key".to_string());
    config.providers.chat_api_key = Some("test-chat-key".to_string());
    config
}

fn app() -> Router {
    let aggregator = Arc::new(Aggregator::new(&offline_config()).expect("aggregator"));
    Router::new().nest("/api", web::router(aggregator))
}

async fn send(uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = app().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

#[tokio::test]
async fn malformed_body_yields_invalid_input() {
    let (status, json) = send("/api/adventure?kind=combined", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, serde_json::json!({"error": "Invalid input format"}));
}

#[tokio::test]
async fn unknown_kind_yields_invalid_input() {
    let (status, json) = send(
        "/api/adventure?kind=chaos",
        r#"{"destination": "Berlin", "durationHours": 3}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, serde_json::json!({"error": "Invalid input format"}));
}

#[tokio::test]
async fn blank_destination_yields_invalid_input() {
    let (status, json) = send(
        "/api/adventure?kind=place",
        r#"{"destination": "  "}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid input format");
}

#[tokio::test]
async fn non_positive_duration_yields_invalid_input() {
    let (status, _) = send(
        "/api/adventure?kind=weather",
        r#"{"destination": "Berlin", "durationHours": -1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn plan_without_duration_yields_invalid_input() {
    let (status, _) = send(
        "/api/adventure?kind=plan",
        r#"{"destination": "Berlin"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn place_degrades_to_default_when_provider_unreachable() {
    let (status, json) = send(
        "/api/adventure?kind=place",
        r#"{"destination": "Paris, France"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"place": "a cool spot"}));
}

#[tokio::test]
async fn kind_defaults_to_place() {
    let (status, json) = send("/api/adventure", r#"{"destination": "Paris, France"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"place": "a cool spot"}));
}

#[tokio::test]
async fn weather_degrades_to_default_when_provider_unreachable() {
    let (status, json) = send(
        "/api/adventure?kind=weather",
        r#"{"destination": "Paris, France"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"weather": "typical weather"}));
}

#[tokio::test]
async fn combined_degrades_field_by_field_and_stays_200() {
    let (status, json) = send(
        "/api/adventure?kind=combined",
        r#"{"destination": "Berlin", "durationHours": 3}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["place"], "a cool spot");
    assert_eq!(json["weather"], "typical weather");
    assert_eq!(json["adventure"], "Explore Berlin for 3 hours!");
    assert_eq!(json["todo"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["tips"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["news"], "nothing big today");
    assert_eq!(json["image"], "");
    assert!(json.get("error").is_none());
    assert!(json.get("answer").is_none());
}

#[tokio::test]
async fn special_trigger_returns_single_answer_field() {
    let (status, json) = send(
        "/api/adventure?kind=combined",
        r#"{"destination": "Berlin", "durationHours": 3, "specialPrompt": "what is the meaning of adventure?"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.get("answer").is_some());
    assert!(json.get("adventure").is_none());
    assert!(json.get("todo").is_none());
    assert!(json.get("weather").is_none());
    assert!(json.get("news").is_none());
}

#[tokio::test]
async fn special_kind_without_trigger_yields_invalid_input() {
    let (status, _) = send(
        "/api/adventure?kind=special",
        r#"{"destination": "Berlin", "specialPrompt": "plan my weekend"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
