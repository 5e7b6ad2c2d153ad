use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use travel_genie::{
    server::{router, AppState},
    Config, ContentGenerator, GenerationRequest, MemoryRecordStore, PlannerError, Result,
    TravelPlanner,
};

/// Replays canned replies in order, then reports an empty response.
#[derive(Debug)]
struct ScriptedGenerator {
    replies: Mutex<Vec<Result<String>>>,
}

impl ScriptedGenerator {
    fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
        })
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(PlannerError::EmptyResponse))
    }
}

fn scripted_app(replies: Vec<Result<String>>) -> Router {
    let generator = ScriptedGenerator::new(replies);
    let planner = TravelPlanner::new(generator.clone(), Arc::new(MemoryRecordStore::new()));
    router(AppState::new(Config::default(), planner, generator, None))
}

fn configured_app(config: Config) -> Router {
    router(AppState::from_config(config).unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn form() -> Value {
    json!({
        "startLocation": "Bengaluru",
        "month": "Dec",
        "travelers": 2,
        "groupType": "Couple",
        "domesticOrIntl": "Within India",
        "theme": ["Beach"],
        "mood": "Relaxing",
        "budget": "Mid-range (₹20k-₹50k)",
        "travelMode": "Flight",
        "days": 2
    })
}

fn booking_form() -> Value {
    json!({
        "adults": 2,
        "numberOfHotels": 1,
        "numberOfRooms": 1,
        "numberOfCars": 1,
        "roomType": "4-star",
        "vehicleType": "small-car",
        "customerName": "Kiran",
        "customerEmail": "kiran@example.com",
        "customerPhone": "9000012345"
    })
}

#[tokio::test]
async fn test_env_reports_configured_keys() {
    let app = configured_app(Config {
        openai_api_key: Some("sk-test".to_string()),
        environment: "preview".to_string(),
        ..Config::default()
    });

    let (status, body) = send_json(&app, Method::GET, "/api/env", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasOpenAIKey"], true);
    assert_eq!(body["hasGeminiKey"], false);
    assert_eq!(body["environment"], "preview");
}

#[tokio::test]
async fn test_generate_proxies_prompt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(mockito::Matcher::PartialJson(json!({"model": "gpt-4o-mini"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": "Palolem"}}]}).to_string())
        .create_async()
        .await;

    let app = configured_app(Config {
        openai_api_key: Some("sk-test".to_string()),
        openai_base_url: Some(server.url()),
        ..Config::default()
    });

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/generate",
        Some(json!({"prompt": "Name one beach"})),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "text": "Palolem"}));
}

#[tokio::test]
async fn test_generate_reports_provider_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": {"message": "Incorrect API key provided"}}).to_string())
        .create_async()
        .await;

    let app = configured_app(Config {
        openai_api_key: Some("sk-bad".to_string()),
        openai_base_url: Some(server.url()),
        ..Config::default()
    });

    let (status, body) = send_json(&app, Method::POST, "/api/generate?q=hello", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "OPENAI_FAILED");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_generate_without_key_and_wrong_method() {
    let app = configured_app(Config::default());

    let (status, body) = send_json(&app, Method::POST, "/api/generate", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "OPENAI_FAILED");
    assert!(body["message"].as_str().unwrap().contains("OpenAI API key missing"));

    let (status, _) = send(&app, Method::GET, "/api/generate", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_gemini_missing_key() {
    let app = configured_app(Config::default());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/gemini",
        Some(json!({"prompt": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"ok": false, "error": "GEMINI_FAILED", "message": "Gemini API key missing"})
    );
}

#[tokio::test]
async fn test_gemini_proxies_prompt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-1.5-flash:generateContent")
        .match_header("x-goog-api-key", "g-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"candidates": [{"content": {"parts": [{"text": "Namaste!"}]}}]}).to_string(),
        )
        .create_async()
        .await;

    let app = configured_app(Config {
        gemini_api_key: Some("g-key".to_string()),
        gemini_base_url: Some(server.url()),
        ..Config::default()
    });

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/gemini",
        Some(json!({"prompt": "Greet me"})),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "text": "Namaste!"}));
}

#[tokio::test]
async fn test_invalid_trip_form_is_rejected_with_fields() {
    let app = scripted_app(Vec::new());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/trips",
        Some(json!({"user_id": "u1", "form": {}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "FORM_VALIDATION_ERROR");
    assert!(body["error"]["fields"].is_object());
}

#[tokio::test]
async fn test_trip_lifecycle() {
    let app = scripted_app(vec![
        Ok(json!({
            "destinations": [
                {"title": "Gokarna", "approx_budget": {"total_per_person": 28000}},
                {"title": "Maldives", "approx_budget": {"total_per_person": 90000}}
            ]
        })
        .to_string()),
        Ok(json!({
            "itinerary": [
                {"day": 1, "title": "Arrive", "estimated_cost_per_person": 9000},
                {"day": 2, "title": "Beaches", "estimated_cost_per_person": 4000}
            ]
        })
        .to_string()),
    ]);

    let (status, planned) = send_json(
        &app,
        Method::POST,
        "/api/trips",
        Some(json!({"user_id": "u1", "session_id": "s1", "form": form()})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(planned["status"], "found");
    let destinations = planned["destinations"].as_array().unwrap().clone();
    assert_eq!(destinations.len(), 1);
    let trip_id = planned["trip_id"].as_str().unwrap().to_string();

    let (status, plan) = send_json(
        &app,
        Method::POST,
        &format!("/api/trips/{trip_id}/itinerary"),
        Some(json!({"form": form(), "destination": destinations[0]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["itinerary"].as_array().unwrap().len(), 2);

    let (status, _) = send_json(
        &app,
        Method::POST,
        &format!("/api/trips/{trip_id}/save"),
        Some(json!({
            "user_id": "u1",
            "destination": destinations[0],
            "destinations": destinations,
            "plan": plan
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, saved) = send_json(&app, Method::GET, "/api/trips?user_id=u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved.as_array().unwrap().len(), 1);
    assert_eq!(saved[0]["id"], trip_id.as_str());

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/trips/{trip_id}/pdf"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("Gokarna_Itinerary.pdf"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/trips/{trip_id}?user_id=u1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, saved) = send_json(&app, Method::GET, "/api/trips?user_id=u1", None).await;
    assert!(saved.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_trip_is_not_found() {
    let app = scripted_app(Vec::new());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/trips/7b4c3f0e-3a51-4f0a-9d0e-6a2f6b1c2d3e/pdf",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_booking_flow() {
    let app = scripted_app(vec![
        Ok(json!({
            "destinations": [
                {"title": "Gokarna", "approx_budget": {"total_per_person": 28000}}
            ]
        })
        .to_string()),
        Err(PlannerError::Timeout("hotel lookup".to_string())),
    ]);

    let (_, planned) = send_json(
        &app,
        Method::POST,
        "/api/trips",
        Some(json!({"user_id": "u1", "form": form()})),
    )
    .await;
    let trip_id = planned["trip_id"].as_str().unwrap().to_string();

    let mut incomplete = booking_form();
    incomplete["customerPhone"] = json!("");
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "user_id": "u1",
            "trip_id": trip_id,
            "destination": "Gokarna",
            "booking": incomplete,
            "confirmed": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BOOKING_ERROR");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "user_id": "u1",
            "trip_id": trip_id,
            "destination": "Gokarna",
            "booking": booking_form(),
            "confirmed": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("confirm"));

    let (_, bookings) = send_json(&app, Method::GET, "/api/bookings?user_id=u1", None).await;
    assert!(bookings.as_array().unwrap().is_empty());

    let (status, submission) = send_json(
        &app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "user_id": "u1",
            "trip_id": trip_id,
            "destination": "Gokarna",
            "trip_budget": "Mid-range (₹20k-₹50k)",
            "booking": booking_form(),
            "confirmed": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(submission["booking"]["destination_name"], "Gokarna");
    assert!(submission["hotels"]["hotels"].as_array().unwrap().is_empty());

    let (_, bookings) = send_json(&app, Method::GET, "/api/bookings?user_id=u1", None).await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_booking_estimate() {
    let app = scripted_app(Vec::new());
    let (status, estimate) = send_json(
        &app,
        Method::POST,
        "/api/bookings/estimate",
        Some(json!({
            "booking": booking_form(),
            "itinerary": {
                "itinerary": [
                    {"day": 1, "title": "Arrive", "estimated_cost_per_person": 1000},
                    {"day": 2, "title": "Beaches", "estimated_cost_per_person": 1000}
                ]
            },
            "travel_mode": "Bus"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(estimate["days"], 2);
    assert_eq!(estimate["guests"], 2);
    assert_eq!(estimate["travel"], 0);
}

#[tokio::test]
async fn test_form_draft_round_trip() {
    let app = scripted_app(Vec::new());

    let (status, body) = send_json(&app, Method::GET, "/api/draft", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, _) = send(&app, Method::PUT, "/api/draft", Some(form())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send_json(&app, Method::GET, "/api/draft", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["startLocation"], "Bengaluru");
    assert_eq!(body["days"], 2);

    let (status, _) = send(&app, Method::DELETE, "/api/draft", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = send_json(&app, Method::GET, "/api/draft", None).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_booking_estimate_with_oversized_party() {
    let app = scripted_app(Vec::new());
    let mut booking = booking_form();
    booking["adults"] = json!(u32::MAX);
    booking["children"] = json!(1);

    let (status, estimate) = send_json(
        &app,
        Method::POST,
        "/api/bookings/estimate",
        Some(json!({
            "booking": booking,
            "itinerary": {"itinerary": [{"day": 1, "title": "Arrive"}]},
            "travel_mode": "Bus"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(estimate["guests"], u64::from(u32::MAX) + 1);
}

#[tokio::test]
async fn test_strict_schema_drops_loose_amounts() {
    let reply = json!({
        "choices": [{"message": {"content": json!({
            "destinations": [
                {"title": "Varkala", "approx_budget": {"total_per_person": "24,000"}},
                {"title": "Pondicherry", "approx_budget": {"total_per_person": 22000}}
            ]
        }).to_string()}}]
    })
    .to_string();

    let mut titles = Vec::new();
    for strict_schema in [false, true] {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply.clone())
            .create_async()
            .await;
        let app = configured_app(Config {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: Some(server.url()),
            strict_schema,
            ..Config::default()
        });

        let (status, planned) = send_json(
            &app,
            Method::POST,
            "/api/trips",
            Some(json!({"user_id": "u1", "session_id": "s1", "form": form()})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let kept: Vec<String> = planned["destinations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["title"].as_str().unwrap().to_string())
            .collect();
        titles.push(kept);
    }

    assert_eq!(titles[0], ["Varkala", "Pondicherry"]);
    assert_eq!(titles[1], ["Pondicherry"]);
}
