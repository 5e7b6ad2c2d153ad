use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;
use travel_genie::{
    core::{session_id, FormDraftCache},
    services::{render_itinerary_pdf, FileKeyValueStore, KeyValueStore},
    MemoryRecordStore, OpenAIClient, TravelPlanner, TripFormData,
};

fn form() -> TripFormData {
    TripFormData {
        start_location: "Pune".to_string(),
        month: "Oct".to_string(),
        travelers: 4,
        group_type: "Family".to_string(),
        domestic_or_intl: "Within India".to_string(),
        theme: vec!["Mountain".to_string(), "Nature".to_string()],
        mood: "Exploring".to_string(),
        budget: "Budget-friendly (Under ₹20k)".to_string(),
        travel_mode: "Train 3A".to_string(),
        days: 3,
        ..TripFormData::default()
    }
}

fn completion(content: serde_json::Value) -> String {
    json!({"choices": [{"message": {"content": content.to_string()}}]}).to_string()
}

fn planner_for(server: &mockito::Server) -> TravelPlanner {
    let client = OpenAIClient::new("sk-test").with_base_url(server.url());
    TravelPlanner::new(Arc::new(client), Arc::new(MemoryRecordStore::new()))
}

#[tokio::test]
async fn test_destinations_over_http_are_budget_checked() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "response_format": {"type": "json_object"},
            "temperature": 0.8
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(json!({
            "destinations": [
                {
                    "title": "Mahabaleshwar",
                    "approx_budget": {
                        "total_per_person": 9000,
                        "breakdown": {"stay": 4000, "food": 2000, "travel": 3000}
                    }
                },
                {
                    "title": "Munnar",
                    "approx_budget": {"total_per_person": 26000}
                }
            ]
        })))
        .create_async()
        .await;

    let planner = planner_for(&server);
    let planned = planner.plan_destinations("u1", "s1", &form()).await.unwrap();
    mock.assert_async().await;

    let kept = planned.outcome.destinations();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title, "Mahabaleshwar");
    assert!(kept.iter().all(|d| d.total_per_person().get() <= 20_000));
    assert_eq!(planned.report.over_budget(), 1);

    let trip = planner.store().get_trip(planned.trip_id).await.unwrap();
    assert_eq!(trip.user_id, "u1");
}

#[tokio::test]
async fn test_all_over_budget_yields_suggestion() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(json!({
            "destinations": [
                {"title": "Ladakh", "approx_budget": {"total_per_person": 45000}}
            ]
        })))
        .create_async()
        .await;

    let planner = planner_for(&server);
    let planned = planner.plan_destinations("u1", "s1", &form()).await.unwrap();

    assert!(planned.outcome.is_empty());
    assert!(!planned.outcome.suggestion().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_non_json_reply_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": "Sure! Here are some ideas"}}]}).to_string())
        .create_async()
        .await;

    let planner = planner_for(&server);
    let err = planner
        .plan_destinations("u1", "s1", &form())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_JSON");
}

#[tokio::test]
async fn test_server_error_falls_back_to_samples_when_enabled() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("upstream unavailable")
        .expect_at_least(1)
        .create_async()
        .await;

    let planner = planner_for(&server).with_sample_fallback(true);
    let prefs = form().validate().unwrap();

    let validation = planner.generate_destinations(&prefs).await.unwrap();
    assert!(validation
        .outcome
        .destinations()
        .iter()
        .all(|d| d.total_per_person().get() <= 20_000));

    let plan = planner.generate_itinerary(&prefs, "Goa").await.unwrap();
    assert_eq!(plan.days(), 3);
}

#[test]
fn test_pdf_export_is_deterministic() {
    let plan = serde_json::from_value(json!({
        "itinerary": [
            {
                "day": 1,
                "title": "Arrival in Manali",
                "items": [
                    {"time": "09:00", "activity": "Board the Volvo from Delhi", "duration": "12h"},
                    {"time": "21:00", "activity": "Check in near Mall Road"}
                ],
                "total_transit_hours": 12.0,
                "estimated_cost_per_person": 3500
            },
            {
                "day": 2,
                "title": "Solang Valley",
                "items": [{"time": "10:00", "activity": "Paragliding"}],
                "estimated_cost_per_person": 4500
            }
        ],
        "total_estimated_cost_per_person": 8000
    }))
    .unwrap();

    let first = render_itinerary_pdf("Manali", &plan).unwrap();
    let second = render_itinerary_pdf("Manali", &plan).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with(b"%PDF-1.4"));
    assert!(first.ends_with(b"%%EOF\n"));
}

#[tokio::test]
async fn test_draft_and_session_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("drafts.json");

    let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&path));
    let id = session_id(store.as_ref()).await.unwrap();
    FormDraftCache::new(store).save(&form()).await.unwrap();

    let reopened: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&path));
    assert_eq!(session_id(reopened.as_ref()).await.unwrap(), id);
    let draft = FormDraftCache::new(reopened).load().await.unwrap();
    assert_eq!(draft, Some(form()));
}
