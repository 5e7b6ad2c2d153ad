use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use super::{error::ApiError, state::AppState};
use crate::{
    core::{session_id, BookingContext, BookingSubmission, BookingWorkflow, PlannedTrip},
    services::{estimate_booking_cost, ContentGenerator, CostEstimate, GenerationRequest},
    types::{
        BookingFormData, BookingRecord, BudgetBand, DestinationOption, HotelRecommendations,
        ItineraryPlan, SavedTrip, TravelMode, TripFormData,
    },
};

pub const DEFAULT_PROMPT: &str = "Say hello in one short line.";

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct PromptQuery {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptBody {
    #[serde(default)]
    prompt: Option<String>,
}

/// Body prompt first, then `?q=`, then the greeting default.
fn pick_prompt(query: PromptQuery, body: Option<PromptBody>) -> String {
    body.and_then(|body| body.prompt)
        .or(query.q)
        .filter(|prompt| !prompt.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string())
}

async fn proxy(generator: &dyn ContentGenerator, prompt: String, failure: &str) -> Response {
    match generator.generate(&GenerationRequest::text(prompt)).await {
        Ok(text) => (StatusCode::OK, Json(json!({ "ok": true, "text": text }))).into_response(),
        Err(err) => {
            error!(target: "genie::http", provider = generator.name(), error = %err, "proxy generation failed");
            proxy_failure(failure, err.to_string())
        }
    }
}

fn proxy_failure(failure: &str, message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "ok": false, "error": failure, "message": message })),
    )
        .into_response()
}

pub async fn generate_handler(
    State(state): State<AppState>,
    Query(query): Query<PromptQuery>,
    body: Option<Json<PromptBody>>,
) -> Response {
    let prompt = pick_prompt(query, body.map(|Json(body)| body));
    proxy(state.openai.as_ref(), prompt, "OPENAI_FAILED").await
}

pub async fn gemini_handler(
    State(state): State<AppState>,
    Query(query): Query<PromptQuery>,
    body: Option<Json<PromptBody>>,
) -> Response {
    let Some(gemini) = &state.gemini else {
        return proxy_failure("GEMINI_FAILED", "Gemini API key missing".to_string());
    };
    let prompt = pick_prompt(query, body.map(|Json(body)| body));
    proxy(gemini.as_ref(), prompt, "GEMINI_FAILED").await
}

pub async fn env_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "hasOpenAIKey": state.config.has_openai_key(),
        "hasGeminiKey": state.config.has_gemini_key(),
        "environment": state.config.environment,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    user_id: String,
    #[serde(default)]
    session_id: Option<String>,
    form: TripFormData,
}

pub async fn plan_trip_handler(
    State(state): State<AppState>,
    Json(request): Json<PlanTripRequest>,
) -> ApiResult<(StatusCode, Json<PlannedTrip>)> {
    let session = match request.session_id {
        Some(id) => id,
        None => session_id(state.local.as_ref()).await?,
    };
    let planned = state
        .planner
        .plan_destinations(&request.user_id, &session, &request.form)
        .await?;
    state.drafts.clear().await?;
    Ok((StatusCode::CREATED, Json(planned)))
}

pub async fn load_draft_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Option<TripFormData>>> {
    Ok(Json(state.drafts.load().await?))
}

pub async fn save_draft_handler(
    State(state): State<AppState>,
    Json(form): Json<TripFormData>,
) -> ApiResult<StatusCode> {
    state.drafts.save(&form).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_draft_handler(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.drafts.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    user_id: String,
}

pub async fn list_trips_handler(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<SavedTrip>>> {
    Ok(Json(state.planner.saved_trips(&query.user_id).await?))
}

pub async fn delete_trip_handler(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> ApiResult<StatusCode> {
    state.planner.delete_trip(&query.user_id, trip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ItineraryRequest {
    form: TripFormData,
    destination: DestinationOption,
}

pub async fn itinerary_handler(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(request): Json<ItineraryRequest>,
) -> ApiResult<Json<ItineraryPlan>> {
    let plan = state
        .planner
        .select_destination(trip_id, &request.form, request.destination)
        .await?;
    Ok(Json(plan))
}

#[derive(Debug, Deserialize)]
pub struct SaveTripRequest {
    user_id: String,
    destination: DestinationOption,
    #[serde(default)]
    destinations: Vec<DestinationOption>,
    plan: ItineraryPlan,
}

pub async fn save_trip_handler(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
    Json(request): Json<SaveTripRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .planner
        .save_trip(
            &request.user_id,
            trip_id,
            request.destination,
            request.destinations,
            &request.plan,
        )
        .await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn pdf_handler(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> ApiResult<Response> {
    let (filename, bytes) = state.planner.export_pdf(trip_id).await?;
    info!(target: "genie::http", %trip_id, %filename, size = bytes.len(), "itinerary exported");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    user_id: String,
    trip_id: Uuid,
    destination: String,
    #[serde(default)]
    trip_budget: String,
    booking: BookingFormData,
    #[serde(default)]
    confirmed: bool,
}

pub async fn booking_handler(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> ApiResult<(StatusCode, Json<BookingSubmission>)> {
    let band = request.trip_budget.parse::<BudgetBand>().ok();
    let mut workflow =
        BookingWorkflow::new(request.destination, band).with_form(request.booking);
    workflow.proceed_to_confirmation()?;
    workflow.set_confirmed(request.confirmed)?;

    let submission = state
        .planner
        .submit_booking(
            &mut workflow,
            BookingContext {
                user_id: request.user_id,
                trip_id: request.trip_id,
                trip_budget: request.trip_budget,
                hotel_options: Vec::new(),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn list_bookings_handler(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<BookingRecord>>> {
    Ok(Json(
        state.planner.store().bookings_for_user(&query.user_id).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    hotels: HotelRecommendations,
    booking: BookingFormData,
    itinerary: ItineraryPlan,
    travel_mode: TravelMode,
}

pub async fn estimate_handler(Json(request): Json<EstimateRequest>) -> Json<CostEstimate> {
    Json(estimate_booking_cost(
        &request.hotels,
        &request.booking,
        &request.itinerary,
        request.travel_mode,
    ))
}
