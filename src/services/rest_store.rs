use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::{
    generator::http_client,
    record_store::{RecordStore, TripUpdate},
};
use crate::{
    error::{PlannerError, Result},
    types::{BookingRecord, ItineraryPlan, ItineraryRecord, NewTrip, TripRecord},
};

const TRIPS: &str = "trips";
const ITINERARIES: &str = "itineraries";
const BOOKINGS: &str = "booking_requests";
const RETURN_ROWS: &str = "return=representation";

/// Record store backed by a PostgREST endpoint (`<base>/rest/v1/<table>`).
#[derive(Debug, Clone)]
pub struct RestRecordStore {
    base_url: String,
    api_key: String,
    access_token: Option<String>,
    client: Client,
}

impl RestRecordStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
            client: http_client(Duration::from_secs(30))?,
        })
    }

    /// Bearer token of the signed-in user; the API key is used when unset.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    /// Send and decode the returned rows.
    async fn rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>> {
        let response = request
            .send()
            .await
            .map_err(|err| PlannerError::Store(format!("request failed: {err}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| PlannerError::Store(format!("failed to read response: {err}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body["message"].as_str().map(str::to_string))
                .unwrap_or(text);
            return Err(PlannerError::Store(format!("{status}: {message}")));
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let deserializer = &mut serde_json::Deserializer::from_str(&text);
        serde_path_to_error::deserialize(deserializer)
            .map_err(|err| PlannerError::Store(format!("unexpected row shape: {err}")))
    }

    /// Send and require at least one affected row.
    async fn affected(&self, request: RequestBuilder, what: String) -> Result<()> {
        let rows: Vec<Value> = self.rows(request).await?;
        if rows.is_empty() {
            return Err(PlannerError::NotFound(what));
        }
        Ok(())
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripRecord> {
        let request = self
            .request(Method::POST, TRIPS)
            .header("Prefer", RETURN_ROWS)
            .json(&trip);
        let mut rows: Vec<TripRecord> = self.rows(request).await?;
        debug!(target: "genie::store", "insert trip");
        rows.pop()
            .ok_or_else(|| PlannerError::Store("insert returned no trip row".to_string()))
    }

    async fn get_trip(&self, trip_id: Uuid) -> Result<TripRecord> {
        let request = self
            .request(Method::GET, TRIPS)
            .query(&[("select", "*".to_string()), ("id", eq(trip_id))]);
        let mut rows: Vec<TripRecord> = self.rows(request).await?;
        rows.pop()
            .ok_or_else(|| PlannerError::NotFound(format!("trip {trip_id}")))
    }

    async fn update_trip(
        &self,
        trip_id: Uuid,
        user_id: Option<&str>,
        update: TripUpdate,
    ) -> Result<()> {
        let mut body = json!({
            "selected_destination": update.selected_destination,
            "days": update.days,
        });
        if update.touch {
            body["updated_at"] = json!(Utc::now());
        }

        let mut filters = vec![("id", eq(trip_id))];
        if let Some(user) = user_id {
            filters.push(("user_id", eq(user)));
        }
        let request = self
            .request(Method::PATCH, TRIPS)
            .header("Prefer", RETURN_ROWS)
            .query(&filters)
            .json(&body);
        self.affected(request, format!("trip {trip_id}")).await
    }

    async fn saved_trips(&self, user_id: &str) -> Result<Vec<TripRecord>> {
        let request = self.request(Method::GET, TRIPS).query(&[
            ("select", "*".to_string()),
            ("user_id", eq(user_id)),
            ("selected_destination", "not.is.null".to_string()),
            ("order", "created_at.desc".to_string()),
        ]);
        self.rows(request).await
    }

    async fn delete_trip(&self, user_id: &str, trip_id: Uuid) -> Result<()> {
        let request = self
            .request(Method::DELETE, TRIPS)
            .header("Prefer", RETURN_ROWS)
            .query(&[("id", eq(trip_id)), ("user_id", eq(user_id))]);
        self.affected(request, format!("trip {trip_id}")).await
    }

    async fn insert_itinerary(&self, record: ItineraryRecord) -> Result<()> {
        let request = self.request(Method::POST, ITINERARIES).json(&record);
        self.rows::<Value>(request).await.map(|_| ())
    }

    async fn update_itinerary_plan(&self, trip_id: Uuid, plan: &ItineraryPlan) -> Result<()> {
        let body = json!({
            "daily_plan": plan.itinerary,
            "total_cost_per_person": plan.total_estimated_cost_per_person,
        });
        let request = self
            .request(Method::PATCH, ITINERARIES)
            .header("Prefer", RETURN_ROWS)
            .query(&[("trip_id", eq(trip_id))])
            .json(&body);
        self.affected(request, format!("itinerary for trip {trip_id}"))
            .await
    }

    async fn upsert_itinerary(&self, record: ItineraryRecord) -> Result<()> {
        let request = self
            .request(Method::POST, ITINERARIES)
            .query(&[("on_conflict", "trip_id")])
            .header("Prefer", format!("resolution=merge-duplicates,{RETURN_ROWS}"))
            .json(&record);
        self.rows::<Value>(request).await.map(|_| ())
    }

    async fn get_itinerary(&self, trip_id: Uuid) -> Result<Option<ItineraryRecord>> {
        let request = self
            .request(Method::GET, ITINERARIES)
            .query(&[("select", "*".to_string()), ("trip_id", eq(trip_id))]);
        let mut rows: Vec<ItineraryRecord> = self.rows(request).await?;
        Ok(rows.pop())
    }

    async fn insert_booking(&self, booking: BookingRecord) -> Result<BookingRecord> {
        let request = self
            .request(Method::POST, BOOKINGS)
            .header("Prefer", RETURN_ROWS)
            .json(&booking);
        let mut rows: Vec<BookingRecord> = self.rows(request).await?;
        debug!(target: "genie::store", booking_id = %booking.id, "insert booking");
        Ok(rows.pop().unwrap_or(booking))
    }

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<BookingRecord>> {
        let request = self.request(Method::GET, BOOKINGS).query(&[
            ("select", "*".to_string()),
            ("user_id", eq(user_id)),
            ("order", "created_at.desc".to_string()),
        ]);
        self.rows(request).await
    }
}
