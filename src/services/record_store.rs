use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{PlannerError, Result},
    types::{
        BookingRecord, DestinationOption, ItineraryPlan, ItineraryRecord, NewTrip, TripRecord,
    },
};

/// Fields changed when a destination is chosen or a trip is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct TripUpdate {
    pub selected_destination: DestinationOption,
    pub days: u32,
    /// Stamp `updated_at`
    pub touch: bool,
}

/// Persistence for trips, itineraries and booking requests.
///
/// Rows reference a trip by id; nothing spans more than one table per call.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripRecord>;

    async fn get_trip(&self, trip_id: Uuid) -> Result<TripRecord>;

    /// Update a trip, optionally only when it belongs to `user_id`.
    async fn update_trip(
        &self,
        trip_id: Uuid,
        user_id: Option<&str>,
        update: TripUpdate,
    ) -> Result<()>;

    /// Trips with a selected destination, newest first.
    async fn saved_trips(&self, user_id: &str) -> Result<Vec<TripRecord>>;

    async fn delete_trip(&self, user_id: &str, trip_id: Uuid) -> Result<()>;

    async fn insert_itinerary(&self, record: ItineraryRecord) -> Result<()>;

    /// Set the day plan and total on an existing itinerary row.
    async fn update_itinerary_plan(&self, trip_id: Uuid, plan: &ItineraryPlan) -> Result<()>;

    /// Insert or replace the itinerary row for its trip.
    async fn upsert_itinerary(&self, record: ItineraryRecord) -> Result<()>;

    async fn get_itinerary(&self, trip_id: Uuid) -> Result<Option<ItineraryRecord>>;

    async fn insert_booking(&self, booking: BookingRecord) -> Result<BookingRecord>;

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<BookingRecord>>;
}

#[derive(Debug, Default)]
struct Tables {
    trips: Vec<TripRecord>,
    itineraries: HashMap<Uuid, ItineraryRecord>,
    bookings: Vec<BookingRecord>,
}

impl Tables {
    fn trip_mut(&mut self, trip_id: Uuid) -> Option<&mut TripRecord> {
        self.trips.iter_mut().find(|trip| trip.id == trip_id)
    }

    fn has_trip(&self, trip_id: Uuid) -> bool {
        self.trips.iter().any(|trip| trip.id == trip_id)
    }
}

fn missing_trip(trip_id: Uuid) -> PlannerError {
    PlannerError::NotFound(format!("trip {trip_id}"))
}

/// Record store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: RwLock<Tables>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripRecord> {
        let record = trip.into_record(Uuid::new_v4(), Utc::now());
        debug!(target: "genie::store", trip_id = %record.id, "insert trip");
        self.tables.write().await.trips.push(record.clone());
        Ok(record)
    }

    async fn get_trip(&self, trip_id: Uuid) -> Result<TripRecord> {
        self.tables
            .read()
            .await
            .trips
            .iter()
            .find(|trip| trip.id == trip_id)
            .cloned()
            .ok_or_else(|| missing_trip(trip_id))
    }

    async fn update_trip(
        &self,
        trip_id: Uuid,
        user_id: Option<&str>,
        update: TripUpdate,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let trip = tables
            .trip_mut(trip_id)
            .filter(|trip| user_id.map_or(true, |user| trip.user_id == user))
            .ok_or_else(|| missing_trip(trip_id))?;

        trip.selected_destination = Some(update.selected_destination);
        trip.days = Some(update.days);
        if update.touch {
            trip.updated_at = Some(Utc::now());
        }
        debug!(target: "genie::store", %trip_id, "update trip");
        Ok(())
    }

    async fn saved_trips(&self, user_id: &str) -> Result<Vec<TripRecord>> {
        let tables = self.tables.read().await;
        let mut trips: Vec<TripRecord> = tables
            .trips
            .iter()
            .filter(|trip| trip.user_id == user_id && trip.selected_destination.is_some())
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn delete_trip(&self, user_id: &str, trip_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.trips.len();
        tables
            .trips
            .retain(|trip| !(trip.id == trip_id && trip.user_id == user_id));
        if tables.trips.len() == before {
            return Err(missing_trip(trip_id));
        }
        tables.itineraries.remove(&trip_id);
        debug!(target: "genie::store", %trip_id, "delete trip");
        Ok(())
    }

    async fn insert_itinerary(&self, record: ItineraryRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.has_trip(record.trip_id) {
            return Err(missing_trip(record.trip_id));
        }
        if tables.itineraries.contains_key(&record.trip_id) {
            return Err(PlannerError::Store(format!(
                "itinerary for trip {} already exists",
                record.trip_id
            )));
        }
        tables.itineraries.insert(record.trip_id, record);
        Ok(())
    }

    async fn update_itinerary_plan(&self, trip_id: Uuid, plan: &ItineraryPlan) -> Result<()> {
        let mut tables = self.tables.write().await;
        let record = tables
            .itineraries
            .get_mut(&trip_id)
            .ok_or_else(|| PlannerError::NotFound(format!("itinerary for trip {trip_id}")))?;
        record.daily_plan = plan.itinerary.clone();
        record.total_cost_per_person = Some(plan.total_estimated_cost_per_person);
        Ok(())
    }

    async fn upsert_itinerary(&self, record: ItineraryRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.has_trip(record.trip_id) {
            return Err(missing_trip(record.trip_id));
        }
        tables.itineraries.insert(record.trip_id, record);
        Ok(())
    }

    async fn get_itinerary(&self, trip_id: Uuid) -> Result<Option<ItineraryRecord>> {
        Ok(self.tables.read().await.itineraries.get(&trip_id).cloned())
    }

    async fn insert_booking(&self, booking: BookingRecord) -> Result<BookingRecord> {
        let mut tables = self.tables.write().await;
        if !tables.has_trip(booking.trip_id) {
            return Err(missing_trip(booking.trip_id));
        }
        debug!(target: "genie::store", booking_id = %booking.id, "insert booking");
        tables.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<BookingRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .bookings
            .iter()
            .filter(|booking| booking.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookingFormData, Rupees, TripFormData};

    fn destination() -> DestinationOption {
        serde_json::from_value(serde_json::json!({
            "title": "Coorg",
            "approx_budget": {"total_per_person": 15000}
        }))
        .unwrap()
    }

    async fn trip(store: &MemoryRecordStore, user: &str) -> TripRecord {
        store
            .insert_trip(NewTrip::from_form(user, "session", &TripFormData::default()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_saved_trips_filter_and_order() {
        let store = MemoryRecordStore::new();
        let first = trip(&store, "u1").await;
        let second = trip(&store, "u1").await;
        let _unselected = trip(&store, "u1").await;
        let other_user = trip(&store, "u2").await;

        for id in [first.id, second.id, other_user.id] {
            let update = TripUpdate {
                selected_destination: destination(),
                days: 3,
                touch: false,
            };
            store.update_trip(id, None, update).await.unwrap();
        }

        let saved = store.saved_trips("u1").await.unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved[0].created_at >= saved[1].created_at);
        assert!(saved.iter().all(|t| t.days == Some(3)));
    }

    #[tokio::test]
    async fn test_user_scoped_update_and_delete() {
        let store = MemoryRecordStore::new();
        let record = trip(&store, "owner").await;
        let update = TripUpdate {
            selected_destination: destination(),
            days: 4,
            touch: true,
        };

        let err = store
            .update_trip(record.id, Some("intruder"), update.clone())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");

        store
            .update_trip(record.id, Some("owner"), update)
            .await
            .unwrap();
        assert!(store.get_trip(record.id).await.unwrap().updated_at.is_some());

        assert!(store.delete_trip("intruder", record.id).await.is_err());
        store.delete_trip("owner", record.id).await.unwrap();
        assert!(store.get_trip(record.id).await.is_err());
    }

    #[tokio::test]
    async fn test_itinerary_rows_are_unique_per_trip() {
        let store = MemoryRecordStore::new();
        let record = trip(&store, "u").await;

        store
            .insert_itinerary(ItineraryRecord::new(record.id, vec![destination()]))
            .await
            .unwrap();
        assert!(store
            .insert_itinerary(ItineraryRecord::new(record.id, Vec::new()))
            .await
            .is_err());

        let plan = ItineraryPlan {
            total_estimated_cost_per_person: Rupees(9000),
            ..ItineraryPlan::default()
        };
        store.update_itinerary_plan(record.id, &plan).await.unwrap();
        store
            .upsert_itinerary(ItineraryRecord::new(record.id, Vec::new()).with_plan(&plan))
            .await
            .unwrap();

        let stored = store.get_itinerary(record.id).await.unwrap().unwrap();
        assert!(stored.destination_options.is_empty());
        assert_eq!(stored.total_cost_per_person, Some(Rupees(9000)));
    }

    #[tokio::test]
    async fn test_booking_requires_trip() {
        let store = MemoryRecordStore::new();
        let orphan = BookingRecord::pending(
            "u",
            Uuid::new_v4(),
            "Goa",
            &BookingFormData::default(),
            Vec::new(),
        );
        assert!(store.insert_booking(orphan).await.is_err());
        assert!(store.bookings_for_user("u").await.unwrap().is_empty());
    }
}
