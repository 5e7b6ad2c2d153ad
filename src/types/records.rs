//! Rows persisted in the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    booking::{BookingFormData, RoomTier, VehicleTier},
    destination::DestinationOption,
    hotel::HotelOption,
    itinerary::{ItineraryDay, ItineraryPlan},
    money::Rupees,
    trip::TripFormData,
};

/// Trip row as submitted, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    pub user_id: String,
    pub user_session_id: String,
    pub start_location: String,
    pub month: String,
    pub travelers: u32,
    pub group_type: String,
    pub domestic_or_intl: String,
    pub theme: Vec<String>,
    pub mood: String,
    pub budget: String,
    pub flexible_dates: bool,
    pub travel_mode: String,
}

impl NewTrip {
    pub fn from_form(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        form: &TripFormData,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_session_id: session_id.into(),
            start_location: form.start_location.clone(),
            month: form.month.clone(),
            travelers: form.travelers,
            group_type: form.group_type.clone(),
            domestic_or_intl: form.domestic_or_intl.clone(),
            theme: form.theme.clone(),
            mood: form.mood.clone(),
            budget: form.budget.clone(),
            flexible_dates: form.flexible_dates,
            travel_mode: form.travel_mode.clone(),
        }
    }

    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> TripRecord {
        TripRecord {
            id,
            user_id: self.user_id,
            user_session_id: self.user_session_id,
            start_location: self.start_location,
            month: self.month,
            travelers: self.travelers,
            group_type: self.group_type,
            domestic_or_intl: self.domestic_or_intl,
            theme: self.theme,
            mood: self.mood,
            budget: self.budget,
            flexible_dates: self.flexible_dates,
            travel_mode: self.travel_mode,
            selected_destination: None,
            days: None,
            created_at,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: Uuid,
    pub user_id: String,
    #[serde(default)]
    pub user_session_id: String,
    #[serde(default)]
    pub start_location: String,
    pub month: String,
    pub travelers: u32,
    pub group_type: String,
    pub domestic_or_intl: String,
    #[serde(default)]
    pub theme: Vec<String>,
    #[serde(default)]
    pub mood: String,
    pub budget: String,
    #[serde(default)]
    pub flexible_dates: bool,
    #[serde(default)]
    pub travel_mode: String,
    #[serde(default)]
    pub selected_destination: Option<DestinationOption>,
    #[serde(default)]
    pub days: Option<u32>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TripRecord {
    /// Rebuild the form the trip was planned from.
    pub fn form(&self) -> TripFormData {
        TripFormData {
            start_location: self.start_location.clone(),
            month: self.month.clone(),
            travelers: self.travelers,
            group_type: self.group_type.clone(),
            domestic_or_intl: self.domestic_or_intl.clone(),
            theme: self.theme.clone(),
            mood: self.mood.clone(),
            budget: self.budget.clone(),
            flexible_dates: self.flexible_dates,
            travel_mode: self.travel_mode.clone(),
            days: self.days.unwrap_or(TripFormData::default().days),
        }
    }
}

/// Itinerary row; at most one per trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRecord {
    pub trip_id: Uuid,
    #[serde(default)]
    pub destination_options: Vec<DestinationOption>,
    #[serde(default)]
    pub daily_plan: Vec<ItineraryDay>,
    #[serde(default)]
    pub total_cost_per_person: Option<Rupees>,
}

impl ItineraryRecord {
    pub fn new(trip_id: Uuid, destination_options: Vec<DestinationOption>) -> Self {
        Self {
            trip_id,
            destination_options,
            daily_plan: Vec::new(),
            total_cost_per_person: None,
        }
    }

    pub fn with_plan(mut self, plan: &ItineraryPlan) -> Self {
        self.daily_plan = plan.itinerary.clone();
        self.total_cost_per_person = Some(plan.total_estimated_cost_per_person);
        self
    }

    /// The stored plan, if a day plan has been generated.
    pub fn plan(&self) -> Option<ItineraryPlan> {
        if self.daily_plan.is_empty() {
            return None;
        }
        Some(ItineraryPlan {
            itinerary: self.daily_plan.clone(),
            total_estimated_cost_per_person: self.total_cost_per_person.unwrap_or_default(),
            summary_message: None,
        })
    }
}

/// A trip with a chosen destination, joined with its itinerary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTrip {
    #[serde(flatten)]
    pub trip: TripRecord,
    pub itinerary: Option<ItineraryRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Booking request handed to the fulfillment team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub user_id: String,
    pub trip_id: Uuid,
    pub destination_name: String,
    pub adults: u32,
    pub children: u32,
    pub seniors: u32,
    pub number_of_hotels: u32,
    pub number_of_rooms: u32,
    pub number_of_cars: u32,
    pub room_type: RoomTier,
    pub vehicle_type: VehicleTier,
    #[serde(default)]
    pub special_requests: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default)]
    pub has_pets: bool,
    #[serde(default)]
    pub hotel_options: Vec<HotelOption>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn pending(
        user_id: impl Into<String>,
        trip_id: Uuid,
        destination_name: impl Into<String>,
        form: &BookingFormData,
        hotel_options: Vec<HotelOption>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            trip_id,
            destination_name: destination_name.into(),
            adults: form.adults,
            children: form.children,
            seniors: form.seniors,
            number_of_hotels: form.number_of_hotels,
            number_of_rooms: form.number_of_rooms,
            number_of_cars: form.number_of_cars,
            room_type: form.room_type,
            vehicle_type: form.vehicle_type,
            special_requests: form.special_requests.clone(),
            customer_name: form.customer_name.trim().to_string(),
            customer_email: form.customer_email.trim().to_string(),
            customer_phone: form.customer_phone.trim().to_string(),
            has_pets: form.has_pets,
            hotel_options,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_record_is_pending_and_trimmed() {
        let form = BookingFormData {
            customer_name: " Asha ".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "98765".to_string(),
            ..BookingFormData::default()
        };
        let record = BookingRecord::pending("user-1", Uuid::new_v4(), "Goa", &form, Vec::new());

        assert_eq!(record.status, BookingStatus::Pending);
        assert_eq!(record.customer_name, "Asha");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["room_type"], "4-star");
        assert_eq!(json["number_of_rooms"], 1);
    }

    #[test]
    fn test_trip_round_trips_form_fields() {
        let form = TripFormData {
            start_location: "Pune".to_string(),
            month: "Oct".to_string(),
            theme: vec!["Beach".to_string()],
            budget: "Luxury (₹50k+)".to_string(),
            days: 5,
            ..TripFormData::default()
        };
        let mut record = NewTrip::from_form("u", "s", &form).into_record(Uuid::new_v4(), Utc::now());
        record.days = Some(5);

        assert_eq!(record.form(), form);
        assert!(record.selected_destination.is_none());
    }
}
