use serde::Serialize;

use crate::types::{
    BookingFormData, HotelRecommendations, ItineraryPlan, Rupees, TravelMode, VehicleTier,
};

const DEFAULT_NIGHTLY_RATE: f64 = 3000.0;
const FOOD_PER_GUEST_PER_DAY: u64 = 800;
const SERVICE_MARKUP: f64 = 0.15;

/// Whole-party cost estimate shown before a booking is handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostEstimate {
    pub days: u64,
    pub guests: u64,
    pub hotels: Rupees,
    pub vehicles: Rupees,
    pub travel: Rupees,
    pub food: Rupees,
    pub activities: Rupees,
    pub subtotal: Rupees,
    pub markup: Rupees,
    pub total: Rupees,
}

fn vehicle_rate(vehicle: VehicleTier) -> u64 {
    match vehicle {
        VehicleTier::SmallCar => 2000,
        VehicleTier::BigCar => 3500,
        VehicleTier::Tempo => 5000,
    }
}

/// Intercity travel for the whole party.
fn travel_cost(mode: TravelMode, guests: u64) -> u64 {
    match mode {
        TravelMode::Flight => guests.saturating_mul(8000),
        TravelMode::Train3A => guests.saturating_mul(2500),
        TravelMode::Train2A => guests.saturating_mul(3500),
        TravelMode::Car => 5000,
        TravelMode::Bus => 0,
    }
}

pub fn estimate_booking_cost(
    hotels: &HotelRecommendations,
    booking: &BookingFormData,
    itinerary: &ItineraryPlan,
    mode: TravelMode,
) -> CostEstimate {
    let days = itinerary.days() as u64;
    let guests = booking.total_guests();

    let nightly = hotels.average_price().unwrap_or(DEFAULT_NIGHTLY_RATE);
    let hotel_cost = Rupees(
        (nightly
            * booking.room_type.price_multiplier()
            * f64::from(booking.number_of_hotels)
            * days as f64)
            .round() as u64,
    );
    let vehicles =
        Rupees(vehicle_rate(booking.vehicle_type)) * (u64::from(booking.number_of_cars) * days);
    let travel = Rupees(travel_cost(mode, guests));
    let food = Rupees(FOOD_PER_GUEST_PER_DAY) * guests.saturating_mul(days);
    let activities = itinerary.day_cost_sum() * guests;

    let subtotal = hotel_cost + vehicles + travel + food + activities;
    let markup = subtotal.scale(SERVICE_MARKUP);

    CostEstimate {
        days,
        guests,
        hotels: hotel_cost,
        vehicles,
        travel,
        food,
        activities,
        subtotal,
        markup,
        total: subtotal + markup,
    }
}
