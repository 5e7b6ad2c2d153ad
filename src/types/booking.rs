use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

labeled_enum! {
    /// Hotel star category requested for the booking.
    pub enum RoomTier {
        ThreeStar => "3-star" | "3 star" | "3",
        FourStar => "4-star" | "4 star" | "4",
        FiveStar => "5-star" | "5 star" | "5",
    }
}

impl RoomTier {
    /// Star count as a string, e.g. "4".
    pub fn stars(self) -> &'static str {
        match self {
            RoomTier::ThreeStar => "3",
            RoomTier::FourStar => "4",
            RoomTier::FiveStar => "5",
        }
    }

    /// Price multiplier applied to the average hotel rate in cost estimates.
    pub fn price_multiplier(self) -> f64 {
        match self {
            RoomTier::ThreeStar => 1.0,
            RoomTier::FourStar => 1.5,
            RoomTier::FiveStar => 2.0,
        }
    }
}

labeled_enum! {
    pub enum VehicleTier {
        SmallCar => "small-car" | "Small Car",
        BigCar => "big-car" | "Big Car" | "SUV",
        Tempo => "tempo" | "Tempo Traveller",
    }
}

labeled_enum! {
    /// Counters on the booking form that can be stepped up or down.
    pub enum BookingCounter {
        Adults => "adults",
        Children => "children",
        Seniors => "seniors",
        Hotels => "numberOfHotels" | "hotels",
        Rooms => "numberOfRooms" | "rooms",
        Cars => "numberOfCars" | "cars",
    }
}

impl BookingCounter {
    /// Lowest value the counter may take.
    pub fn floor(self) -> u32 {
        match self {
            BookingCounter::Adults | BookingCounter::Children | BookingCounter::Seniors => 0,
            BookingCounter::Hotels | BookingCounter::Rooms | BookingCounter::Cars => 1,
        }
    }
}

/// Booking details collected from the traveler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFormData {
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub seniors: u32,
    pub number_of_hotels: u32,
    pub number_of_rooms: u32,
    pub number_of_cars: u32,
    pub room_type: RoomTier,
    pub vehicle_type: VehicleTier,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub has_pets: bool,
}

impl Default for BookingFormData {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            seniors: 0,
            number_of_hotels: 1,
            number_of_rooms: 1,
            number_of_cars: 1,
            room_type: RoomTier::FourStar,
            vehicle_type: VehicleTier::SmallCar,
            special_requests: String::new(),
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            has_pets: false,
        }
    }
}

/// Headcount across the three traveler counters, widened so it cannot overflow.
pub fn guest_total(adults: u32, children: u32, seniors: u32) -> u64 {
    u64::from(adults) + u64::from(children) + u64::from(seniors)
}

impl BookingFormData {
    pub fn total_guests(&self) -> u64 {
        guest_total(self.adults, self.children, self.seniors)
    }

    pub fn counter(&self, counter: BookingCounter) -> u32 {
        match counter {
            BookingCounter::Adults => self.adults,
            BookingCounter::Children => self.children,
            BookingCounter::Seniors => self.seniors,
            BookingCounter::Hotels => self.number_of_hotels,
            BookingCounter::Rooms => self.number_of_rooms,
            BookingCounter::Cars => self.number_of_cars,
        }
    }

    /// Step a counter by `delta`, never going below its floor.
    pub fn adjust(&mut self, counter: BookingCounter, delta: i32) -> u32 {
        let current = i64::from(self.counter(counter));
        let next = (current + i64::from(delta)).max(i64::from(counter.floor()));
        let next = u32::try_from(next).unwrap_or(u32::MAX);
        let slot = match counter {
            BookingCounter::Adults => &mut self.adults,
            BookingCounter::Children => &mut self.children,
            BookingCounter::Seniors => &mut self.seniors,
            BookingCounter::Hotels => &mut self.number_of_hotels,
            BookingCounter::Rooms => &mut self.number_of_rooms,
            BookingCounter::Cars => &mut self.number_of_cars,
        };
        *slot = next;
        next
    }

    /// Guards checked before a booking can be reviewed or submitted.
    pub fn check_submittable(&self) -> Result<()> {
        if self.customer_name.trim().is_empty()
            || self.customer_email.trim().is_empty()
            || self.customer_phone.trim().is_empty()
        {
            return Err(PlannerError::Booking(
                "Please fill in all customer details".to_string(),
            ));
        }
        if self.adults == 0 {
            return Err(PlannerError::Booking(
                "At least one adult is required".to_string(),
            ));
        }
        Ok(())
    }

    /// One-line guest summary, e.g. "2 adults, 1 children (Total: 3 people)".
    pub fn guest_summary(&self) -> String {
        let mut summary = format!("{} adults", self.adults);
        if self.children > 0 {
            summary.push_str(&format!(", {} children", self.children));
        }
        if self.seniors > 0 {
            summary.push_str(&format!(", {} seniors", self.seniors));
        }
        summary.push_str(&format!(" (Total: {} people)", self.total_guests()));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BookingFormData {
        BookingFormData {
            customer_name: "Asha Rao".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "+91 98765 43210".to_string(),
            ..BookingFormData::default()
        }
    }

    #[test]
    fn test_counters_clamp_at_floor() {
        let mut form = BookingFormData::default();
        assert_eq!(form.adjust(BookingCounter::Children, -1), 0);
        assert_eq!(form.adjust(BookingCounter::Hotels, -3), 1);
        assert_eq!(form.adjust(BookingCounter::Cars, 2), 3);
        assert_eq!(form.adjust(BookingCounter::Adults, -1), 0);
    }

    #[test]
    fn test_submittable_guards() {
        assert!(filled().check_submittable().is_ok());

        let mut blank_phone = filled();
        blank_phone.customer_phone = "   ".to_string();
        let err = blank_phone.check_submittable().unwrap_err();
        assert_eq!(err.to_string(), "Booking error: Please fill in all customer details");

        let mut no_adults = filled();
        no_adults.adults = 0;
        no_adults.children = 2;
        let err = no_adults.check_submittable().unwrap_err();
        assert!(err.to_string().contains("At least one adult is required"));
    }

    #[test]
    fn test_total_guests_does_not_wrap() {
        let form = BookingFormData {
            adults: u32::MAX,
            children: 1,
            seniors: u32::MAX,
            ..BookingFormData::default()
        };
        assert_eq!(form.total_guests(), 2 * u64::from(u32::MAX) + 1);
        assert!(form
            .guest_summary()
            .ends_with(&format!("(Total: {} people)", 2 * u64::from(u32::MAX) + 1)));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(filled()).unwrap();
        assert_eq!(json["numberOfHotels"], 1);
        assert_eq!(json["roomType"], "4-star");
        assert_eq!(json["vehicleType"], "small-car");
        assert_eq!(json["hasPets"], false);
    }

    #[test]
    fn test_guest_summary() {
        let mut form = filled();
        form.adults = 2;
        form.seniors = 1;
        assert_eq!(form.guest_summary(), "2 adults, 1 seniors (Total: 3 people)");
    }
}
