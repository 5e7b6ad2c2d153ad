use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::money::Rupees;

/// Hotel suggestion attached to a booking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HotelOption {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// e.g. "4-Star"
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub price_per_night: Rupees,
    /// Out of 5
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub booking_link: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HotelRecommendations {
    pub hotels: Vec<HotelOption>,
    #[serde(default)]
    pub message: String,
}

impl HotelRecommendations {
    /// Mean nightly price, or `None` without hotels.
    pub fn average_price(&self) -> Option<f64> {
        if self.hotels.is_empty() {
            return None;
        }
        let total: u64 = self.hotels.iter().map(|hotel| hotel.price_per_night.get()).sum();
        Some(total as f64 / self.hotels.len() as f64)
    }
}

/// Booking.com search link for a destination.
pub fn booking_search_link(destination: &str) -> String {
    let encoded: String = destination
        .trim()
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (byte as char).to_string()
            }
            _ => format!("%{byte:02X}"),
        })
        .collect();
    format!("https://www.booking.com/search?ss={encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_average_price() {
        let recs: HotelRecommendations = serde_json::from_value(json!({
            "hotels": [
                {"name": "Snow Valley Resort", "price_per_night": 4000, "rating": 4.3},
                {"name": "Apple Country", "price_per_night": "5,000"}
            ],
            "message": "Found 2 hotels"
        }))
        .unwrap();

        assert_eq!(recs.average_price(), Some(4500.0));
        assert_eq!(HotelRecommendations::default().average_price(), None);
    }

    #[test]
    fn test_booking_link_encoding() {
        assert_eq!(
            booking_search_link("Old Manali"),
            "https://www.booking.com/search?ss=Old%20Manali"
        );
    }
}
