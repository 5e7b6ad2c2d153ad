use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::money::Rupees;

/// Day-by-day plan for a selected destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryPlan {
    /// Days in travel order, day 1 being the outbound journey
    pub itinerary: Vec<ItineraryDay>,
    /// Whole-trip cost per person
    #[serde(default)]
    pub total_estimated_cost_per_person: Rupees,
    /// Closing line shown under the plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_message: Option<String>,
}

impl ItineraryPlan {
    pub fn days(&self) -> usize {
        self.itinerary.len()
    }

    /// Sum of the per-day estimates.
    pub fn day_cost_sum(&self) -> Rupees {
        self.itinerary
            .iter()
            .map(|day| day.estimated_cost_per_person)
            .sum()
    }

    pub fn total_transit_hours(&self) -> f64 {
        self.itinerary.iter().map(|day| day.total_transit_hours).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryDay {
    /// 1-based day counter
    pub day: u32,
    #[serde(default)]
    pub title: String,
    /// Activity blocks in chronological order
    #[serde(default)]
    pub items: Vec<ItineraryItem>,
    /// Hours spent in transit on this day
    #[serde(default)]
    pub total_transit_hours: f64,
    #[serde(default)]
    pub estimated_cost_per_person: Rupees,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryItem {
    /// Clock time such as "09:00"
    #[serde(default)]
    pub time: String,
    pub activity: String,
    /// e.g. "2h", "30min"
    #[serde(default)]
    pub duration: String,
    /// True for travel or commute blocks
    #[serde(default)]
    pub transit: bool,
}

impl ItineraryItem {
    pub fn new(
        time: impl Into<String>,
        activity: impl Into<String>,
        duration: impl Into<String>,
        transit: bool,
    ) -> Self {
        Self {
            time: time.into(),
            activity: activity.into(),
            duration: duration.into(),
            transit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_totals() {
        let plan: ItineraryPlan = serde_json::from_value(json!({
            "itinerary": [
                {"day": 1, "title": "Arrive", "items": [
                    {"time": "08:00", "activity": "Drive up", "duration": "5h", "transit": true}
                ], "total_transit_hours": 5, "estimated_cost_per_person": 3500},
                {"day": 2, "title": "Explore", "total_transit_hours": 1.5, "estimated_cost_per_person": "2,000"}
            ],
            "total_estimated_cost_per_person": 5500
        }))
        .unwrap();

        assert_eq!(plan.days(), 2);
        assert_eq!(plan.day_cost_sum(), Rupees(5500));
        assert!((plan.total_transit_hours() - 6.5).abs() < f64::EPSILON);
        assert!(plan.itinerary[1].items.is_empty());
        assert!(plan.summary_message.is_none());
    }
}
