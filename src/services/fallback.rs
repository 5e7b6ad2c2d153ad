//! Built-in sample data served when the content-generation service is unavailable
//! and the planner was configured to degrade instead of failing.

use crate::types::{
    ApproxBudget, CostBreakdown, DestinationOption, DestinationResponse, ItineraryDay,
    ItineraryItem, ItineraryPlan, MustSee, Rupees, TravelMode, Weather,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    /// ~300-500 km
    Nearby,
    /// ~500-1000 km
    Moderate,
    /// ~1000-2000 km
    Far,
}

impl Distance {
    fn multiplier(self) -> f64 {
        match self {
            Distance::Nearby => 1.0,
            Distance::Moderate => 1.5,
            Distance::Far => 2.5,
        }
    }
}

/// Round-trip travel estimate per person for a travel mode and distance band.
pub fn transport_cost(mode: TravelMode, distance: Distance) -> Rupees {
    let base = match mode {
        TravelMode::Car => 2500,
        TravelMode::Train2A => 2800,
        TravelMode::Flight => 6000,
        TravelMode::Train3A | TravelMode::Bus => 1800,
    };
    Rupees(base).scale(distance.multiplier())
}

struct Sample {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    must_sees: [(&'static str, &'static str); 3],
    stay: u64,
    food: u64,
    distance: Distance,
    pros: [&'static str; 2],
    con: &'static str,
    best_months: &'static str,
    access: &'static str,
    time_to_cover: &'static str,
}

const SAMPLES: [Sample; 5] = [
    Sample {
        id: "goa",
        title: "Goa",
        description: "India's beach paradise with Portuguese heritage, long coastlines and lively nightlife, mixing rest and adventure.",
        must_sees: [
            ("Baga Beach", "Water sports, beach shacks and sunsets"),
            ("Old Goa Churches", "UNESCO-listed Portuguese architecture"),
            ("Dudhsagar Waterfalls", "Four-tiered waterfall inside dense forest"),
        ],
        stay: 9000,
        food: 4800,
        distance: Distance::Moderate,
        pros: ["Beaches with water sports", "Great food and nightlife"],
        con: "Crowded during peak season",
        best_months: "Nov-Feb",
        access: "2-3h flight from Delhi/Mumbai; well connected by road and rail",
        time_to_cover: "3-4 days for beaches, churches and waterfalls",
    },
    Sample {
        id: "manali",
        title: "Manali",
        description: "Himalayan hill station with snow peaks, adventure sports, old temples and quiet valleys.",
        must_sees: [
            ("Solang Valley", "Paragliding, zorbing and winter skiing"),
            ("Rohtang Pass", "High pass with wide snow views"),
            ("Hidimba Temple", "Wooden temple in a cedar forest"),
        ],
        stay: 10800,
        food: 4800,
        distance: Distance::Moderate,
        pros: ["Mountain scenery", "Adventure activities"],
        con: "Road journey is long",
        best_months: "Oct-Feb (snow), Apr-Jun (summer)",
        access: "14h drive from Delhi or 1h flight to Kullu + 2h drive",
        time_to_cover: "4-5 days for the valley, passes and activities",
    },
    Sample {
        id: "kerala",
        title: "Kerala Backwaters",
        description: "Calm backwaters, green hills, ayurvedic retreats and rich local culture.",
        must_sees: [
            ("Alleppey Houseboat", "Overnight cruise on a kettuvallam"),
            ("Munnar Tea Plantations", "Rolling tea gardens in cool air"),
            ("Periyar Wildlife Sanctuary", "Elephants in their natural habitat"),
        ],
        stay: 12000,
        food: 5200,
        distance: Distance::Far,
        pros: ["Houseboat stay", "Peaceful and restful"],
        con: "Humid in summer",
        best_months: "Sep-Mar",
        access: "2-3h flight to Kochi from major cities",
        time_to_cover: "4-5 days for backwaters, tea gardens and wildlife",
    },
    Sample {
        id: "rishikesh",
        title: "Rishikesh",
        description: "Yoga town in the Himalayan foothills on the Ganges, with rafting and spiritual retreats.",
        must_sees: [
            ("Laxman Jhula", "Suspension bridge over the river"),
            ("River Rafting", "White water runs on the Ganges"),
            ("Beatles Ashram", "Old meditation centre covered in murals"),
        ],
        stay: 7800,
        food: 4000,
        distance: Distance::Nearby,
        pros: ["Adventure and spirituality", "Easy on the budget"],
        con: "Very crowded during festivals",
        best_months: "Sep-Nov, Feb-May",
        access: "6-7h drive from Delhi or train to Haridwar + 1h taxi",
        time_to_cover: "2-3 days for the main sights",
    },
    Sample {
        id: "coorg",
        title: "Coorg",
        description: "Misty coffee estates, waterfalls and green hills for a slow nature break.",
        must_sees: [
            ("Abbey Falls", "Waterfall among coffee and spice estates"),
            ("Raja's Seat", "Sunset point over the valley"),
            ("Dubare Elephant Camp", "Elephant care and river activities"),
        ],
        stay: 9600,
        food: 4400,
        distance: Distance::Moderate,
        pros: ["Pleasant weather all year", "Coffee culture and local food"],
        con: "Little nightlife",
        best_months: "Oct-Mar",
        access: "5-6h drive from Bangalore or train to Mysore + 3h drive",
        time_to_cover: "3-4 days for estates, falls and viewpoints",
    },
];

impl Sample {
    fn to_option(&self, mode: TravelMode) -> DestinationOption {
        let transport = transport_cost(mode, self.distance);
        let breakdown: CostBreakdown = [
            ("stay", Rupees(self.stay)),
            ("food", Rupees(self.food)),
            ("transport", transport),
        ]
        .into_iter()
        .collect();

        DestinationOption {
            id: self.id.to_string(),
            title: self.title.to_string(),
            country: Some("India".to_string()),
            short_description: self.description.to_string(),
            weather: Weather::default(),
            must_sees: self
                .must_sees
                .iter()
                .map(|(name, reason)| MustSee {
                    name: name.to_string(),
                    reason: reason.to_string(),
                    video_link: Some(MustSee::search_link(self.title, name)),
                })
                .collect(),
            approx_budget: ApproxBudget {
                total_per_person: breakdown.sum(),
                breakdown,
            },
            pros: self.pros.iter().map(|p| p.to_string()).collect(),
            con: self.con.to_string(),
            best_months: self.best_months.to_string(),
            accessibility_note: self.access.to_string(),
            travel_time_from_origin: None,
            estimated_time_to_cover: self.time_to_cover.to_string(),
            hidden_gem: None,
        }
    }
}

/// Five well-known domestic destinations priced for `mode`.
pub fn sample_destinations(mode: TravelMode) -> DestinationResponse {
    DestinationResponse {
        destinations: SAMPLES.iter().map(|sample| sample.to_option(mode)).collect(),
        note: Some("Sample destinations shown while live suggestions are unavailable".to_string()),
    }
}

/// A generic three-day beach itinerary.
pub fn sample_itinerary() -> ItineraryPlan {
    let make_day = |day, title: &str, items: Vec<ItineraryItem>, transit, cost| ItineraryDay {
        day,
        title: title.to_string(),
        items,
        total_transit_hours: transit,
        estimated_cost_per_person: Rupees(cost),
    };

    ItineraryPlan {
        itinerary: vec![
            make_day(
                1,
                "Arrival & Beach Relaxation",
                vec![
                    ItineraryItem::new("10:00", "Arrive at destination airport", "~4h", true),
                    ItineraryItem::new("14:00", "Check-in at beachfront resort", "1h", false),
                    ItineraryItem::new("16:00", "Relax at the beach and watch sunset", "3h", false),
                    ItineraryItem::new("19:30", "Dinner at local seafood restaurant", "1.5h", false),
                ],
                4.0,
                2800,
            ),
            make_day(
                2,
                "Local Exploration",
                vec![
                    ItineraryItem::new("09:00", "Breakfast at hotel", "1h", false),
                    ItineraryItem::new("10:30", "Visit famous temple (30 min drive)", "2h", true),
                    ItineraryItem::new("13:00", "Lunch at local restaurant", "1h", false),
                    ItineraryItem::new("15:00", "Beach water sports activities", "3h", false),
                    ItineraryItem::new("19:00", "Evening market walk and dinner", "2h", false),
                ],
                0.5,
                3200,
            ),
            make_day(
                3,
                "Return Journey & Departure",
                vec![
                    ItineraryItem::new("08:00", "Breakfast and hotel checkout", "1h", false),
                    ItineraryItem::new("09:30", "Last minute shopping at the local market", "1.5h", false),
                    ItineraryItem::new("11:30", "Transfer to airport/station", "1h", true),
                    ItineraryItem::new("13:00", "Depart to starting location", "3-4h", true),
                    ItineraryItem::new("17:00", "Arrive back home", "~", true),
                ],
                5.0,
                2500,
            ),
        ],
        total_estimated_cost_per_person: Rupees(8500),
        summary_message: None,
    }
}
