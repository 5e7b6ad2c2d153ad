//! Prompt templates for destinations, itineraries and hotels.

use std::fmt::Write as _;

use crate::types::{
    booking_search_link, BookingFormData, BudgetBand, GroupType, Mood, Rupees, TravelMode,
    TravelScope, TripPreferences,
};

use super::generator::GenerationRequest;

const DESTINATION_SYSTEM_PROMPT: &str = "You are a travel concierge for travelers based in India. \
Recommend destinations the traveler can actually enjoy within their budget. \
The budget ceiling is a hard limit: never return a destination whose total cost per person exceeds it. \
Respect the requested travel scope strictly and match hotel tiers to the budget band. \
Do not invent hard facts such as exact fares or hotel names. \
For videos use YouTube search URLs only. \
Return only a single JSON object.";

const ITINERARY_SYSTEM_PROMPT: &str = "You are a travel planner who builds realistic day-by-day itineraries \
for travelers in India and abroad. Balance enjoyment against budget, mood, trip length and mode of transport. \
Give every day a timed schedule of activity blocks and mark travel blocks as transit. \
Return only a single JSON object.";

const HOTEL_SYSTEM_PROMPT: &str = "You recommend hotels that exist at the requested destination and match \
the requested star category and trip budget. Return only a single JSON object.";

pub const ITINERARY_SUMMARY: &str =
    "This is the best itinerary curated for your preferences and current travel conditions.";

/// System and user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::json(self.system.clone(), self.user.clone())
    }
}

/// Destination prompt plus the ceiling its results are validated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPrompt {
    pub system: String,
    pub user: String,
    pub ceiling: Rupees,
}

impl DestinationPrompt {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::json(self.system.clone(), self.user.clone())
    }
}

fn scope_rule(scope: TravelScope) -> &'static str {
    match scope {
        TravelScope::National => "Pick only destinations within India.",
        TravelScope::International => {
            "Pick foreign destinations reachable from India by direct or short flights (6-8 hours preferred). \
Prefer visa-on-arrival or easy tourist visa countries for Indians such as Thailand, Dubai, Bali, Sri Lanka, Maldives, Nepal or Bhutan."
        }
    }
}

fn duration_rule(days: u32) -> &'static str {
    if days <= 3 {
        "Short trip: choose nearby destinations only, at most 5-6 hours door to door from the origin."
    } else {
        "Longer distances are fine if transit still leaves at least 60% of the trip for sightseeing."
    }
}

fn mood_transit_target(mood: Mood) -> &'static str {
    match mood {
        Mood::Relaxing => "at most 15% of daytime; cluster sights and leave downtime",
        Mood::Exploring => "up to 35% of daytime; day trips and more movement are fine",
        Mood::Party => "minimal; favor nightlife districts with short transfers",
        Mood::Cultural => "up to 25% of daytime for heritage and cultural sites",
    }
}

fn mood_focus(mood: Mood) -> &'static str {
    match mood {
        Mood::Relaxing => "peaceful retreats, nature, lakes or spa towns",
        Mood::Exploring => "culturally and naturally diverse places",
        Mood::Party => "beach or city nightlife",
        Mood::Cultural => "heritage, temples, old cities and local traditions",
    }
}

fn group_focus(group: GroupType) -> &'static str {
    match group {
        GroupType::Family => "safe, clean, kid-friendly places with convenient stays and easy logistics",
        GroupType::Couple => "romantic, scenic and calm places with good viewpoints",
        GroupType::Group => "adventure or mixed-activity places with social spots",
        GroupType::Bachelors | GroupType::Solo => "adventure, nightlife or backpacking spots",
    }
}

fn range(band: (Rupees, Rupees)) -> String {
    format!("{}-{}", band.0, band.1)
}

/// Destination prompt for validated preferences.
pub fn build_destination_prompt(prefs: &TripPreferences) -> DestinationPrompt {
    let ceiling = prefs.ceiling();
    let hotel = prefs.budget.hotel_rate(prefs.scope);
    let food = prefs.budget.food_per_day();
    let days = u64::from(prefs.days);
    let nights = days.saturating_sub(1).max(1);
    let scope = match prefs.scope {
        TravelScope::National => "National",
        TravelScope::International => "International",
    };

    let mut user = String::new();
    let _ = writeln!(user, "TRAVELER INPUTS:");
    let _ = writeln!(user, "- origin_city: {}", prefs.start_location);
    let _ = writeln!(user, "- travel_month: {}", prefs.month);
    let _ = writeln!(user, "- duration_days: {}", prefs.days);
    let _ = writeln!(user, "- travelers: {}", prefs.travelers);
    let _ = writeln!(user, "- travel_type: {}", prefs.group_type);
    let _ = writeln!(user, "- preferred_destination_type: {}", prefs.theme_list());
    let _ = writeln!(user, "- mood: {}", prefs.mood);
    let _ = writeln!(user, "- travel_scope: {scope}");
    let _ = writeln!(user, "- travel_mode: {}", prefs.travel_mode);
    let _ = writeln!(
        user,
        "- budget_in_inr_max: ₹{} per person ({}), an absolute maximum",
        ceiling.get(),
        prefs.budget.range_label()
    );
    user.push('\n');

    let _ = writeln!(user, "OBJECTIVE:");
    let _ = writeln!(
        user,
        "Return up to 5 destinations that fit, ranked by fit. Budget and scope come first, then mood, duration, distance from origin and destination type."
    );
    user.push('\n');

    let _ = writeln!(user, "BUDGET:");
    let _ = writeln!(user, "- Hotel tier: {}/night", range(hotel));
    let _ = writeln!(
        user,
        "- Stay: {}/night x {} nights = {} to {}",
        range(hotel),
        nights,
        hotel.0 * nights,
        hotel.1 * nights
    );
    let _ = writeln!(
        user,
        "- Food: {}/day x {} days = {} to {}",
        range(food),
        days,
        food.0 * days,
        food.1 * days
    );
    let _ = writeln!(
        user,
        "- Transport: {} from {}, return included",
        prefs.travel_mode, prefs.start_location
    );
    let _ = writeln!(user, "- Activities: entry fees and tours");
    let _ = writeln!(
        user,
        "- total_per_person must equal the sum of the breakdown and be at most ₹{}. Leave out anything over.",
        ceiling.get()
    );
    user.push('\n');

    let _ = writeln!(user, "RULES:");
    let _ = writeln!(user, "- Scope: {}", scope_rule(prefs.scope));
    let _ = writeln!(user, "- Duration: {}", duration_rule(prefs.days));
    let _ = writeln!(
        user,
        "- Mood: favor {}. Daily transit target: {}.",
        mood_focus(prefs.mood),
        mood_transit_target(prefs.mood)
    );
    let _ = writeln!(user, "- Travel type: favor {}.", group_focus(prefs.group_type));
    let _ = writeln!(
        user,
        "- Destination type: match the dominant character to {}.",
        prefs.theme_list()
    );
    let _ = writeln!(
        user,
        "- Weather: give the typical temperature range and condition for {} and avoid unsafe weather.",
        prefs.month
    );
    let _ = writeln!(
        user,
        "- Exactly 3 must-see spots, each with a one-line reason and a link of the form https://www.youtube.com/results?search_query=Destination+Spot"
    );
    let _ = writeln!(
        user,
        "- Mark at least one underrated nearby option with \"hidden_gem\": true if one fits."
    );
    if prefs.flexible_dates {
        let _ = writeln!(user, "- Dates are flexible; mention a better month in best_months if relevant.");
    }
    user.push('\n');

    let _ = writeln!(user, "If nothing fits, return {{\"destinations\": [], \"note\": \"{}\"}}", no_results_hint(prefs));
    user.push('\n');

    let _ = writeln!(user, "RETURN ONLY VALID JSON:");
    let _ = write!(
        user,
        r#"{{
  "destinations": [
    {{
      "id": "unique-id",
      "title": "Destination Name",
      "country": "Country Name",
      "short_description": "Why this place suits this traveler",
      "weather": {{"temperature_range": "15-25°C", "condition": "sunny"}},
      "must_sees": [
        {{"name": "Spot", "reason": "One line", "video_link": "https://www.youtube.com/results?search_query=Destination+Spot"}}
      ],
      "approx_budget": {{
        "total_per_person": 0,
        "breakdown": {{"stay": 0, "food": 0, "transport": 0, "activities": 0}}
      }},
      "pros": ["Advantage", "Advantage"],
      "con": "One drawback",
      "best_months": "Month range",
      "travel_time_from_origin": "Hours and mode from {origin}",
      "accessibility_note": "How to reach from {origin}",
      "estimated_time_to_cover": "Days recommended",
      "hidden_gem": false
    }}
  ]
}}"#,
        origin = prefs.start_location
    );

    DestinationPrompt {
        system: DESTINATION_SYSTEM_PROMPT.to_string(),
        user,
        ceiling,
    }
}

/// Short version of the no-results advice embedded in the destination prompt.
fn no_results_hint(prefs: &TripPreferences) -> String {
    let alternative = match prefs.scope {
        TravelScope::National => "nearby India destinations",
        TravelScope::International => "domestic travel",
    };
    format!(
        "No destinations within ₹{}. Try: increase budget to ₹{}, reduce to {} days, or switch to {}.",
        prefs.ceiling().get(),
        raised_budget(prefs.ceiling()).get(),
        shortened_days(prefs.days),
        alternative
    )
}

/// Budget worth suggesting when nothing fits: half as much again, rounded up.
pub fn raised_budget(ceiling: Rupees) -> Rupees {
    Rupees(ceiling.get().saturating_mul(3).div_ceil(2))
}

/// Trip length worth suggesting when nothing fits.
pub fn shortened_days(days: u32) -> u32 {
    days.saturating_sub(1).max(2)
}

fn itinerary_mood_rules(mood: Mood) -> &'static str {
    match mood {
        Mood::Relaxing => "Relaxing: short commutes, at most 2-3 hours of local travel a day, scenic stays, spa and downtime.",
        Mood::Exploring => "Exploring: more movement is fine, include day trips and 5-7 varied activities a day.",
        Mood::Cultural => "Cultural: temples, museums, old towns, local cuisine, workshops or cooking classes.",
        Mood::Party => "Party: late starts around 11 AM, nightlife zones, beach clubs and lively markets, days ending past midnight.",
    }
}

fn itinerary_budget_rules(band: BudgetBand) -> String {
    let (low, high) = band.daily_spend();
    let style = match band {
        BudgetBand::BudgetFriendly => {
            "homestays or budget hotels, public transport, street food, 1-2 paid activities"
        }
        BudgetBand::MidRange => {
            "comfortable 3-star hotels, trains or economy flights, guided tours, 2-3 key experiences"
        }
        BudgetBand::Luxury => {
            "premium 4-5 star resorts, private cabs, fine dining, luxury or adventure experiences"
        }
    };
    format!("{style}. Daily cost {low}-{high} per person.")
}

fn itinerary_mode_rules(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Car => "Car: flexible scenic drive with fuel stops and viewpoints along the way.",
        TravelMode::Train3A | TravelMode::Train2A => {
            "Train: include station transfers and meal stops, and plan overnight journeys where they fit."
        }
        TravelMode::Flight => {
            "Flight: include airport transfers and 2-3 hours of check-in and arrival buffer."
        }
        TravelMode::Bus => "Bus: include depot transfers and rest stops; prefer overnight services for long legs.",
    }
}

fn itinerary_group_rules(group: GroupType) -> &'static str {
    match group {
        GroupType::Family => "Family: easy sightseeing, comfortable stays, child-safe options at a gentle pace.",
        GroupType::Couple => "Couple: romantic dining, sunsets and scenic drives.",
        GroupType::Group => "Group: shared adventures, bonfires and group-friendly venues.",
        GroupType::Bachelors | GroupType::Solo => {
            "Bachelors or solo: adventure sports, nightlife and social activities."
        }
    }
}

/// Itinerary prompt for a chosen destination.
pub fn build_itinerary_prompt(prefs: &TripPreferences, destination: &str) -> Prompt {
    let days = prefs.days;
    let origin = &prefs.start_location;

    let mut user = String::new();
    let _ = writeln!(user, "TRAVELER INPUTS:");
    let _ = writeln!(user, "- month_of_travel: {}", prefs.month);
    let _ = writeln!(user, "- destination_from: {origin}");
    let _ = writeln!(user, "- destination_to: {destination}");
    let _ = writeln!(user, "- budget_in_inr: {}", prefs.budget);
    let _ = writeln!(user, "- type_of_travel: {}", prefs.group_type);
    let _ = writeln!(user, "- preferred_destination_type: {}", prefs.theme_list());
    let _ = writeln!(user, "- mood: {}", prefs.mood);
    let _ = writeln!(user, "- how_to_travel: {}", prefs.travel_mode);
    let _ = writeln!(user, "- duration_days: {days}");
    user.push('\n');

    let _ = writeln!(user, "RULES:");
    let _ = writeln!(user, "- {}", itinerary_mood_rules(prefs.mood));
    let _ = writeln!(user, "- Budget: {}", itinerary_budget_rules(prefs.budget));
    let _ = writeln!(user, "- {}", itinerary_mode_rules(prefs.travel_mode));
    let _ = writeln!(user, "- {}", itinerary_group_rules(prefs.group_type));
    let _ = writeln!(
        user,
        "- Season: include activities that suit {} and skip anything off-season.",
        prefs.month
    );
    user.push('\n');

    let _ = writeln!(user, "STRUCTURE:");
    if days == 1 {
        let _ = writeln!(
            user,
            "- Day 1: travel from {origin} to {destination}, sightsee, and return the same day."
        );
    } else {
        let _ = writeln!(
            user,
            "- Day 1: journey from {origin} to {destination} by {}, check-in, light evening plans.",
            prefs.travel_mode
        );
        if days > 2 {
            let _ = writeln!(
                user,
                "- Days 2 to {}: full days at {destination} with morning, afternoon and evening blocks and meal breaks.",
                days - 1
            );
        }
        let _ = writeln!(
            user,
            "- Day {days}: morning activity, checkout, and return from {destination} to {origin}."
        );
    }
    let _ = writeln!(
        user,
        "- Every item has a clock time (\"09:00\"), an activity, a duration (\"2h\", \"30min\") and transit true for travel blocks."
    );
    let _ = writeln!(
        user,
        "- Each day lists total_transit_hours and estimated_cost_per_person in INR; total_estimated_cost_per_person is their sum."
    );
    user.push('\n');

    let _ = writeln!(user, "RETURN ONLY VALID JSON:");
    let _ = write!(
        user,
        r#"{{
  "itinerary": [
    {{
      "day": 1,
      "title": "Journey to {destination}",
      "items": [
        {{"time": "08:00", "activity": "Depart from {origin} by {mode}", "duration": "4h", "transit": true}}
      ],
      "total_transit_hours": 4,
      "estimated_cost_per_person": 0
    }}
  ],
  "total_estimated_cost_per_person": 0,
  "summary_message": "{summary}"
}}"#,
        mode = prefs.travel_mode,
        summary = ITINERARY_SUMMARY
    );

    Prompt {
        system: ITINERARY_SYSTEM_PROMPT.to_string(),
        user,
    }
}

fn hotel_budget_guidelines(band: Option<BudgetBand>) -> &'static str {
    match band {
        Some(BudgetBand::BudgetFriendly) => {
            "Strict budget: guesthouses, homestays and budget hotels that are clean and safe. Price range ₹1,200-₹2,500 per night. No luxury properties."
        }
        Some(BudgetBand::MidRange) => {
            "Moderate budget: comfortable 3-4 star hotels with WiFi, AC, restaurant and room service. Price range ₹2,500-₹6,000 per night. Avoid ultra-luxury."
        }
        Some(BudgetBand::Luxury) | None => {
            "Luxury budget: 4-5 star hotels and resorts with spa, fine dining and concierge. Price range ₹6,000-₹20,000+ per night."
        }
    }
}

/// Hotel prompt for a booking.
pub fn build_hotel_prompt(
    destination: &str,
    booking: &BookingFormData,
    band: Option<BudgetBand>,
) -> Prompt {
    let stars = booking.room_type.stars();
    let special = booking.special_requests.trim();

    let mut user = String::new();
    let _ = writeln!(user, "Recommend 3 hotels in {destination}:");
    let _ = writeln!(user, "- Category: {stars}-star");
    let _ = writeln!(
        user,
        "- Trip budget: {}",
        band.map(BudgetBand::label).unwrap_or("Not specified")
    );
    let _ = writeln!(user, "- Guests: {}", booking.guest_summary());
    let _ = writeln!(
        user,
        "- Rooms: {} across {} hotel(s)",
        booking.number_of_rooms, booking.number_of_hotels
    );
    if booking.has_pets {
        let _ = writeln!(user, "- Travelling with pets: pet-friendly properties only");
    }
    let _ = writeln!(
        user,
        "- Special requests: {}",
        if special.is_empty() { "None" } else { special }
    );
    user.push('\n');
    let _ = writeln!(user, "BUDGET ALIGNMENT: {}", hotel_budget_guidelines(band));
    let _ = writeln!(
        user,
        "Hotels and amenities must match the trip budget; no lavish properties for budget trips or basic guesthouses for luxury trips."
    );
    user.push('\n');
    let _ = writeln!(
        user,
        "For each hotel give a real property name, a {stars}-star description, an image URL, 4-5 amenities, price per night in INR, rating out of 5, the area in {destination}, a booking link and 3-4 highlights."
    );
    user.push('\n');
    let _ = writeln!(user, "RETURN ONLY VALID JSON:");
    let _ = write!(
        user,
        r#"{{
  "hotels": [
    {{
      "id": "hotel-1",
      "name": "Hotel Name",
      "category": "{stars}-Star",
      "image_url": "https://images.pexels.com/photos/0/pexels-photo-0.jpeg",
      "description": "Description",
      "amenities": ["Free WiFi", "Restaurant"],
      "price_per_night": 0,
      "rating": 4.5,
      "location": "Area in {destination}",
      "booking_link": "{link}",
      "highlights": ["Highlight"]
    }}
  ],
  "message": "Found 3 {stars}-star hotels in {destination}"
}}"#,
        link = booking_search_link(destination)
    );

    Prompt {
        system: HOTEL_SYSTEM_PROMPT.to_string(),
        user,
    }
}
