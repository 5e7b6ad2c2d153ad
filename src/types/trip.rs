use serde::{Deserialize, Serialize};

use super::{booking::RoomTier, money::Rupees};
use crate::error::{FormErrors, Result};

labeled_enum! {
    pub enum Month {
        Jan => "Jan" | "January",
        Feb => "Feb" | "February",
        Mar => "Mar" | "March",
        Apr => "Apr" | "April",
        May => "May",
        Jun => "Jun" | "June",
        Jul => "Jul" | "July",
        Aug => "Aug" | "August",
        Sep => "Sep" | "September" | "Sept",
        Oct => "Oct" | "October",
        Nov => "Nov" | "November",
        Dec => "Dec" | "December",
    }
}

labeled_enum! {
    pub enum GroupType {
        Family => "Family",
        Couple => "Couple",
        Group => "Group",
        Bachelors => "Bachelors",
        Solo => "Solo",
    }
}

labeled_enum! {
    /// Whether the trip stays inside India.
    pub enum TravelScope {
        National => "Within India" | "National" | "Domestic",
        International => "Outside India" | "International",
    }
}

labeled_enum! {
    pub enum Theme {
        Mountain => "Mountain",
        Beach => "Beach",
        Temple => "Temple",
        City => "City",
        Adventure => "Adventure",
        Nature => "Nature",
    }
}

labeled_enum! {
    pub enum Mood {
        Exploring => "Exploring",
        Relaxing => "Relaxing",
        Party => "Party",
        Cultural => "Cultural",
    }
}

labeled_enum! {
    pub enum TravelMode {
        Car => "Car",
        Train3A => "Train 3A" | "train-3a" | "Train",
        Train2A => "Train 2A" | "train-2a",
        Flight => "Flight",
        Bus => "Bus",
    }
}

labeled_enum! {
    /// Per-person budget band chosen on the trip form.
    pub enum BudgetBand {
        BudgetFriendly => "Budget-friendly (Under ₹20k)" | "Budget (<₹20k)" | "< ₹15,000",
        MidRange => "Mid-range (₹20k-₹50k)" | "₹15,000-₹40,000",
        Luxury => "Luxury (₹50k+)" | "Luxury (>₹50k)" | "₹40,000-₹80,000" | "₹80,000+",
    }
}

impl BudgetBand {
    /// Maximum total cost per person for the whole trip.
    pub fn ceiling(self) -> Rupees {
        match self {
            BudgetBand::BudgetFriendly => Rupees(20_000),
            BudgetBand::MidRange => Rupees(50_000),
            BudgetBand::Luxury => Rupees(250_000),
        }
    }

    /// Human phrasing of the band used inside prompts.
    pub fn range_label(self) -> &'static str {
        match self {
            BudgetBand::BudgetFriendly => "Under ₹20,000",
            BudgetBand::MidRange => "₹20,000 to ₹50,000",
            BudgetBand::Luxury => "₹50,000 to ₹2,50,000",
        }
    }

    /// Nightly hotel rate band as (low, high) for the given scope.
    pub fn hotel_rate(self, scope: TravelScope) -> (Rupees, Rupees) {
        match (self, scope) {
            (BudgetBand::BudgetFriendly, TravelScope::National) => (Rupees(1_000), Rupees(3_000)),
            (BudgetBand::BudgetFriendly, TravelScope::International) => {
                (Rupees(3_000), Rupees(6_000))
            }
            (BudgetBand::MidRange, TravelScope::National) => (Rupees(3_000), Rupees(8_000)),
            (BudgetBand::MidRange, TravelScope::International) => (Rupees(6_000), Rupees(12_000)),
            (BudgetBand::Luxury, TravelScope::National) => (Rupees(8_000), Rupees(18_000)),
            (BudgetBand::Luxury, TravelScope::International) => (Rupees(12_000), Rupees(25_000)),
        }
    }

    /// Food spend per person per day as (low, high).
    pub fn food_per_day(self) -> (Rupees, Rupees) {
        match self {
            BudgetBand::BudgetFriendly => (Rupees(800), Rupees(1_200)),
            BudgetBand::MidRange => (Rupees(1_500), Rupees(2_500)),
            BudgetBand::Luxury => (Rupees(2_500), Rupees(4_000)),
        }
    }

    /// Typical all-in daily spend per person on the ground.
    pub fn daily_spend(self) -> (Rupees, Rupees) {
        match self {
            BudgetBand::BudgetFriendly => (Rupees(1_500), Rupees(2_500)),
            BudgetBand::MidRange => (Rupees(2_500), Rupees(4_500)),
            BudgetBand::Luxury => (Rupees(4_500), Rupees(8_000)),
        }
    }

    /// Room tier preselected on the booking form.
    pub fn default_room_tier(self) -> RoomTier {
        match self {
            BudgetBand::BudgetFriendly => RoomTier::ThreeStar,
            BudgetBand::MidRange => RoomTier::FourStar,
            BudgetBand::Luxury => RoomTier::FiveStar,
        }
    }
}

/// Trip form exactly as captured, before validation.
///
/// Choice fields hold the raw labels so a partially filled form can be cached and
/// restored; [`TripFormData::validate`] turns it into [`TripPreferences`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFormData {
    #[serde(default)]
    pub start_location: String,
    #[serde(default)]
    pub month: String,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    #[serde(default)]
    pub group_type: String,
    #[serde(default)]
    pub domestic_or_intl: String,
    #[serde(default)]
    pub theme: Vec<String>,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub flexible_dates: bool,
    #[serde(default)]
    pub travel_mode: String,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_travelers() -> u32 {
    1
}

fn default_days() -> u32 {
    3
}

impl Default for TripFormData {
    fn default() -> Self {
        Self {
            start_location: String::new(),
            month: String::new(),
            travelers: default_travelers(),
            group_type: String::new(),
            domestic_or_intl: String::new(),
            theme: Vec::new(),
            mood: String::new(),
            budget: String::new(),
            flexible_dates: false,
            travel_mode: String::new(),
            days: default_days(),
        }
    }
}

pub const MAX_TRIP_DAYS: u32 = 30;

impl TripFormData {
    /// Check every field and return the typed preferences, or all field errors at once.
    pub fn validate(&self) -> Result<TripPreferences> {
        let mut errors = FormErrors::new();

        let month = parse_choice::<Month>(&self.month, "month", "Please select a month", &mut errors);
        if self.travelers < 1 {
            errors.add("travelers", "At least 1 traveler required");
        }
        let group_type = parse_choice::<GroupType>(
            &self.group_type,
            "groupType",
            "Please select group type",
            &mut errors,
        );
        let scope = parse_choice::<TravelScope>(
            &self.domestic_or_intl,
            "domesticOrIntl",
            "Please select destination preference",
            &mut errors,
        );

        let mut themes = Vec::new();
        for raw in &self.theme {
            match raw.parse::<Theme>() {
                Ok(theme) if !themes.contains(&theme) => themes.push(theme),
                Ok(_) => {}
                Err(err) => errors.add("theme", err),
            }
        }
        if self.theme.is_empty() {
            errors.add("theme", "Please select at least one theme");
        }

        let mood = parse_choice::<Mood>(&self.mood, "mood", "Please select a mood", &mut errors);
        let budget =
            parse_choice::<BudgetBand>(&self.budget, "budget", "Please select a budget", &mut errors);
        let travel_mode = parse_choice::<TravelMode>(
            &self.travel_mode,
            "travelMode",
            "Please select travel mode",
            &mut errors,
        );

        let start_location = self.start_location.trim();
        if start_location.is_empty() {
            errors.add("startLocation", "Please enter your starting location");
        }
        if self.days < 1 || self.days > MAX_TRIP_DAYS {
            errors.add("days", format!("Days must be between 1 and {MAX_TRIP_DAYS}"));
        }

        errors.into_result()?;

        // Every parse above succeeded when no errors were recorded.
        match (month, group_type, scope, mood, budget, travel_mode) {
            (Some(month), Some(group_type), Some(scope), Some(mood), Some(budget), Some(travel_mode)) => {
                Ok(TripPreferences {
                    start_location: start_location.to_string(),
                    month,
                    travelers: self.travelers,
                    days: self.days,
                    group_type,
                    scope,
                    themes,
                    mood,
                    budget,
                    flexible_dates: self.flexible_dates,
                    travel_mode,
                })
            }
            _ => Err(crate::PlannerError::Form(FormErrors::new())),
        }
    }
}

fn parse_choice<T>(
    raw: &str,
    field: &'static str,
    missing: &str,
    errors: &mut FormErrors,
) -> Option<T>
where
    T: std::str::FromStr<Err = String>,
{
    if raw.trim().is_empty() {
        errors.add(field, missing);
        return None;
    }
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            errors.add(field, err);
            None
        }
    }
}

/// Validated trip preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPreferences {
    pub start_location: String,
    pub month: Month,
    pub travelers: u32,
    pub days: u32,
    pub group_type: GroupType,
    pub scope: TravelScope,
    pub themes: Vec<Theme>,
    pub mood: Mood,
    pub budget: BudgetBand,
    pub flexible_dates: bool,
    pub travel_mode: TravelMode,
}

impl TripPreferences {
    pub fn ceiling(&self) -> Rupees {
        self.budget.ceiling()
    }

    pub fn theme_list(&self) -> String {
        self.themes
            .iter()
            .map(|theme| theme.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Back to the raw form shape, e.g. for caching a submitted form.
    pub fn to_form(&self) -> TripFormData {
        TripFormData {
            start_location: self.start_location.clone(),
            month: self.month.label().to_string(),
            travelers: self.travelers,
            group_type: self.group_type.label().to_string(),
            domestic_or_intl: self.scope.label().to_string(),
            theme: self.themes.iter().map(|t| t.label().to_string()).collect(),
            mood: self.mood.label().to_string(),
            budget: self.budget.label().to_string(),
            flexible_dates: self.flexible_dates,
            travel_mode: self.travel_mode.label().to_string(),
            days: self.days,
        }
    }
}
