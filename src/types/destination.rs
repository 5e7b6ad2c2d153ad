use std::collections::BTreeMap;

use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Deserializer, Serialize};

use super::money::Rupees;

/// One destination suggestion returned by the content-generation service.
///
/// Decoding goes through [`RawDestination`] so that replies carrying both spellings
/// of a field (`hidden_gem` and `is_hidden_gem`) still decode; the canonical key wins.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DestinationOption {
    /// Stable identifier chosen by the model (e.g. "manali-1")
    #[serde(default)]
    pub id: String,
    /// Destination name
    pub title: String,
    /// Country, omitted for domestic suggestions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Two or three lines on why the place fits the traveler
    #[serde(default)]
    pub short_description: String,
    /// Typical weather in the travel month
    #[serde(default)]
    pub weather: Weather,
    /// Exactly three spots are requested; fewer are tolerated
    #[serde(default)]
    pub must_sees: Vec<MustSee>,
    /// Per-person trip cost estimate
    #[serde(alias = "approx_budget_for_3_to_5_days")]
    pub approx_budget: ApproxBudget,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub con: String,
    /// Free-form month range such as "Oct-Mar"
    #[serde(default)]
    pub best_months: String,
    #[serde(default)]
    pub accessibility_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_time_from_origin: Option<String>,
    #[serde(default)]
    pub estimated_time_to_cover: String,
    /// Underrated nearby pick
    #[serde(default, alias = "is_hidden_gem", skip_serializing_if = "Option::is_none")]
    pub hidden_gem: Option<bool>,
}

#[derive(Deserialize)]
struct RawDestination {
    #[serde(default)]
    id: String,
    title: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    weather: Weather,
    #[serde(default)]
    must_sees: Vec<MustSee>,
    #[serde(default)]
    approx_budget: Option<ApproxBudget>,
    #[serde(default)]
    approx_budget_for_3_to_5_days: Option<ApproxBudget>,
    #[serde(default)]
    pros: Vec<String>,
    #[serde(default)]
    con: String,
    #[serde(default)]
    best_months: String,
    #[serde(default)]
    accessibility_note: String,
    #[serde(default)]
    travel_time_from_origin: Option<String>,
    #[serde(default)]
    estimated_time_to_cover: String,
    #[serde(default)]
    hidden_gem: Option<bool>,
    #[serde(default)]
    is_hidden_gem: Option<bool>,
}

impl<'de> Deserialize<'de> for DestinationOption {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawDestination::deserialize(deserializer)?;
        let approx_budget = raw
            .approx_budget
            .or(raw.approx_budget_for_3_to_5_days)
            .ok_or_else(|| serde::de::Error::missing_field("approx_budget"))?;
        Ok(Self {
            id: raw.id,
            title: raw.title,
            country: raw.country,
            short_description: raw.short_description,
            weather: raw.weather,
            must_sees: raw.must_sees,
            approx_budget,
            pros: raw.pros,
            con: raw.con,
            best_months: raw.best_months,
            accessibility_note: raw.accessibility_note,
            travel_time_from_origin: raw.travel_time_from_origin,
            estimated_time_to_cover: raw.estimated_time_to_cover,
            hidden_gem: raw.hidden_gem.or(raw.is_hidden_gem),
        })
    }
}

impl DestinationOption {
    pub fn total_per_person(&self) -> Rupees {
        self.approx_budget.total_per_person
    }

    pub fn is_hidden_gem(&self) -> bool {
        self.hidden_gem.unwrap_or(false)
    }

    /// "Title, Country" or just the title.
    pub fn display_name(&self) -> String {
        match self.country.as_deref().map(str::trim) {
            Some(country) if !country.is_empty() => format!("{}, {}", self.title, country),
            _ => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Weather {
    /// e.g. "15-25°C"
    #[serde(default)]
    pub temperature_range: String,
    /// sunny / cloudy / rainy / snow
    #[serde(default)]
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MustSee {
    pub name: String,
    #[serde(default)]
    pub reason: String,
    /// YouTube search URL for the spot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_link: Option<String>,
}

impl MustSee {
    /// YouTube search link for a spot, used when the model leaves `video_link` out.
    pub fn search_link(destination: &str, spot: &str) -> String {
        let query = format!("{destination} {spot}")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("+");
        format!("https://www.youtube.com/results?search_query={query}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApproxBudget {
    /// Declared total per person for the whole trip
    pub total_per_person: Rupees,
    /// Named cost components
    #[serde(default)]
    pub breakdown: CostBreakdown,
}

/// Open map of named cost components.
///
/// Models use either `{stay, food, transport, activities}` or
/// `{travel_to_destination, stay, food, local_transport, activities}` and sometimes
/// add prose such as `calculation_note`; entries that are not amounts are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CostBreakdown(BTreeMap<String, Rupees>);

impl CostBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, amount: Rupees) {
        self.0.insert(name.into(), amount);
    }

    pub fn get(&self, name: &str) -> Option<Rupees> {
        self.0.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn sum(&self) -> Rupees {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rupees)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }
}

impl<K: Into<String>> FromIterator<(K, Rupees)> for CostBreakdown {
    fn from_iter<I: IntoIterator<Item = (K, Rupees)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for CostBreakdown {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, value)| Rupees::from_json(&value).map(|amount| (name, amount)))
            .collect())
    }
}

impl JsonSchema for CostBreakdown {
    fn schema_name() -> String {
        "CostBreakdown".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        let mut schema = SchemaObject {
            instance_type: Some(InstanceType::Object.into()),
            ..Default::default()
        };
        schema.object().additional_properties = Some(Box::new(Schema::Bool(true)));
        Schema::Object(schema)
    }
}

/// Root object of a destination response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DestinationResponse {
    #[serde(alias = "options")]
    pub destinations: Vec<DestinationOption>,
    /// Explanation the model adds when nothing fits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
