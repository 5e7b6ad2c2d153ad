//! Boundary checks for generated JSON before anything downstream trusts it.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::{PlannerError, Result},
    schemas::Validator,
    types::{
        DestinationOption, DestinationOutcome, HotelRecommendations, ItineraryPlan, Rupees,
        TravelMode, TravelScope, TripPreferences, ValidationReport, Verdict,
    },
};

use super::prompt::{raised_budget, shortened_days};

/// Allowed gap between a declared total and its breakdown sum.
pub const BUDGET_TOLERANCE: u64 = 500;

/// What the no-results suggestion is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionContext {
    pub ceiling: Rupees,
    pub days: u32,
    pub scope: TravelScope,
    pub travel_mode: TravelMode,
}

impl SuggestionContext {
    pub fn from_preferences(prefs: &TripPreferences) -> Self {
        Self {
            ceiling: prefs.ceiling(),
            days: prefs.days,
            scope: prefs.scope,
            travel_mode: prefs.travel_mode,
        }
    }

    /// Advice shown when no destination fits.
    pub fn message(&self) -> String {
        let closer = match self.scope {
            TravelScope::National => "choosing destinations closer to home",
            TravelScope::International => "switching to domestic travel",
        };
        let mode = match self.travel_mode {
            TravelMode::Flight => "travelling by train or bus instead of flight".to_string(),
            other => format!("travelling by flight instead of {other}"),
        };
        format!(
            "No destinations found within {} per person. Try increasing your budget to {}, shortening the trip to {} days, {}, or {}.",
            self.ceiling,
            raised_budget(self.ceiling),
            shortened_days(self.days),
            closer,
            mode
        )
    }
}

/// Validated destinations together with the per-entry account.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationValidation {
    pub outcome: DestinationOutcome,
    pub report: ValidationReport,
}

/// Parses and checks generated destination, itinerary and hotel payloads.
#[derive(Debug, Clone, Copy)]
pub struct ResponseValidator {
    validator: Validator,
    tolerance: u64,
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseValidator {
    pub fn new() -> Self {
        Self {
            validator: Validator::SerdeFirst,
            tolerance: BUDGET_TOLERANCE,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_tolerance(mut self, tolerance: u64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> u64 {
        self.tolerance
    }

    /// Decode, correct and filter a destination response.
    pub fn validate_destinations(
        &self,
        raw: &str,
        context: &SuggestionContext,
    ) -> Result<DestinationValidation> {
        let root = parse_json(raw)?;
        let object = root.as_object().ok_or_else(|| {
            PlannerError::Contract("destination response must be a JSON object".to_string())
        })?;
        let entries = object
            .get("destinations")
            .or_else(|| object.get("options"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                PlannerError::Contract(
                    "destination response has no `destinations` array".to_string(),
                )
            })?;
        let note = object
            .get("note")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut report = ValidationReport::new(context.ceiling, self.tolerance);
        let mut kept = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let mut option = match self.validator.decode::<DestinationOption>(entry) {
                Ok(option) => option,
                Err(err) => {
                    let title = entry
                        .get("title")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    warn!(target: "genie::validator", index, error = %err, "dropping malformed destination");
                    report.record(
                        index,
                        title,
                        Verdict::Malformed {
                            reason: err.to_string(),
                        },
                    );
                    continue;
                }
            };

            let declared = option.approx_budget.total_per_person;
            let corrected_from = self.reconcile_total(&mut option);
            let total = option.approx_budget.total_per_person;

            let verdict = if total > context.ceiling {
                Verdict::OverBudget {
                    total,
                    ceiling: context.ceiling,
                    corrected_from,
                }
            } else if corrected_from.is_some() {
                Verdict::Corrected {
                    declared,
                    computed: total,
                }
            } else {
                Verdict::Approved { total }
            };

            debug!(target: "genie::validator", title = %option.title, verdict = %verdict.describe());
            let keep = verdict.is_kept();
            report.record(index, Some(option.title.clone()), verdict);
            if keep {
                kept.push(option);
            }
        }

        info!(
            target: "genie::validator",
            ceiling = context.ceiling.get(),
            received = report.received(),
            kept = report.kept(),
            "budget filter applied"
        );

        let outcome = if kept.is_empty() {
            DestinationOutcome::NoResults {
                suggestion: context.message(),
                note,
            }
        } else {
            DestinationOutcome::Found { destinations: kept }
        };

        Ok(DestinationValidation { outcome, report })
    }

    /// Replace the declared total with the breakdown sum when they disagree by more
    /// than the tolerance. Returns the declared total if it was replaced.
    fn reconcile_total(&self, option: &mut DestinationOption) -> Option<Rupees> {
        let budget = &mut option.approx_budget;
        if budget.breakdown.is_empty() {
            return None;
        }
        let computed = budget.breakdown.sum();
        let declared = budget.total_per_person;
        if declared.abs_diff(computed) > self.tolerance {
            budget.total_per_person = computed;
            Some(declared)
        } else {
            None
        }
    }

    /// Decode an itinerary response, deriving the trip total when it is missing.
    pub fn validate_itinerary(&self, raw: &str) -> Result<ItineraryPlan> {
        let root = parse_json(raw)?;
        match root.get("itinerary") {
            Some(Value::Array(days)) if days.is_empty() => {
                return Err(PlannerError::Contract(
                    "itinerary response contains no days".to_string(),
                ));
            }
            Some(Value::Array(_)) => {}
            _ => {
                return Err(PlannerError::Contract(
                    "itinerary response has no `itinerary` array".to_string(),
                ));
            }
        }

        let mut plan: ItineraryPlan = self.validator.decode(&root)?;
        plan.itinerary.sort_by_key(|day| day.day);
        if plan.total_estimated_cost_per_person == Rupees::ZERO {
            plan.total_estimated_cost_per_person = plan.day_cost_sum();
        }
        Ok(plan)
    }

    pub fn validate_hotels(&self, raw: &str) -> Result<HotelRecommendations> {
        let root = parse_json(raw)?;
        if !matches!(root.get("hotels"), Some(Value::Array(_))) {
            return Err(PlannerError::Contract(
                "hotel response has no `hotels` array".to_string(),
            ));
        }
        self.validator.decode(&root)
    }
}

/// Parse model output, tolerating a surrounding Markdown code fence.
pub fn parse_json(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced.trim()).map_err(|err| PlannerError::InvalidJson(err.to_string()))
}
