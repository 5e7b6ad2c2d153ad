use crate::{
    error::{PlannerError, Result},
    schemas::SchemaHandle,
};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

/// Schema violations listed in a contract error before the rest are elided.
const REPORTED_VIOLATIONS: usize = 3;

/// Check a raw reply against the contract schema, used by [`Validator::Strict`].
///
/// [`Validator::Strict`]: super::Validator::Strict
pub(crate) fn validate_against_schema(schema: &SchemaHandle, payload: &Value) -> Result<()> {
    let name = schema.schema_name();
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| PlannerError::Contract(format!("`{name}` schema does not compile: {err}")))?;

    let Err(violations) = compiled.validate(payload) else {
        return Ok(());
    };

    let mut violations = violations.peekable();
    let mut listed: Vec<String> = violations
        .by_ref()
        .take(REPORTED_VIOLATIONS)
        .map(|violation| {
            let at = violation.instance_path.to_string();
            let at = if at.is_empty() { "<root>".to_string() } else { at };
            format!("{at}: {violation}")
        })
        .collect();
    if violations.peek().is_some() {
        listed.push("additional errors truncated".to_string());
    }

    Err(PlannerError::Contract(format!(
        "reply does not match `{name}` schema: {}",
        listed.join("; ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::ResponseContract;
    use crate::types::{DestinationOption, ItineraryPlan};
    use serde_json::json;

    #[test]
    fn test_valid_destination_passes() {
        let payload = json!({
            "id": "goa-1",
            "title": "Goa",
            "approx_budget": {"total_per_person": 18000, "breakdown": {"stay": 9000}}
        });
        assert!(validate_against_schema(DestinationOption::schema(), &payload).is_ok());
    }

    #[test]
    fn test_errors_are_truncated() {
        let payload = json!({
            "itinerary": [
                {"day": "one", "items": "none", "total_transit_hours": "x", "title": 4}
            ]
        });
        let err = validate_against_schema(ItineraryPlan::schema(), &payload)
            .unwrap_err()
            .to_string();
        assert!(err.contains("`ItineraryPlan`"));
        assert!(err.contains("additional errors truncated"));
    }

    #[test]
    fn test_missing_required_field_reports_root() {
        let err = validate_against_schema(DestinationOption::schema(), &json!({"title": "Goa"}))
            .unwrap_err()
            .to_string();
        assert!(err.contains("<root>"));
        assert!(err.contains("approx_budget"));
    }
}
