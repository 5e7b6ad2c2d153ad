use serde::{Deserialize, Serialize};

use super::{destination::DestinationOption, money::Rupees};

/// Destinations that survived validation, or a structured explanation of why none did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DestinationOutcome {
    Found {
        destinations: Vec<DestinationOption>,
    },
    NoResults {
        /// What to change in the request to get results
        suggestion: String,
        /// Explanation returned by the model, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
}

impl DestinationOutcome {
    /// Surviving destinations; empty for [`DestinationOutcome::NoResults`].
    pub fn destinations(&self) -> &[DestinationOption] {
        match self {
            DestinationOutcome::Found { destinations } => destinations,
            DestinationOutcome::NoResults { .. } => &[],
        }
    }

    pub fn into_destinations(self) -> Vec<DestinationOption> {
        match self {
            DestinationOutcome::Found { destinations } => destinations,
            DestinationOutcome::NoResults { .. } => Vec::new(),
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            DestinationOutcome::Found { .. } => None,
            DestinationOutcome::NoResults { suggestion, .. } => Some(suggestion),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.destinations().is_empty()
    }
}

/// What the validator decided for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Declared total matched the breakdown (or there was no breakdown) and fit the ceiling
    Approved { total: Rupees },
    /// Declared total was replaced by the breakdown sum and then fit the ceiling
    Corrected { declared: Rupees, computed: Rupees },
    /// Dropped for exceeding the ceiling
    OverBudget {
        total: Rupees,
        ceiling: Rupees,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        corrected_from: Option<Rupees>,
    },
    /// Dropped because it did not decode against the contract
    Malformed { reason: String },
}

impl Verdict {
    pub fn is_kept(&self) -> bool {
        matches!(self, Verdict::Approved { .. } | Verdict::Corrected { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Verdict::Approved { total } => format!("approved at {total}"),
            Verdict::Corrected { declared, computed } => {
                format!("corrected from {declared} to {computed}")
            }
            Verdict::OverBudget {
                total,
                ceiling,
                corrected_from,
            } => match corrected_from {
                Some(declared) => format!(
                    "over budget: {total} (corrected from {declared}) exceeds {ceiling}"
                ),
                None => format!("over budget: {total} exceeds {ceiling}"),
            },
            Verdict::Malformed { reason } => format!("malformed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReport {
    /// Position in the model's array
    pub index: usize,
    /// Title when it could be read, even from a malformed entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Per-entry account of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ceiling: Rupees,
    pub tolerance: u64,
    pub entries: Vec<EntryReport>,
}

impl ValidationReport {
    pub fn new(ceiling: Rupees, tolerance: u64) -> Self {
        Self {
            ceiling,
            tolerance,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, index: usize, title: Option<String>, verdict: Verdict) {
        self.entries.push(EntryReport {
            index,
            title,
            verdict,
        });
    }

    pub fn received(&self) -> usize {
        self.entries.len()
    }

    pub fn kept(&self) -> usize {
        self.entries.iter().filter(|e| e.verdict.is_kept()).count()
    }

    pub fn corrected(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.verdict,
                    Verdict::Corrected { .. }
                        | Verdict::OverBudget {
                            corrected_from: Some(_),
                            ..
                        }
                )
            })
            .count()
    }

    pub fn over_budget(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.verdict, Verdict::OverBudget { .. }))
            .count()
    }

    pub fn malformed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.verdict, Verdict::Malformed { .. }))
            .count()
    }

    /// Generate a human-readable trace of every decision
    pub fn explain(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Destination Validation ===".to_string());
        lines.push(format!("Ceiling: {} per person", self.ceiling));
        lines.push(format!("Tolerance: ₹{}", self.tolerance));
        lines.push(format!(
            "Received: {} | Kept: {} | Corrected: {} | Over budget: {} | Malformed: {}",
            self.received(),
            self.kept(),
            self.corrected(),
            self.over_budget(),
            self.malformed()
        ));

        lines.push(String::new());
        lines.push("--- Entries ---".to_string());

        for entry in &self.entries {
            let title = entry.title.as_deref().unwrap_or("<untitled>");
            lines.push(format!(
                "{}. {}: {}",
                entry.index + 1,
                title,
                entry.verdict.describe()
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_and_trace() {
        let mut report = ValidationReport::new(Rupees(20_000), 500);
        report.record(0, Some("Goa".into()), Verdict::Approved { total: Rupees(18_000) });
        report.record(
            1,
            Some("Manali".into()),
            Verdict::Corrected {
                declared: Rupees(15_000),
                computed: Rupees(19_000),
            },
        );
        report.record(
            2,
            Some("Bali".into()),
            Verdict::OverBudget {
                total: Rupees(45_000),
                ceiling: Rupees(20_000),
                corrected_from: None,
            },
        );
        report.record(3, None, Verdict::Malformed { reason: "missing field `title`".into() });

        assert_eq!(report.received(), 4);
        assert_eq!(report.kept(), 2);
        assert_eq!(report.corrected(), 1);
        assert_eq!(report.over_budget(), 1);
        assert_eq!(report.malformed(), 1);

        let trace = report.explain();
        assert!(trace.contains("Ceiling: ₹20,000 per person"));
        assert!(trace.contains("2. Manali: corrected from ₹15,000 to ₹19,000"));
        assert!(trace.contains("4. <untitled>: malformed"));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = DestinationOutcome::NoResults {
            suggestion: "Try a larger budget".to_string(),
            note: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_results");
        assert_eq!(json["suggestion"], "Try a larger budget");
        assert!(outcome.destinations().is_empty());
    }
}
