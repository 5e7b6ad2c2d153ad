use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Metadata, Schema, SchemaObject},
    JsonSchema,
};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Whole-rupee amount.
///
/// Model output is loose about numbers, so decoding accepts integers, floats
/// (rounded to the nearest rupee) and numeric strings such as `"₹35,000"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rupees(pub u64);

impl Rupees {
    pub const ZERO: Rupees = Rupees(0);

    pub fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Absolute difference between two amounts.
    pub fn abs_diff(self, other: Rupees) -> u64 {
        self.0.abs_diff(other.0)
    }

    /// Scale by a decimal factor, rounding to the nearest rupee.
    pub fn scale(self, factor: f64) -> Rupees {
        Rupees((self.0 as f64 * factor).round().max(0.0) as u64)
    }

    /// Digits with Indian grouping, without the currency sign (`1,23,456`).
    pub fn grouped(self) -> String {
        format_indian_grouping(self.0)
    }
}

impl fmt::Display for Rupees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.grouped())
    }
}

impl From<u64> for Rupees {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Add for Rupees {
    type Output = Rupees;

    fn add(self, rhs: Rupees) -> Rupees {
        Rupees(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Rupees {
    fn add_assign(&mut self, rhs: Rupees) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Mul<u64> for Rupees {
    type Output = Rupees;

    fn mul(self, rhs: u64) -> Rupees {
        Rupees(self.0.saturating_mul(rhs))
    }
}

impl Sum for Rupees {
    fn sum<I: Iterator<Item = Rupees>>(iter: I) -> Rupees {
        iter.fold(Rupees::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Rupees> for Rupees {
    fn sum<I: Iterator<Item = &'a Rupees>>(iter: I) -> Rupees {
        iter.copied().sum()
    }
}

impl<'de> Deserialize<'de> for Rupees {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Rupees::from_json(&value).ok_or_else(|| {
            de::Error::custom(format!("expected a non-negative rupee amount, got {value}"))
        })
    }
}

impl Rupees {
    /// Interpret a loose JSON value as an amount. Returns `None` for anything that
    /// is not a non-negative number.
    pub fn from_json(value: &serde_json::Value) -> Option<Rupees> {
        match value {
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_u64() {
                    Some(Rupees(int))
                } else {
                    let float = number.as_f64()?;
                    (float.is_finite() && float >= 0.0).then(|| Rupees(float.round() as u64))
                }
            }
            serde_json::Value::String(text) => parse_amount_text(text),
            _ => None,
        }
    }
}

fn parse_amount_text(text: &str) -> Option<Rupees> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let float: f64 = cleaned.parse().ok()?;
    (float.is_finite() && float >= 0.0).then(|| Rupees(float.round() as u64))
}

impl JsonSchema for Rupees {
    fn schema_name() -> String {
        "Rupees".to_string()
    }

    fn is_referenceable() -> bool {
        false
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        let mut schema = SchemaObject {
            instance_type: Some(InstanceType::Number.into()),
            metadata: Some(Box::new(Metadata {
                description: Some("Amount in Indian rupees".to_string()),
                ..Default::default()
            })),
            ..Default::default()
        };
        schema.number().minimum = Some(0.0);
        Schema::Object(schema)
    }
}

/// Indian digit grouping: the last three digits, then groups of two.
pub fn format_indian_grouping(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
