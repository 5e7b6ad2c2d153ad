use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Main error type for the planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport or provider failure; the message is the provider's own.
    #[error("{0}")]
    Provider(String),

    #[error("Content generation service did not return valid JSON: {0}")]
    InvalidJson(String),

    #[error("No response from content generation service")]
    EmptyResponse,

    #[error("Response contract violation: {0}")]
    Contract(String),

    #[error("Form validation failed: {0}")]
    Form(FormErrors),

    #[error("Booking error: {0}")]
    Booking(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlannerError::Provider(_)
                | PlannerError::InvalidJson(_)
                | PlannerError::EmptyResponse
                | PlannerError::RateLimit { .. }
                | PlannerError::Timeout(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Provider(_) => "PROVIDER_ERROR",
            PlannerError::InvalidJson(_) => "INVALID_JSON",
            PlannerError::EmptyResponse => "EMPTY_RESPONSE",
            PlannerError::Contract(_) => "CONTRACT_ERROR",
            PlannerError::Form(_) => "FORM_VALIDATION_ERROR",
            PlannerError::Booking(_) => "BOOKING_ERROR",
            PlannerError::Store(_) => "STORE_ERROR",
            PlannerError::NotFound(_) => "NOT_FOUND",
            PlannerError::Notification(_) => "NOTIFICATION_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Io(_) => "IO_ERROR",
            PlannerError::Timeout(_) => "TIMEOUT_ERROR",
            PlannerError::RateLimit { .. } => "RATE_LIMIT_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        });

        if let PlannerError::Form(errors) = self {
            payload["error"]["fields"] = serde_json::json!(errors.fields());
        }

        payload
    }
}

/// Field-level validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<&'static str, String> {
        &self.fields
    }

    /// Turn the collected messages into an error, or `Ok` when nothing was recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PlannerError::Form(self))
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .fields
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}
