use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::error::{PlannerError, Result};

pub const DEFAULT_TEMPERATURE: f64 = 0.8;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// One prompt sent to a content-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub user: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Ask the provider for a single JSON object
    pub json_mode: bool,
}

impl GenerationRequest {
    /// Structured request with the planner's sampling defaults.
    pub fn json(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            json_mode: true,
        }
    }

    /// Bare prompt with provider defaults, as the proxy endpoints send it.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            user: prompt.into(),
            temperature: None,
            max_tokens: None,
            json_mode: false,
        }
    }
}

/// A model provider that turns a prompt into text.
#[async_trait]
pub trait ContentGenerator: Send + Sync + std::fmt::Debug {
    /// Provider name used in logs
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// POST `body` built by `make_request`, retrying rate limits and server errors up to
/// `max_retries` times with exponential backoff. Returns the parsed success body.
pub(crate) async fn send_with_retries<F>(
    provider: &str,
    max_retries: usize,
    make_request: F,
) -> Result<Value>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    let mut backoff = Duration::from_millis(250);

    loop {
        let response = make_request().send().await.map_err(|err| {
            if err.is_timeout() {
                PlannerError::Timeout(format!("{provider} request timed out: {err}"))
            } else {
                PlannerError::Provider(format!("{provider} request failed: {err}"))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response.text().await.map_err(|err| {
            PlannerError::Provider(format!("Failed to read {provider} response: {err}"))
        })?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_duration = headers
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(backoff);

            if attempt < max_retries {
                warn!(provider, attempt, "rate limited, retrying");
                tokio::time::sleep(retry_after_duration).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            return Err(PlannerError::RateLimit {
                retry_after: retry_after_duration.as_secs().max(1),
            });
        }

        if status.is_server_error() && attempt < max_retries {
            warn!(provider, attempt, %status, "server error, retrying");
            tokio::time::sleep(backoff).await;
            attempt += 1;
            backoff *= 2;
            continue;
        }

        let response_json: Option<Value> = serde_json::from_str(&response_text).ok();

        if !status.is_success() {
            let api_message = response_json
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| {
                    if response_text.trim().is_empty() {
                        format!("HTTP {status}")
                    } else {
                        response_text.clone()
                    }
                });
            return Err(PlannerError::Provider(format!(
                "{provider} API error: {api_message}"
            )));
        }

        let response_json = response_json.ok_or_else(|| {
            PlannerError::Provider(format!("{provider} returned a non-JSON body"))
        })?;

        if let Some(message) = error_message(&response_json) {
            return Err(PlannerError::Provider(format!(
                "{provider} API error: {message}"
            )));
        }

        return Ok(response_json);
    }
}

/// `error.message` from a provider error body, or the error value itself.
fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| match error {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            }),
    )
}

/// Build a client honoring the per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))
}

/// Stands in for a provider whose API key is not configured; every call fails with
/// a configuration error.
#[derive(Debug, Clone)]
pub struct MissingCredentials {
    provider: &'static str,
}

impl MissingCredentials {
    pub fn new(provider: &'static str) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ContentGenerator for MissingCredentials {
    fn name(&self) -> &str {
        self.provider
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Err(PlannerError::Config(format!("{} API key missing", self.provider)))
    }
}
