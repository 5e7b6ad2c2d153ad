use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::warn;

use crate::services::{gemini_client, openai_client};

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub gemini_model: String,
    pub timeout: Duration,
    pub max_retries: usize,
    pub port: u16,
    pub record_store_url: Option<String>,
    pub record_store_key: Option<String>,
    pub notify_url: Option<String>,
    pub notify_token: Option<String>,
    pub environment: String,
    pub draft_path: Option<PathBuf>,
    pub sample_fallback: bool,
    /// Check model replies against the contract's JSON Schema before decoding
    pub strict_schema: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: None,
            model: openai_client::DEFAULT_MODEL.to_string(),
            gemini_api_key: None,
            gemini_base_url: None,
            gemini_model: gemini_client::DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: 0,
            port: DEFAULT_PORT,
            record_store_url: None,
            record_store_key: None,
            notify_url: None,
            notify_token: None,
            environment: "development".to_string(),
            draft_path: None,
            sample_fallback: false,
            strict_schema: false,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").or_else(|| get("OPENROUTER_BASE_URL")),
            model: get("GENIE_MODEL").unwrap_or(defaults.model),
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_GENERATIVE_AI_API_KEY")),
            gemini_base_url: get("GEMINI_BASE_URL"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            timeout: Duration::from_secs(parse_or(
                "GENIE_TIMEOUT_SECS",
                get("GENIE_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )),
            max_retries: parse_or("GENIE_MAX_RETRIES", get("GENIE_MAX_RETRIES"), 0),
            port: parse_or("GENIE_PORT", get("GENIE_PORT"), DEFAULT_PORT),
            record_store_url: get("RECORD_STORE_URL"),
            record_store_key: get("RECORD_STORE_KEY"),
            notify_url: get("NOTIFY_URL"),
            notify_token: get("NOTIFY_TOKEN"),
            environment: get("GENIE_ENV").unwrap_or(defaults.environment),
            draft_path: get("GENIE_DRAFT_PATH").map(PathBuf::from),
            sample_fallback: parse_or("GENIE_SAMPLE_FALLBACK", get("GENIE_SAMPLE_FALLBACK"), false),
            strict_schema: parse_or("GENIE_STRICT_SCHEMA", get("GENIE_STRICT_SCHEMA"), false),
        }
    }

    pub fn has_openai_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn has_gemini_key(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            warn!("Invalid {key} value `{raw}`: {err}; using default {default}");
            default
        }),
    }
}
