use std::sync::Arc;

use tracing::info;

use crate::{
    config::Config,
    core::{FormDraftCache, TravelPlanner},
    error::Result,
    schemas::Validator,
    services::{
        generator::MissingCredentials, ContentGenerator, FileKeyValueStore, GeminiClient,
        HttpNotifier, KeyValueStore, MemoryKeyValueStore, MemoryRecordStore, NoopNotifier,
        Notifier, OpenAIClient, RecordStore, ResponseValidator, RestRecordStore,
    },
};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub planner: TravelPlanner,
    /// Generator behind `/api/generate`
    pub openai: Arc<dyn ContentGenerator>,
    /// Generator behind `/api/gemini`; absent without a key
    pub gemini: Option<Arc<dyn ContentGenerator>>,
    /// Session id and form draft storage
    pub local: Arc<dyn KeyValueStore>,
    pub drafts: FormDraftCache,
}

impl AppState {
    pub fn new(
        config: Config,
        planner: TravelPlanner,
        openai: Arc<dyn ContentGenerator>,
        gemini: Option<Arc<dyn ContentGenerator>>,
    ) -> Self {
        let local: Arc<dyn KeyValueStore> = match &config.draft_path {
            Some(path) => Arc::new(FileKeyValueStore::new(path.clone())),
            None => Arc::new(MemoryKeyValueStore::new()),
        };
        Self {
            config: Arc::new(config),
            planner,
            openai,
            gemini,
            drafts: FormDraftCache::new(local.clone()),
            local,
        }
    }

    /// Wire providers, record store and notifier from configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let openai: Arc<dyn ContentGenerator> = match &config.openai_api_key {
            Some(key) => {
                let mut client = OpenAIClient::new(key.as_str())
                    .with_model(config.model.as_str())
                    .with_timeout(config.timeout)
                    .with_max_retries(config.max_retries);
                if let Some(base_url) = &config.openai_base_url {
                    client = client.with_base_url(base_url.as_str());
                }
                Arc::new(client)
            }
            None => Arc::new(MissingCredentials::new("OpenAI")),
        };

        let gemini = config.gemini_api_key.as_ref().map(|key| {
            let mut client = GeminiClient::new(key.as_str())
                .with_model(config.gemini_model.as_str())
                .with_timeout(config.timeout)
                .with_max_retries(config.max_retries);
            if let Some(base_url) = &config.gemini_base_url {
                client = client.with_base_url(base_url.as_str());
            }
            Arc::new(client) as Arc<dyn ContentGenerator>
        });

        let store: Arc<dyn RecordStore> =
            match (&config.record_store_url, &config.record_store_key) {
                (Some(url), Some(key)) => {
                    info!(%url, "using remote record store");
                    Arc::new(RestRecordStore::new(url.as_str(), key.as_str())?)
                }
                _ => {
                    info!("no record store configured, keeping records in memory");
                    Arc::new(MemoryRecordStore::new())
                }
            };

        let notifier: Arc<dyn Notifier> = match &config.notify_url {
            Some(url) => {
                let mut notifier = HttpNotifier::new(url.as_str());
                if let Some(token) = &config.notify_token {
                    notifier = notifier.with_token(token.as_str());
                }
                Arc::new(notifier)
            }
            None => Arc::new(NoopNotifier),
        };

        let validator = if config.strict_schema {
            info!("checking replies against their JSON Schema");
            Validator::Strict
        } else {
            Validator::SerdeFirst
        };

        let planner = TravelPlanner::new(openai.clone(), store)
            .with_validator(ResponseValidator::new().with_validator(validator))
            .with_notifier(notifier)
            .with_sample_fallback(config.sample_fallback);

        Ok(Self::new(config, planner, openai, gemini))
    }
}
