use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::{error::Result, services::KeyValueStore, types::TripFormData};

pub const SESSION_KEY: &str = "travel_planner_session";
pub const DRAFT_KEY: &str = "travel_planner_form_draft";

/// Stable anonymous session id, created on first use.
pub async fn session_id(store: &dyn KeyValueStore) -> Result<String> {
    store.get_or_insert(SESSION_KEY, new_session_id()).await
}

/// `session_<millis>_<suffix>` with a 9-character random suffix.
pub fn new_session_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("session_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Keeps the in-progress trip form so it survives a restart.
#[derive(Debug, Clone)]
pub struct FormDraftCache {
    store: Arc<dyn KeyValueStore>,
}

impl FormDraftCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, form: &TripFormData) -> Result<()> {
        let json = serde_json::to_string(form)?;
        self.store.set(DRAFT_KEY, json).await
    }

    /// The saved draft; an unreadable draft is dropped.
    pub async fn load(&self) -> Result<Option<TripFormData>> {
        let Some(raw) = self.store.get(DRAFT_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(form) => Ok(Some(form)),
            Err(err) => {
                warn!(error = %err, "discarding unreadable form draft");
                self.store.remove(DRAFT_KEY).await?;
                Ok(None)
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(DRAFT_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryKeyValueStore;

    #[tokio::test]
    async fn test_session_id_is_stable() {
        let store = MemoryKeyValueStore::new();
        let first = session_id(&store).await.unwrap();
        let second = session_id(&store).await.unwrap();

        assert_eq!(first, second);
        let parts: Vec<_> = first.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_use_shares_one_id() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { session_id(store.as_ref()).await.unwrap() })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.get(SESSION_KEY).await.unwrap().as_deref(), Some(ids[0].as_str()));
    }

    #[tokio::test]
    async fn test_draft_round_trip_and_clear() {
        let cache = FormDraftCache::new(Arc::new(MemoryKeyValueStore::new()));
        assert!(cache.load().await.unwrap().is_none());

        let form = TripFormData {
            start_location: "Chennai".to_string(),
            theme: vec!["Nature".to_string()],
            ..TripFormData::default()
        };
        cache.save(&form).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), Some(form));

        cache.clear().await.unwrap();
        assert!(cache.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_draft_is_dropped() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(DRAFT_KEY, "{not json".to_string()).await.unwrap();

        let cache = FormDraftCache::new(store.clone());
        assert!(cache.load().await.unwrap().is_none());
        assert!(store.get(DRAFT_KEY).await.unwrap().is_none());
    }
}
