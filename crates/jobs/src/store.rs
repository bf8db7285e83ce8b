//! Key-value store holding job descriptors and status records.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::JobError;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, JobError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), JobError>;

    /// Append `value` to the list stored at `list`.
    async fn push(&self, list: &str, value: &str) -> Result<(), JobError>;
}

/// Read and decode the JSON value under `key`.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn JobStore,
    key: &str,
) -> Result<Option<T>, JobError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| JobError::Malformed {
            key: key.to_string(),
            source,
        })
}

pub async fn set_json<T: Serialize + Sync>(
    store: &dyn JobStore,
    key: &str,
    value: &T,
) -> Result<(), JobError> {
    let raw = serde_json::to_string(value).map_err(|source| JobError::Malformed {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw).await
}

// ---------------------------------------------------------------------------
// Redis
// ---------------------------------------------------------------------------

/// [`JobStore`] over a multiplexed Redis connection opened at startup.
#[derive(Clone)]
pub struct RedisJobStore {
    conn: MultiplexedConnection,
}

impl RedisJobStore {
    pub async fn connect(url: &str) -> Result<Self, JobError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl JobStore for RedisJobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, JobError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), JobError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn push(&self, list: &str, value: &str) -> Result<(), JobError> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(list, value).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    values: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
}

/// In-process [`JobStore`] for tests and local development.
#[derive(Default)]
pub struct MemoryJobStore {
    state: RwLock<MemoryState>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a list, oldest first.
    pub async fn list(&self, name: &str) -> Vec<String> {
        self.state
            .read()
            .await
            .lists
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, JobError> {
        Ok(self.state.read().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), JobError> {
        self.state
            .write()
            .await
            .values
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn push(&self, list: &str, value: &str) -> Result<(), JobError> {
        self.state
            .write()
            .await
            .lists
            .entry(list.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::status::JobDescriptor;

    #[tokio::test]
    async fn json_values_round_trip_through_the_store() {
        let store = MemoryJobStore::new();
        let descriptor = JobDescriptor {
            job_id: "abc".into(),
            is_qiita_job: false,
        };
        set_json(&store, "prep_template_1", &descriptor).await.unwrap();

        let read: Option<JobDescriptor> = get_json(&store, "prep_template_1").await.unwrap();
        assert_eq!(read, Some(descriptor));

        let missing: Option<JobDescriptor> = get_json(&store, "prep_template_2").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_reported_with_its_key() {
        let store = MemoryJobStore::new();
        store.set("broken", "{not json").await.unwrap();

        let err = get_json::<JobDescriptor>(&store, "broken").await.unwrap_err();
        assert_matches!(err, JobError::Malformed { key, .. } if key == "broken");
    }

    #[tokio::test]
    async fn lists_keep_push_order() {
        let store = MemoryJobStore::new();
        store.push("jobs:a", "1").await.unwrap();
        store.push("jobs:a", "2").await.unwrap();
        assert_eq!(store.list("jobs:a").await, vec!["1", "2"]);
        assert!(store.list("jobs:b").await.is_empty());
    }
}
