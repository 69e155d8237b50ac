use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Durable key-value slot provided by the host environment
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`; returns only once the write is durable
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
}

/// In-memory preference store (for tests and ephemeral sessions)
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        tracing::debug!(key = key, "Preference saved");
        Ok(())
    }
}
