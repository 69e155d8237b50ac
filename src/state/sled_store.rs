use crate::error::{AppError, Result};
use crate::state::PreferenceStore;
use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

/// Persistent preference store using Sled embedded database
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
    preferences_tree: sled::Tree,
}

impl SledStore {
    /// Create a new Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref();
        let db = sled::open(&path).map_err(|e| {
            AppError::Storage(format!("Failed to open Sled database: {}", e))
        })?;

        let preferences_tree = db.open_tree("preferences").map_err(|e| {
            AppError::Storage(format!("Failed to open preferences tree: {}", e))
        })?;

        tracing::info!("Initialized Sled store at {:?}", path_str);

        Ok(Self {
            db: Arc::new(db),
            preferences_tree,
        })
    }
}

#[async_trait]
impl PreferenceStore for SledStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.preferences_tree.get(key.as_bytes()) {
            Ok(Some(bytes)) => Ok(Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read preference {}: {}",
                key, e
            ))),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.preferences_tree
            .insert(key.as_bytes(), value)
            .map_err(|e| AppError::Storage(format!("Failed to save preference {}: {}", key, e)))?;

        // Durable before returning
        self.db.flush_async().await.map_err(|e| {
            AppError::Storage(format!("Failed to flush database: {}", e))
        })?;

        tracing::debug!(key = key, "Preference saved to Sled");
        Ok(())
    }
}
