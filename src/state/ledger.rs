//! Favorite ledger: the durable set of favorited property ids.
//!
//! Membership lives in memory for O(1) lookups and is written through to a
//! [`PreferenceStore`] slot as a JSON array of ids on every toggle. Toggles
//! are serialized by a write gate so concurrent callers never interleave a
//! partial update with a persist.

use crate::models::PropertyId;
use crate::state::PreferenceStore;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Insertion-ordered set of ids
#[derive(Debug, Clone, Default)]
struct FavoriteSet {
    order: Vec<PropertyId>,
    members: HashSet<PropertyId>,
}

impl FavoriteSet {
    fn from_ids(ids: Vec<PropertyId>) -> Self {
        let mut set = Self::default();
        for id in ids {
            if set.members.insert(id) {
                set.order.push(id);
            }
        }
        set
    }

    /// Flip membership and return the new state
    fn toggle(&mut self, id: PropertyId) -> bool {
        if self.members.remove(&id) {
            self.order.retain(|&existing| existing != id);
            false
        } else {
            self.members.insert(id);
            self.order.push(id);
            true
        }
    }
}

/// A favorite change that applied in memory but did not reach durable storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistenceWarning {
    pub property_id: PropertyId,
    pub message: String,
}

impl fmt::Display for PersistenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Favorite change for property {} was not saved: {}",
            self.property_id, self.message
        )
    }
}

/// Result of a toggle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleOutcome {
    pub property_id: PropertyId,
    /// Membership after the toggle
    pub is_favorite: bool,
    /// Present when the change is at risk until a later persist succeeds
    pub warning: Option<PersistenceWarning>,
}

pub struct FavoriteLedger {
    store: Arc<dyn PreferenceStore>,
    key: String,
    favorites: RwLock<FavoriteSet>,
    write_gate: Mutex<()>,
}

impl FavoriteLedger {
    /// Load the ledger from `key`. A missing, unreadable or malformed entry
    /// yields an empty ledger.
    pub async fn load(store: Arc<dyn PreferenceStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let ids = match store.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<PropertyId>>(&bytes) {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Malformed favorites entry, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read favorites, starting empty");
                Vec::new()
            }
        };

        let favorites = FavoriteSet::from_ids(ids);
        tracing::debug!(key = %key, favorites = favorites.order.len(), "Favorite ledger loaded");

        Self {
            store,
            key,
            favorites: RwLock::new(favorites),
            write_gate: Mutex::new(()),
        }
    }

    pub fn is_favorite(&self, id: PropertyId) -> bool {
        self.favorites.read().members.contains(&id)
    }

    /// Snapshot of current membership
    pub fn all(&self) -> HashSet<PropertyId> {
        self.favorites.read().members.clone()
    }

    /// Favorited ids in the order they were added
    pub fn ordered(&self) -> Vec<PropertyId> {
        self.favorites.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.favorites.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flip membership of `id` and persist before returning.
    ///
    /// A failed persist leaves the in-memory change in place and is reported
    /// through [`ToggleOutcome::warning`].
    pub async fn toggle(&self, id: PropertyId) -> ToggleOutcome {
        let _gate = self.write_gate.lock().await;

        let (is_favorite, snapshot) = {
            let mut favorites = self.favorites.write();
            let is_favorite = favorites.toggle(id);
            (is_favorite, favorites.order.clone())
        };

        let warning = match self.persist(&snapshot).await {
            Ok(()) => None,
            Err(message) => {
                tracing::warn!(
                    property_id = id,
                    key = %self.key,
                    error = %message,
                    "Favorite change applied in memory but not persisted"
                );
                Some(PersistenceWarning {
                    property_id: id,
                    message,
                })
            }
        };

        tracing::debug!(property_id = id, is_favorite, "Favorite toggled");

        ToggleOutcome {
            property_id: id,
            is_favorite,
            warning,
        }
    }

    async fn persist(&self, ids: &[PropertyId]) -> std::result::Result<(), String> {
        let bytes = serde_json::to_vec(ids).map_err(|e| e.to_string())?;
        self.store
            .put(&self.key, bytes)
            .await
            .map_err(|e| e.to_string())
    }
}
