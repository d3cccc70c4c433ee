//! The shared entity store.
//!
//! [`World`] owns a mapping from entity key to attribute map and an ordered
//! list of [`ChangeListener`]s. Every mutation notifies the listeners while
//! the write guard is still held, so a mutation and its fan-out appear
//! atomic to other mutators: at most one mutation (and its broadcast) is in
//! flight at a time.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock as SyncRwLock};

use serde_json::Value;
use tokio::sync::RwLock;

use super::listener::ChangeListener;

/// One entity's key/value properties. Order is irrelevant; values are
/// arbitrary JSON.
pub type Attributes = HashMap<String, Value>;

/// The shared store of all entities plus their attribute maps.
///
/// # Concurrency
///
/// - Mutations (and their listener notifications) are serialized behind the
///   write lock.
/// - Reads take the read lock and may run concurrently with each other.
/// - Lookup of an absent entity yields an empty attribute map, not an
///   error: absence and emptiness are indistinguishable to callers.
pub struct World {
    space: RwLock<HashMap<String, Attributes>>,
    listeners: SyncRwLock<Vec<Arc<dyn ChangeListener>>>,
}

impl World {
    /// Creates an empty world with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            space: RwLock::new(HashMap::new()),
            listeners: SyncRwLock::new(Vec::new()),
        }
    }

    /// Registers a listener to be notified on every entity mutation.
    ///
    /// Listeners are invoked in registration order and are never removed.
    pub fn add_listener(&self, listener: Arc<dyn ChangeListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Merge-sets a single attribute into the entity's map, creating the
    /// entity if absent, then notifies listeners with the full resulting
    /// attribute map. Always succeeds.
    pub async fn update(&self, entity: &str, key: &str, value: Value) {
        let mut space = self.space.write().await;
        space
            .entry(entity.to_string())
            .or_default()
            .insert(key.to_string(), value);
        if let Some(current) = space.get(entity) {
            self.notify(entity, current);
        }
    }

    /// Replaces the entity's entire attribute map with `data`, discarding
    /// prior attributes, then notifies listeners with `data`. Always
    /// succeeds.
    pub async fn set_entity(&self, entity: &str, data: Attributes) {
        let mut space = self.space.write().await;
        space.insert(entity.to_string(), data);
        if let Some(current) = space.get(entity) {
            self.notify(entity, current);
        }
    }

    /// Discards all entities.
    ///
    /// Does **not** notify per-entity listeners: clearing is a world-wide
    /// event, and downstream consumers emit their own wide notification
    /// instead of one per entity.
    pub async fn clear(&self) {
        self.space.write().await.clear();
    }

    /// Returns a copy of the entity's attribute map, or an empty map if the
    /// entity is absent.
    pub async fn get(&self, entity: &str) -> Attributes {
        self.space
            .read()
            .await
            .get(entity)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns a copy of the entire mapping at the moment of the call.
    ///
    /// Taken under the read lock, so the copy can never observe a partial
    /// mutation and is safe to serialize as-is.
    pub async fn snapshot(&self) -> HashMap<String, Attributes> {
        self.space.read().await.clone()
    }

    fn notify(&self, entity: &str, data: &Attributes) {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener.notify(entity, data);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World").finish_non_exhaustive()
    }
}
