use std::collections::BTreeMap;

use crate::foundation::error::PromoResult;

/// Key-value collaborator contract (config store, theme store, per-channel asset store).
///
/// The engine performs presence checks only on retrieved values.
pub trait KeyValueStore<V> {
    /// Value for `key`, if present.
    fn get(&self, key: &str) -> Option<V>;
    /// Insert or replace `key`.
    fn set(&mut self, key: &str, value: V) -> PromoResult<()>;
    /// Remove `key`; removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> PromoResult<()>;
}

/// Ordered in-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore<V> {
    entries: BTreeMap<String, V>,
}

impl<V> MemoryStore<V> {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> KeyValueStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: V) -> PromoResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PromoResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key of a channel-specific asset in the per-channel asset store.
pub fn channel_asset_key(channel: &str, asset: &str) -> String {
    format!("{channel}/{asset}")
}
