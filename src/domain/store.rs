// SPDX-License-Identifier: MIT OR Apache-2.0

//! The recursive key/value configuration store.

use crate::domain::{ConfigKey, ConfigType, ConfigValue, ValueKind};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A mapping from string keys to typed configuration values.
///
/// Entries are kept in key order, so iteration and serialization are
/// deterministic. A store exclusively owns every child store reachable from its
/// values; overwriting, removing or dropping an entry reclaims those children.
///
/// Reading a missing key, or reading a key as the wrong kind, is never an
/// error: [`ConfigStore::get`] returns the requested type's zero value.
///
/// # Examples
///
/// ```
/// use nvcfg::domain::ConfigStore;
///
/// let mut store = ConfigStore::new();
/// store.set("hostname", "sensor-01").set("port", 8080);
///
/// assert!(store.is::<i32>("port"));
/// assert_eq!(store.get::<i32>("port"), 8080);
/// assert_eq!(store.get::<f64>("port"), 0.0);
/// assert_eq!(store.get_str("hostname"), "sensor-01");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigStore {
    entries: BTreeMap<ConfigKey, ConfigValue>,
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` exists and holds a value readable as `T`.
    ///
    /// `is::<GeoPoint>` additionally requires a double list of length two.
    pub fn is<T: ConfigType>(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(T::matches)
    }

    /// Returns the value at `key` as `T`, or `T::default()` when the key is
    /// missing or holds another kind.
    pub fn get<T: ConfigType>(&self, key: &str) -> T {
        self.entries
            .get(key)
            .and_then(T::extract)
            .unwrap_or_default()
    }

    /// Inserts or overwrites the value at `key`.
    ///
    /// The previous value, including any child stores it owned, is dropped.
    /// An empty list is stored as given but does not survive serialization;
    /// see [`to_document`](crate::domain::document::to_document).
    pub fn set(&mut self, key: impl Into<ConfigKey>, value: impl Into<ConfigValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Removes `key` and everything it owns. Removing a missing key is a no-op.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        if let Some(removed) = self.entries.remove(key) {
            tracing::trace!(key, kind = %removed.kind(), "removed configuration entry");
        }
        self
    }

    /// Removes every key.
    pub fn reset(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    /// Returns a snapshot of the current keys in iteration order.
    pub fn keys(&self) -> Vec<ConfigKey> {
        self.entries.keys().cloned().collect()
    }

    /// Returns the raw value at `key`.
    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Returns the kind stored at `key`.
    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        self.entries.get(key).map(ConfigValue::kind)
    }

    /// Returns the string at `key` without cloning, or `""`.
    pub fn get_str(&self, key: &str) -> &str {
        self.entries
            .get(key)
            .and_then(ConfigValue::as_str)
            .unwrap_or("")
    }

    /// Borrows the child store at `key`.
    pub fn child(&self, key: &str) -> Option<&ConfigStore> {
        self.entries.get(key).and_then(ConfigValue::as_store)
    }

    /// Mutably borrows the child store at `key`.
    pub fn child_mut(&mut self, key: &str) -> Option<&mut ConfigStore> {
        self.entries.get_mut(key).and_then(ConfigValue::as_store_mut)
    }

    /// Borrows the list of child stores at `key`, or an empty slice.
    pub fn children(&self, key: &str) -> &[ConfigStore] {
        self.entries
            .get(key)
            .and_then(ConfigValue::as_store_list)
            .unwrap_or(&[])
    }

    /// Returns true if `key` exists, whatever its kind.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, ConfigKey, ConfigValue> {
        self.entries.iter()
    }

    /// Moves every entry of `other` into this store, overwriting on collision.
    pub fn merge_from(&mut self, other: ConfigStore) -> &mut Self {
        self.entries.extend(other.entries);
        self
    }
}

impl<'a> IntoIterator for &'a ConfigStore {
    type Item = (&'a ConfigKey, &'a ConfigValue);
    type IntoIter = btree_map::Iter<'a, ConfigKey, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigStore
where
    K: Into<ConfigKey>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = ConfigStore::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}
