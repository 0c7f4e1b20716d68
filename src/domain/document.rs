// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping between a [`ConfigStore`] and a generic document tree.
//!
//! The tree is [`serde_json::Value`], which is the vocabulary both the text
//! and binary codecs understand: null, bool, number, string, array, object.
//!
//! # Classification
//!
//! When a document object is merged into a store, every field is classified by
//! testing, in order: boolean, integer, floating-point, string, object, array.
//! The first match wins, so an integer field never becomes a double. Arrays are
//! classified by their first element only; the remaining elements are coerced
//! to that kind and fall back to the kind's zero value when they do not fit.
//! Null fields and empty arrays are skipped, so they never create a key.

use crate::domain::{ConfigStore, ConfigValue};
use serde_json::{Map, Number, Value};

/// The generic document tree.
pub type Document = Value;

/// Reserved top-level field marking a genuine persisted snapshot.
pub const SAVED_MARKER: &str = "saved";

/// Encodes a store as a document, adding the `saved` marker at the top level.
///
/// Empty lists encode as `[]`, which carries no element kind, so a key holding
/// an empty list is dropped when the document is read back. Non-finite
/// doubles encode as `null` and are dropped the same way.
///
/// # Examples
///
/// ```
/// use nvcfg::domain::{document, ConfigStore};
///
/// let mut store = ConfigStore::new();
/// store.set("port", 8080);
///
/// let doc = document::to_document(&store);
/// assert_eq!(doc["port"], 8080);
/// assert_eq!(doc["saved"], true);
/// ```
pub fn to_document(store: &ConfigStore) -> Document {
    let mut object = encode_store(store);
    object.insert(SAVED_MARKER.to_string(), Value::Bool(true));
    Value::Object(object)
}

/// Builds a store from a document, ignoring the top-level `saved` marker.
///
/// A document whose root is not an object produces an empty store.
pub fn from_document(document: &Document) -> ConfigStore {
    let mut store = ConfigStore::new();
    if let Value::Object(object) = document {
        merge_document(&mut store, object);
        store.remove(SAVED_MARKER);
    }
    store
}

/// Returns true if the document carries `"saved": true` at the top level.
pub fn is_saved_snapshot(document: &Document) -> bool {
    document
        .get(SAVED_MARKER)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Merges the fields of `object` into `store`, overwriting on key collision.
pub fn merge_document(store: &mut ConfigStore, object: &Map<String, Value>) {
    for (key, field) in object {
        match classify(field) {
            Some(value) => {
                store.set(key.as_str(), value);
            }
            None => tracing::trace!(key = key.as_str(), "skipping unclassifiable field"),
        }
    }
}

impl ConfigStore {
    /// Builds a store directly from an in-memory document, bypassing all I/O.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvcfg::domain::ConfigStore;
    /// use serde_json::json;
    ///
    /// let store = ConfigStore::from_document(&json!({ "net": { "dhcp": true } }));
    /// assert!(store.child("net").is_some_and(|net| net.get::<bool>("dhcp")));
    /// ```
    pub fn from_document(document: &Document) -> Self {
        from_document(document)
    }

    /// Encodes this store as a document carrying the `saved` marker.
    pub fn to_document(&self) -> Document {
        to_document(self)
    }
}

/// Builds a child store from a document fragment; no outer sources apply.
fn store_from_object(object: &Map<String, Value>) -> ConfigStore {
    let mut store = ConfigStore::new();
    merge_document(&mut store, object);
    store
}

fn classify(field: &Value) -> Option<ConfigValue> {
    match field {
        Value::Bool(b) => Some(ConfigValue::Bool(*b)),
        Value::Number(n) => Some(match as_int32(n) {
            Some(i) => ConfigValue::Int32(i),
            None => ConfigValue::Double(n.as_f64().unwrap_or_default()),
        }),
        Value::String(s) => Some(ConfigValue::String(s.clone())),
        Value::Object(object) => Some(ConfigValue::Store(store_from_object(object))),
        Value::Array(items) => classify_array(items),
        Value::Null => None,
    }
}

fn classify_array(items: &[Value]) -> Option<ConfigValue> {
    let value = match items.first()? {
        Value::Bool(_) => ConfigValue::BoolList(
            items
                .iter()
                .map(|item| item.as_bool().unwrap_or_default())
                .collect(),
        ),
        Value::Number(n) if as_int32(n).is_some() => ConfigValue::Int32List(
            items.iter().map(coerce_int32).collect(),
        ),
        Value::Number(_) => ConfigValue::DoubleList(
            items
                .iter()
                .map(|item| item.as_f64().unwrap_or_default())
                .collect(),
        ),
        Value::String(_) => ConfigValue::StringList(
            items
                .iter()
                .map(|item| item.as_str().unwrap_or_default().to_string())
                .collect(),
        ),
        Value::Object(_) => ConfigValue::StoreList(
            items
                .iter()
                .map(|item| item.as_object().map(store_from_object).unwrap_or_default())
                .collect(),
        ),
        Value::Array(_) | Value::Null => return None,
    };
    Some(value)
}

fn as_int32(n: &Number) -> Option<i32> {
    n.as_i64().and_then(|i| i32::try_from(i).ok())
}

fn coerce_int32(item: &Value) -> i32 {
    match item {
        Value::Number(n) => match as_int32(n) {
            Some(i) => i,
            // `as` saturates, so out-of-range values clamp and NaN becomes 0.
            None => n.as_f64().map(|f| f as i32).unwrap_or_default(),
        },
        _ => 0,
    }
}

fn encode_store(store: &ConfigStore) -> Map<String, Value> {
    store
        .iter()
        .map(|(key, value)| (key.as_str().to_string(), encode_value(value)))
        .collect()
}

fn encode_value(value: &ConfigValue) -> Value {
    match value {
        ConfigValue::Bool(b) => Value::Bool(*b),
        ConfigValue::Int32(i) => Value::from(*i),
        ConfigValue::Double(d) => encode_double(*d),
        ConfigValue::String(s) => Value::String(s.clone()),
        ConfigValue::Store(child) => Value::Object(encode_store(child)),
        ConfigValue::BoolList(list) => list.iter().copied().map(Value::Bool).collect(),
        ConfigValue::Int32List(list) => list.iter().copied().map(Value::from).collect(),
        ConfigValue::DoubleList(list) => list.iter().copied().map(encode_double).collect(),
        ConfigValue::StringList(list) => list.iter().cloned().map(Value::String).collect(),
        ConfigValue::StoreList(list) => list
            .iter()
            .map(|child| Value::Object(encode_store(child)))
            .collect(),
    }
}

// The tree has no representation for NaN or infinities.
fn encode_double(d: f64) -> Value {
    Number::from_f64(d).map(Value::Number).unwrap_or(Value::Null)
}
