// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed configuration values.
//!
//! A [`ConfigValue`] is a closed tagged union over the ten kinds a store can
//! hold. The [`ConfigType`] trait connects each kind to a Rust type so that
//! stores can offer generic `is::<T>` / `get::<T>` accessors.

use crate::domain::ConfigStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A two-element double list, used for latitude/longitude style values.
pub type GeoPoint = [f64; 2];

/// The discriminant of a [`ConfigValue`].
///
/// The declaration order is stable and [`ValueKind::index`] is used wherever a
/// numeric discriminant is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// A boolean
    Bool,
    /// A 32-bit signed integer
    Int32,
    /// A double precision float
    Double,
    /// A UTF-8 string
    String,
    /// An owned child store
    Store,
    /// A list of booleans
    BoolList,
    /// A list of 32-bit signed integers
    Int32List,
    /// A list of doubles
    DoubleList,
    /// A list of strings
    StringList,
    /// A list of owned child stores
    StoreList,
}

impl ValueKind {
    /// Every kind, in discriminant order.
    pub const ALL: [ValueKind; 10] = [
        ValueKind::Bool,
        ValueKind::Int32,
        ValueKind::Double,
        ValueKind::String,
        ValueKind::Store,
        ValueKind::BoolList,
        ValueKind::Int32List,
        ValueKind::DoubleList,
        ValueKind::StringList,
        ValueKind::StoreList,
    ];

    /// Returns the stable numeric discriminant of this kind.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns true for the five list kinds.
    pub fn is_list(self) -> bool {
        self.index() >= ValueKind::BoolList.index()
    }

    /// Returns a short human readable name.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int32 => "int32",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Store => "store",
            ValueKind::BoolList => "list<bool>",
            ValueKind::Int32List => "list<int32>",
            ValueKind::DoubleList => "list<double>",
            ValueKind::StringList => "list<string>",
            ValueKind::StoreList => "list<store>",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One typed slot of a configuration store.
///
/// Exactly one variant is active at a time. Child stores are owned outright, so
/// dropping or replacing a value reclaims every store reachable through it.
///
/// # Examples
///
/// ```
/// use nvcfg::domain::{ConfigValue, ValueKind};
///
/// let value = ConfigValue::from("eth0");
/// assert_eq!(value.kind(), ValueKind::String);
///
/// let point = ConfigValue::from([51.5, -0.12]);
/// assert_eq!(point.kind(), ValueKind::DoubleList);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// A boolean
    Bool(bool),
    /// A 32-bit signed integer
    Int32(i32),
    /// A double precision float
    Double(f64),
    /// A UTF-8 string
    String(String),
    /// An owned child store
    Store(ConfigStore),
    /// A list of booleans
    BoolList(Vec<bool>),
    /// A list of 32-bit signed integers
    Int32List(Vec<i32>),
    /// A list of doubles
    DoubleList(Vec<f64>),
    /// A list of strings
    StringList(Vec<String>),
    /// A list of owned child stores
    StoreList(Vec<ConfigStore>),
}

impl ConfigValue {
    /// Returns the discriminant of the active variant.
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Int32(_) => ValueKind::Int32,
            ConfigValue::Double(_) => ValueKind::Double,
            ConfigValue::String(_) => ValueKind::String,
            ConfigValue::Store(_) => ValueKind::Store,
            ConfigValue::BoolList(_) => ValueKind::BoolList,
            ConfigValue::Int32List(_) => ValueKind::Int32List,
            ConfigValue::DoubleList(_) => ValueKind::DoubleList,
            ConfigValue::StringList(_) => ValueKind::StringList,
            ConfigValue::StoreList(_) => ValueKind::StoreList,
        }
    }

    /// Returns the string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the child store if this is a `Store` value.
    pub fn as_store(&self) -> Option<&ConfigStore> {
        match self {
            ConfigValue::Store(store) => Some(store),
            _ => None,
        }
    }

    /// Returns the child store mutably if this is a `Store` value.
    pub fn as_store_mut(&mut self) -> Option<&mut ConfigStore> {
        match self {
            ConfigValue::Store(store) => Some(store),
            _ => None,
        }
    }

    /// Returns the child stores if this is a `StoreList` value.
    pub fn as_store_list(&self) -> Option<&[ConfigStore]> {
        match self {
            ConfigValue::StoreList(stores) => Some(stores),
            _ => None,
        }
    }
}

/// A Rust type that maps onto one [`ConfigValue`] kind.
///
/// `matches` decides whether a stored value can be read as `Self`, `extract`
/// clones it out, and `Default` supplies the zero value returned on absence or
/// kind mismatch.
pub trait ConfigType: Sized + Default + Into<ConfigValue> {
    /// Returns true if `value` can be read as `Self`.
    fn matches(value: &ConfigValue) -> bool;

    /// Clones `value` out as `Self`, or `None` on a kind mismatch.
    fn extract(value: &ConfigValue) -> Option<Self>;
}

macro_rules! config_type {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for ConfigValue {
            fn from(value: $ty) -> Self {
                ConfigValue::$variant(value)
            }
        }

        impl ConfigType for $ty {
            fn matches(value: &ConfigValue) -> bool {
                matches!(value, ConfigValue::$variant(_))
            }

            fn extract(value: &ConfigValue) -> Option<Self> {
                match value {
                    ConfigValue::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }
    };
}

config_type!(bool, Bool);
config_type!(i32, Int32);
config_type!(f64, Double);
config_type!(String, String);
config_type!(ConfigStore, Store);
config_type!(Vec<bool>, BoolList);
config_type!(Vec<i32>, Int32List);
config_type!(Vec<f64>, DoubleList);
config_type!(Vec<String>, StringList);
config_type!(Vec<ConfigStore>, StoreList);

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<GeoPoint> for ConfigValue {
    fn from(value: GeoPoint) -> Self {
        ConfigValue::DoubleList(value.to_vec())
    }
}

// A geo point is a refinement of the double list: exactly two elements.
impl ConfigType for GeoPoint {
    fn matches(value: &ConfigValue) -> bool {
        matches!(value, ConfigValue::DoubleList(list) if list.len() == 2)
    }

    fn extract(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::DoubleList(list) => match list.as_slice() {
                [lat, lon] => Some([*lat, *lon]),
                _ => None,
            },
            _ => None,
        }
    }
}
