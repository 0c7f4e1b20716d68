// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the value model and the document mapping.
//!
//! Nothing in this module performs I/O. The store, its typed values, and the
//! translation to and from the generic document tree are pure in-memory logic.
//! The ports and adapters layers deal with bytes and devices.

pub mod config_key;
pub mod config_value;
pub mod document;
pub mod errors;
pub mod service;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::{ConfigType, ConfigValue, GeoPoint, ValueKind};
pub use document::{Document, SAVED_MARKER};
pub use errors::{ConfigError, Result};
pub use service::{ConfigurationService, ReadReport, SaveReport};
pub use source::{MountHook, SourceDescriptor};
pub use store::ConfigStore;
