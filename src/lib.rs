// SPDX-License-Identifier: MIT OR Apache-2.0

//! A configuration store for embedded devices, in hexagonal architecture.
//!
//! This crate holds a tree of named, dynamically-typed values, merges that tree
//! from layered sources (configuration files, an inline document, a persisted
//! snapshot) and writes it back either as a pretty-printed document or as a
//! compact binary snapshot bounded by a fixed-capacity persistent region.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The value model and store (`ConfigValue`, `ConfigStore`),
//!   the document mapping, errors, and the `ConfigurationService` trait
//! - **Ports**: Trait definitions for external collaborators (`DocumentCodec`,
//!   `FileStore`, `PersistentRegion`)
//! - **Adapters**: Implementations of the ports (JSON/CBOR codec, in-memory and
//!   filesystem-backed stores and regions)
//! - **Service**: The merge pipeline and persistence controller
//!
//! # Features
//!
//! - **Typed values**: booleans, 32-bit integers, doubles, strings, nested stores,
//!   and homogeneous lists of each; reading the wrong kind yields its zero value
//! - **Layered sources**: files in priority order, then an inline document, then a
//!   persisted snapshot trusted only when it is marked saved
//! - **Bounded persistence**: a snapshot that does not fit the region is rejected
//!   before any byte is written
//!
//! # Feature Flags
//!
//! - `fs`: Enable the directory-backed file store and file-backed region (default)
//!
//! # Quick Start
//!
//! ```rust
//! use nvcfg::adapters::{MemoryFileStore, MemoryRegion};
//! use nvcfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let files = MemoryFileStore::new().with_file("/config.json", r#"{"net": {"dhcp": true}}"#);
//!
//! let mut service = DefaultConfigService::builder()
//!     .with_file("/config.json")
//!     .with_file_store(Box::new(files))
//!     .with_region(Box::new(MemoryRegion::default()))
//!     .build()?;
//!
//! service.read();
//! let dhcp = service.store().child("net").is_some_and(|net| net.get::<bool>("dhcp"));
//! assert!(dhcp);
//!
//! service.store_mut().set("hostname", "node-7");
//! service.save()?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigStore, ConfigType, ConfigValue, ConfigurationService,
        Document, GeoPoint, ReadReport, Result, SaveReport, SourceDescriptor, ValueKind,
    };
    pub use crate::ports::{DocumentCodec, DocumentFormat, FileStore, PersistentRegion};
    pub use crate::service::{ConfigServiceBuilder, DefaultConfigService};

    pub use crate::adapters::{MemoryFileStore, MemoryRegion, SerdeCodec};
    #[cfg(feature = "fs")]
    pub use crate::adapters::{DirectoryFileStore, FileRegion};
}
