// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! This module defines the `ConfigurationService` trait, the main interface of
//! the crate. A service owns a [`ConfigStore`], fills it from layered sources
//! and writes it back to persistent storage.

use crate::domain::{ConfigStore, Result};
use std::fmt;

/// What a merge pass applied to the store.
///
/// Reading never fails; sources that could not be used are skipped and
/// counted here instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadReport {
    /// Files merged into the store, in the order they were applied.
    pub files_applied: Vec<String>,
    /// Files that were missing, too large, or not parseable.
    pub files_skipped: Vec<String>,
    /// True if an inline document was merged.
    pub inline_applied: bool,
    /// True if a persisted snapshot was trusted and merged.
    pub snapshot_applied: bool,
}

impl ReadReport {
    /// Returns true if no source contributed anything.
    pub fn is_empty(&self) -> bool {
        self.files_applied.is_empty() && !self.inline_applied && !self.snapshot_applied
    }
}

/// Where a successful save put the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReport {
    /// The binary snapshot was committed to the persistent region.
    Region {
        /// Encoded snapshot size.
        bytes: usize,
    },
    /// The pretty-printed document replaced the primary file.
    File {
        /// Path of the primary file.
        path: String,
        /// Encoded document size.
        bytes: usize,
    },
}

impl SaveReport {
    /// Returns the number of bytes written.
    pub fn bytes(&self) -> usize {
        match self {
            SaveReport::Region { bytes } | SaveReport::File { bytes, .. } => *bytes,
        }
    }
}

impl fmt::Display for SaveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveReport::Region { bytes } => write!(f, "{} bytes to persistent region", bytes),
            SaveReport::File { path, bytes } => write!(f, "{} bytes to '{}'", bytes, path),
        }
    }
}

/// The main trait for interacting with a configuration store and its sources.
///
/// # Examples
///
/// ```rust
/// use nvcfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let mut service = DefaultConfigService::builder()
///     .use_persistent(false)
///     .build()?;
///
/// service.read_str(r#"{"wifi": {"ssid": "lab"}}"#);
/// let ssid = service.store().child("wifi").map(|w| w.get::<String>("ssid"));
/// assert_eq!(ssid.as_deref(), Some("lab"));
/// # Ok(())
/// # }
/// ```
pub trait ConfigurationService {
    /// Returns the in-memory store.
    fn store(&self) -> &ConfigStore;

    /// Returns the in-memory store for modification.
    fn store_mut(&mut self) -> &mut ConfigStore;

    /// Merges the configured files, then the persisted snapshot if the
    /// persistent region is enabled and holds a genuine snapshot.
    fn read(&mut self) -> ReadReport;

    /// Merges the configured files, then `inline` on top of them.
    ///
    /// The persisted snapshot is not consulted.
    fn read_with(&mut self, inline: &str) -> ReadReport;

    /// Merges only `inline`. A malformed document changes nothing.
    fn read_str(&mut self, inline: &str) -> ReadReport;

    /// Writes the store to the persistent region, or to the primary file when
    /// the region is disabled.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the snapshot does not fit the region,
    /// `NoConfigFile` if no file is configured, `ShortWrite` if the file store
    /// accepted fewer bytes than encoded, and source or region errors from the
    /// underlying storage. The in-memory store is never modified.
    fn save(&mut self) -> Result<SaveReport>;
}
