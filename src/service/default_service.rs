// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default configuration service implementation.
//!
//! This module provides the default implementation of the `ConfigurationService`
//! trait. It layers configuration files, an inline document and a persisted
//! snapshot into one store, and saves the store back to either the persistent
//! region or the primary file.

use crate::adapters::SerdeCodec;
use crate::domain::document::{self, is_saved_snapshot};
use crate::domain::{
    ConfigError, ConfigStore, ConfigurationService, Document, ReadReport, Result, SaveReport,
    SourceDescriptor, SAVED_MARKER,
};
use crate::ports::{
    DocumentCodec, DocumentFormat, FileStore, PersistentRegion, RegionSession,
    DEFAULT_MAX_FILE_SIZE,
};
use std::fmt;

/// Default implementation of the configuration service.
///
/// Sources are applied from lowest to highest priority, each one overwriting
/// the keys it defines:
///
/// 1. the configured files, last file first, between the mount and unmount
///    hooks;
/// 2. an inline document, when given;
/// 3. the persisted snapshot, only through [`read`](ConfigurationService::read)
///    and only when the snapshot carries `"saved": true`.
///
/// # Examples
///
/// ```rust
/// use nvcfg::adapters::{MemoryFileStore, MemoryRegion};
/// use nvcfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let files = MemoryFileStore::new()
///     .with_file("/config.json", r#"{"x": 1}"#)
///     .with_file("/defaults.json", r#"{"x": 0, "y": 2}"#);
///
/// let mut service = DefaultConfigService::builder()
///     .with_file("/config.json")
///     .with_file("/defaults.json")
///     .with_file_store(Box::new(files))
///     .with_region(Box::new(MemoryRegion::default()))
///     .build()?;
///
/// service.read();
/// assert_eq!(service.store().get::<i32>("x"), 1);
/// assert_eq!(service.store().get::<i32>("y"), 2);
///
/// service.store_mut().set("x", 7);
/// service.save()?;
/// # Ok(())
/// # }
/// ```
pub struct DefaultConfigService {
    store: ConfigStore,
    sources: SourceDescriptor,
    file_store: Option<Box<dyn FileStore>>,
    region: Option<Box<dyn PersistentRegion>>,
    codec: Box<dyn DocumentCodec>,
    max_file_size: usize,
}

impl DefaultConfigService {
    /// Creates a service with no sources and an empty store.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nvcfg::prelude::*;
    ///
    /// let service = DefaultConfigService::new();
    /// assert!(service.store().is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            store: ConfigStore::new(),
            sources: SourceDescriptor::empty(),
            file_store: None,
            region: None,
            codec: Box::new(SerdeCodec::new()),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Creates a new configuration service builder.
    pub fn builder() -> ConfigServiceBuilder {
        ConfigServiceBuilder::new()
    }

    /// Creates a service rooted at the OS-appropriate configuration directory.
    ///
    /// Reads `/config.json` from that directory and keeps the persisted
    /// snapshot in `snapshot.bin` next to it, with the default region
    /// capacity.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use nvcfg::service::DefaultConfigService;
    ///
    /// # fn main() -> nvcfg::domain::Result<()> {
    /// let service = DefaultConfigService::with_defaults("sensor", "com.example")?;
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "fs")]
    pub fn with_defaults(app_name: &str, qualifier: &str) -> Result<Self> {
        use crate::adapters::{DirectoryFileStore, FileRegion};
        use crate::ports::DEFAULT_REGION_CAPACITY;

        let files = DirectoryFileStore::from_default_location(app_name, qualifier)?;
        let region = FileRegion::new(files.root().join("snapshot.bin"), DEFAULT_REGION_CAPACITY);

        Self::builder()
            .with_file("/config.json")
            .with_file_store(Box::new(files))
            .with_region(Box::new(region))
            .build()
    }

    /// Returns the source descriptor.
    pub fn sources(&self) -> &SourceDescriptor {
        &self.sources
    }

    /// Consumes the service, returning its store.
    pub fn into_store(self) -> ConfigStore {
        self.store
    }

    /// Encodes the store, including the `saved` marker, in `format`.
    pub fn to_bytes(&self, format: DocumentFormat) -> Result<Vec<u8>> {
        self.codec.serialize(&self.store, format)
    }

    /// Encodes the store as text.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` for [`DocumentFormat::Binary`], whose output is
    /// not UTF-8.
    pub fn to_string(&self, format: DocumentFormat) -> Result<String> {
        String::from_utf8(self.to_bytes(format)?)
            .map_err(|e| ConfigError::parse_error("Encoded document is not text", e))
    }

    fn merge(&mut self, inline: Option<&str>, snapshot: bool) -> ReadReport {
        let mut report = ReadReport::default();

        self.read_files(&mut report);

        if let Some(inline) = inline {
            report.inline_applied = self.read_inline(inline);
        }

        if snapshot {
            report.snapshot_applied = self.read_snapshot();
        }

        tracing::debug!(
            "Merged configuration: {} file(s) applied, {} skipped, inline {}, snapshot {}",
            report.files_applied.len(),
            report.files_skipped.len(),
            report.inline_applied,
            report.snapshot_applied
        );
        report
    }

    fn read_files(&mut self, report: &mut ReadReport) {
        if !self.sources.has_files() {
            return;
        }

        let Some(file_store) = self.file_store.as_deref_mut() else {
            tracing::warn!(
                "No file store configured, skipping {} configuration file(s)",
                self.sources.files().len()
            );
            report
                .files_skipped
                .extend(self.sources.files().iter().cloned());
            return;
        };

        let codec = &*self.codec;
        let store = &mut self.store;
        let max_file_size = self.max_file_size;

        tracing::debug!("Mounting file store '{}'", file_store.name());
        self.sources.mounted(|files| {
            if !file_store.is_mounted() {
                tracing::warn!(
                    "File store '{}' is not mounted, skipping {} configuration file(s)",
                    file_store.name(),
                    files.len()
                );
                report.files_skipped.extend(files.iter().cloned());
                return;
            }

            for path in files.iter().rev() {
                let applied = load_file(&mut *file_store, codec, max_file_size, path)
                    .map(|doc| apply_document(store, &doc));
                match applied {
                    Ok(true) => {
                        tracing::debug!("Applied configuration file '{}'", path);
                        report.files_applied.push(path.clone());
                    }
                    Ok(false) => {
                        tracing::warn!("Configuration file '{}' is not an object, skipping", path);
                        report.files_skipped.push(path.clone());
                    }
                    Err(e) => {
                        tracing::warn!("Skipping configuration file '{}': {}", path, e);
                        report.files_skipped.push(path.clone());
                    }
                }
            }
        });
    }

    fn read_inline(&mut self, inline: &str) -> bool {
        if inline.trim().is_empty() {
            return false;
        }

        match self.codec.decode(inline.as_bytes(), DocumentFormat::Minified) {
            Ok(doc) => apply_document(&mut self.store, &doc),
            Err(e) => {
                tracing::debug!("Ignoring inline document: {}", e);
                false
            }
        }
    }

    fn read_snapshot(&mut self) -> bool {
        let Some(region) = self.region.as_deref_mut() else {
            tracing::debug!("No persistent region configured");
            return false;
        };

        let bytes = match RegionSession::begin(region).and_then(|mut session| session.read_all()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Unable to read persistent region: {}", e);
                return false;
            }
        };

        let doc = match self.codec.decode(&bytes, DocumentFormat::Binary) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Persistent region holds no decodable snapshot: {}", e);
                return false;
            }
        };

        if !is_saved_snapshot(&doc) {
            tracing::warn!("Persistent snapshot is not marked saved, ignoring it");
            return false;
        }

        tracing::debug!("Applying persisted snapshot ({} bytes)", bytes.len());
        apply_document(&mut self.store, &doc)
    }

    fn save_region(&mut self, document: &Document) -> Result<SaveReport> {
        let bytes = self.codec.encode(document, DocumentFormat::Binary)?;
        let region = self
            .region
            .as_deref_mut()
            .ok_or_else(|| ConfigError::region_error("no persistent region configured"))?;

        let available = region.capacity();
        if bytes.len() > available {
            tracing::warn!(
                "Snapshot of {} bytes exceeds persistent capacity of {} bytes, not saving",
                bytes.len(),
                available
            );
            return Err(ConfigError::CapacityExceeded {
                attempted: bytes.len(),
                available,
            });
        }

        let mut session = RegionSession::begin(region)?;
        session.write(0, &bytes)?;
        session.commit()?;

        tracing::debug!("Saved {} byte snapshot to persistent region", bytes.len());
        Ok(SaveReport::Region { bytes: bytes.len() })
    }

    fn save_file(&mut self, document: &Document) -> Result<SaveReport> {
        let path = self
            .sources
            .primary_file()
            .ok_or(ConfigError::NoConfigFile)?
            .to_string();
        let bytes = self.codec.encode(document, DocumentFormat::Pretty)?;
        let file_store = self.file_store.as_deref_mut().ok_or_else(|| {
            ConfigError::source_error(path.as_str(), "No file store configured", None)
        })?;

        let written = self.sources.mounted(|_| {
            if !file_store.is_mounted() {
                return Err(ConfigError::source_error(
                    path.as_str(),
                    format!("File store '{}' is not mounted", file_store.name()),
                    None,
                ));
            }
            file_store.write(&path, &bytes)
        })?;

        if written < bytes.len() {
            tracing::warn!(
                "Short write to '{}': {} of {} bytes",
                path,
                written,
                bytes.len()
            );
            return Err(ConfigError::ShortWrite {
                path,
                written,
                expected: bytes.len(),
            });
        }

        tracing::debug!("Saved {} bytes to '{}'", written, path);
        Ok(SaveReport::File { path, bytes: written })
    }
}

/// Reads and decodes one configuration file.
fn load_file(
    files: &mut dyn FileStore,
    codec: &dyn DocumentCodec,
    max_file_size: usize,
    path: &str,
) -> Result<Document> {
    let bytes = files.read(path)?;
    if bytes.len() > max_file_size {
        return Err(ConfigError::source_error(
            path,
            format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                bytes.len(),
                max_file_size
            ),
            None,
        ));
    }
    codec.decode(&bytes, DocumentFormat::Minified)
}

/// Merges a decoded document into `store`. Returns false if the root is not an
/// object.
fn apply_document(store: &mut ConfigStore, doc: &Document) -> bool {
    let Some(object) = doc.as_object() else {
        return false;
    };
    document::merge_document(store, object);
    if object.contains_key(SAVED_MARKER) {
        store.remove(SAVED_MARKER);
    }
    true
}

impl Default for DefaultConfigService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultConfigService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultConfigService")
            .field("store", &self.store)
            .field("sources", &self.sources)
            .field("file_store", &self.file_store.as_ref().map(|s| s.name().to_string()))
            .field("region_capacity", &self.region.as_ref().map(|r| r.capacity()))
            .field("codec", &self.codec.name())
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

impl ConfigurationService for DefaultConfigService {
    fn store(&self) -> &ConfigStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    fn read(&mut self) -> ReadReport {
        let snapshot = self.sources.persistent_enabled();
        self.merge(None, snapshot)
    }

    fn read_with(&mut self, inline: &str) -> ReadReport {
        self.merge(Some(inline), false)
    }

    fn read_str(&mut self, inline: &str) -> ReadReport {
        ReadReport {
            inline_applied: self.read_inline(inline),
            ..ReadReport::default()
        }
    }

    fn save(&mut self) -> Result<SaveReport> {
        let document = self.store.to_document();
        if self.sources.persistent_enabled() {
            self.save_region(&document)
        } else {
            self.save_file(&document)
        }
    }
}

/// Builder for constructing a `DefaultConfigService`.
///
/// # Examples
///
/// ```rust
/// use nvcfg::adapters::MemoryFileStore;
/// use nvcfg::service::ConfigServiceBuilder;
///
/// # fn main() -> nvcfg::domain::Result<()> {
/// let service = ConfigServiceBuilder::new()
///     .with_file("/config.json")
///     .with_file_store(Box::new(MemoryFileStore::new()))
///     .use_persistent(false)
///     .on_mount(|| println!("flash on"))
///     .on_unmount(|| println!("flash off"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigServiceBuilder {
    store: ConfigStore,
    sources: SourceDescriptor,
    file_store: Option<Box<dyn FileStore>>,
    region: Option<Box<dyn PersistentRegion>>,
    codec: Option<Box<dyn DocumentCodec>>,
    max_file_size: usize,
}

impl ConfigServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            store: ConfigStore::new(),
            sources: SourceDescriptor::empty(),
            file_store: None,
            region: None,
            codec: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Replaces the whole source descriptor, hooks included.
    pub fn with_sources(mut self, sources: SourceDescriptor) -> Self {
        self.sources = sources;
        self
    }

    /// Appends a configuration file below those already added.
    ///
    /// The first file added has the highest priority and is the target of
    /// file-mode saves.
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.sources = self.sources.with_file(path);
        self
    }

    /// Appends several configuration files, highest priority first.
    pub fn with_files<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            self.sources = self.sources.with_file(path);
        }
        self
    }

    /// Sets the file store the configuration files live in.
    pub fn with_file_store(mut self, file_store: Box<dyn FileStore>) -> Self {
        self.file_store = Some(file_store);
        self
    }

    /// Sets the persistent region holding the binary snapshot.
    pub fn with_region(mut self, region: Box<dyn PersistentRegion>) -> Self {
        self.region = Some(region);
        self
    }

    /// Enables or disables the persistent region. Enabled by default.
    pub fn use_persistent(mut self, enabled: bool) -> Self {
        self.sources = self.sources.use_persistent(enabled);
        self
    }

    /// Sets the hook run before file access.
    pub fn on_mount(mut self, hook: impl FnMut() + 'static) -> Self {
        self.sources = self.sources.on_mount(hook);
        self
    }

    /// Sets the hook run after file access.
    pub fn on_unmount(mut self, hook: impl FnMut() + 'static) -> Self {
        self.sources = self.sources.on_unmount(hook);
        self
    }

    /// Replaces the default [`SerdeCodec`].
    pub fn with_codec(mut self, codec: Box<dyn DocumentCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Sets the largest configuration file that will be parsed.
    pub fn max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Seeds the service with an existing store, e.g. compiled-in defaults.
    pub fn with_store(mut self, store: ConfigStore) -> Self {
        self.store = store;
        self
    }

    /// Builds the configuration service.
    ///
    /// # Errors
    ///
    /// Returns a `RegionError` if the configured region has no capacity.
    pub fn build(self) -> Result<DefaultConfigService> {
        if let Some(region) = &self.region {
            if region.capacity() == 0 {
                return Err(ConfigError::region_error("persistent region has zero capacity"));
            }
        }

        Ok(DefaultConfigService {
            store: self.store,
            sources: self.sources,
            file_store: self.file_store,
            region: self.region,
            codec: self.codec.unwrap_or_else(|| Box::new(SerdeCodec::new())),
            max_file_size: self.max_file_size,
        })
    }
}

impl Default for ConfigServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
