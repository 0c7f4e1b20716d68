// SPDX-License-Identifier: MIT OR Apache-2.0

//! File store rooted at a host directory.
//!
//! This module provides a [`FileStore`] over `std::fs`, for hosts and for
//! simulation builds of firmware that normally talks to on-board flash.

use crate::domain::{ConfigError, Result};
use crate::ports::file_store::DEFAULT_MAX_FILE_SIZE;
use crate::ports::FileStore;
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// A [`FileStore`] whose paths resolve below a root directory.
///
/// Store paths such as `/config.json` are taken relative to the root. Paths
/// that would escape the root (`..`) are rejected. Writes go to a temporary
/// sibling file which is renamed over the target only after every byte was
/// written, so a failed save never leaves a truncated file behind.
///
/// # Examples
///
/// ```rust,no_run
/// use nvcfg::adapters::DirectoryFileStore;
///
/// let files = DirectoryFileStore::new("/var/lib/sensor");
/// let files = DirectoryFileStore::from_default_location("sensor", "com.example").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryFileStore {
    root: PathBuf,
    max_file_size: usize,
}

impl DirectoryFileStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Creates a store rooted at the OS-appropriate configuration directory.
    ///
    /// The directory is created if it does not exist yet.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "sensor")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            ConfigError::source_error("directory", "Failed to determine project directories", None)
        })?;

        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir).map_err(|e| {
            ConfigError::source_error(
                config_dir.display().to_string(),
                "Failed to create configuration directory",
                Some(Box::new(e)),
            )
        })?;

        Ok(Self::new(config_dir))
    }

    /// Sets the largest file the store will read.
    pub fn with_max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a store path onto the host filesystem.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(ConfigError::source_error(path, "Invalid configuration path", None));
        }
        Ok(self.root.join(relative))
    }
}

impl FileStore for DirectoryFileStore {
    fn name(&self) -> &str {
        "directory"
    }

    fn is_mounted(&self) -> bool {
        self.root.is_dir()
    }

    fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path)?;

        // Check file size before reading to avoid loading oversized files
        let metadata = fs::metadata(&full_path).map_err(|e| {
            ConfigError::source_error(path, "Unable to open file for read", Some(Box::new(e)))
        })?;

        if metadata.len() > self.max_file_size as u64 {
            return Err(ConfigError::source_error(
                path,
                format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    self.max_file_size
                ),
                None,
            ));
        }

        fs::read(&full_path).map_err(|e| {
            ConfigError::source_error(path, "Failed to read configuration file", Some(Box::new(e)))
        })
    }

    fn write(&mut self, path: &str, contents: &[u8]) -> Result<usize> {
        let full_path = self.resolve(path)?;
        let temp_path = full_path.with_extension("tmp");

        let written = (|| -> std::io::Result<usize> {
            let mut file = fs::File::create(&temp_path)?;
            let mut written = 0;
            while written < contents.len() {
                match file.write(&contents[written..])? {
                    0 => break,
                    n => written += n,
                }
            }
            if written == contents.len() {
                file.sync_all()?;
            }
            Ok(written)
        })()
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ConfigError::source_error(path, "Unable to open file for write", Some(Box::new(e)))
        })?;

        if written < contents.len() {
            let _ = fs::remove_file(&temp_path);
            return Ok(written);
        }

        // Atomic rename
        fs::rename(&temp_path, &full_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ConfigError::source_error(path, "Failed to replace configuration file", Some(Box::new(e)))
        })?;

        Ok(written)
    }
}
