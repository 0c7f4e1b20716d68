// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent region backed by an image file on the host.
//!
//! Lets simulation builds keep their EEPROM contents across runs. The image is
//! exactly `capacity` bytes; a missing image reads as erased.

use crate::adapters::memory_region::ERASED_BYTE;
use crate::domain::{ConfigError, Result};
use crate::ports::region::check_bounds;
use crate::ports::PersistentRegion;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A [`PersistentRegion`] stored in a host file.
///
/// `begin` loads the image into a staging buffer and `commit` replaces the
/// image file through a temporary file and rename.
#[derive(Debug)]
pub struct FileRegion {
    path: PathBuf,
    capacity: usize,
    staged: Option<Vec<u8>>,
}

impl FileRegion {
    /// Creates a region of `capacity` bytes stored at `path`.
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            staged: None,
        }
    }

    /// Returns the image file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_image(&self) -> Result<Vec<u8>> {
        let mut image = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        image.resize(self.capacity, ERASED_BYTE);
        Ok(image)
    }
}

impl PersistentRegion for FileRegion {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn begin(&mut self) -> Result<()> {
        if self.staged.is_some() {
            return Err(ConfigError::region_error("region is already open"));
        }
        self.staged = Some(self.load_image()?);
        Ok(())
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()> {
        check_bounds(self.capacity, offset, buf.len())?;
        let staged = self
            .staged
            .as_ref()
            .ok_or_else(|| ConfigError::region_error("read outside begin/end"))?;
        buf.copy_from_slice(&staged[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        check_bounds(self.capacity, offset, data.len())?;
        let staged = self
            .staged
            .as_mut()
            .ok_or_else(|| ConfigError::region_error("write outside begin/end"))?;
        staged[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let staged = self
            .staged
            .as_ref()
            .ok_or_else(|| ConfigError::region_error("commit outside begin/end"))?;

        let temp_path = self.path.with_extension("tmp");
        let replaced =
            fs::write(&temp_path, staged).and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = replaced {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn end(&mut self) {
        self.staged = None;
    }
}
