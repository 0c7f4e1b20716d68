// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory file store.
//!
//! Useful on targets without a filesystem, where configuration files are baked
//! into the firmware image, and in tests. Clones share the same files, so a
//! caller can keep a handle to inspect what a service wrote.

use crate::domain::{ConfigError, Result};
use crate::ports::FileStore;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    mounted: bool,
    write_limit: Option<usize>,
    read_only: bool,
}

/// A [`FileStore`] holding its files in memory.
///
/// # Examples
///
/// ```rust
/// use nvcfg::adapters::MemoryFileStore;
/// use nvcfg::ports::FileStore;
///
/// let files = MemoryFileStore::new().with_file("/config.json", r#"{"x":1}"#);
/// let mut handle = files.clone();
///
/// assert_eq!(handle.read("/config.json").unwrap(), br#"{"x":1}"#);
/// handle.write("/config.json", b"{}").unwrap();
/// assert_eq!(files.contents("/config.json").unwrap(), b"{}");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFileStore {
    state: Rc<RefCell<State>>,
}

impl MemoryFileStore {
    /// Creates an empty, mounted store.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                files: BTreeMap::new(),
                mounted: true,
                write_limit: None,
                read_only: false,
            })),
        }
    }

    /// Adds a file, builder style.
    pub fn with_file(self, path: impl Into<String>, contents: impl AsRef<[u8]>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl Into<String>, contents: impl AsRef<[u8]>) {
        self.state
            .borrow_mut()
            .files
            .insert(path.into(), contents.as_ref().to_vec());
    }

    /// Returns a copy of the file at `path`.
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.state.borrow().files.get(path).cloned()
    }

    /// Marks the store as mounted or unmounted.
    pub fn set_mounted(&self, mounted: bool) {
        self.state.borrow_mut().mounted = mounted;
    }

    /// Accepts at most `limit` bytes per write, simulating a full medium.
    ///
    /// A write that would exceed the limit leaves the previous file in place
    /// and reports how many bytes fit.
    pub fn limit_writes(&self, limit: usize) {
        self.state.borrow_mut().write_limit = Some(limit);
    }

    /// Rejects every write as if the file could not be opened.
    pub fn set_read_only(&self, read_only: bool) {
        self.state.borrow_mut().read_only = read_only;
    }
}

impl Default for MemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore for MemoryFileStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let state = self.state.borrow();
        if !state.mounted {
            return Err(ConfigError::source_error(path, "file store not mounted", None));
        }
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ConfigError::source_error(path, "unable to open file for read", None))
    }

    fn write(&mut self, path: &str, contents: &[u8]) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        if !state.mounted || state.read_only {
            return Err(ConfigError::source_error(path, "unable to open file for write", None));
        }
        if let Some(limit) = state.write_limit {
            if contents.len() > limit {
                return Ok(limit);
            }
        }
        state.files.insert(path.to_string(), contents.to_vec());
        Ok(contents.len())
    }
}
