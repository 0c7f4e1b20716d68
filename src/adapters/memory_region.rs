// SPDX-License-Identifier: MIT OR Apache-2.0

//! RAM-emulated persistent region.
//!
//! Behaves like an EEPROM emulation layer: `begin` copies the durable bytes
//! into a staging buffer, writes land in the buffer, and `commit` copies the
//! buffer back. A fresh region reads as erased (`0xFF`).

use crate::domain::{ConfigError, Result};
use crate::ports::region::check_bounds;
use crate::ports::{PersistentRegion, DEFAULT_REGION_CAPACITY};
use std::cell::RefCell;
use std::rc::Rc;

/// Value of an erased byte.
pub const ERASED_BYTE: u8 = 0xFF;

#[derive(Debug)]
struct State {
    durable: Vec<u8>,
    staged: Option<Vec<u8>>,
    commits: usize,
    fail_commit: bool,
}

/// A [`PersistentRegion`] kept in memory.
///
/// Clones share the same bytes, so tests can hand one handle to a service and
/// inspect the durable contents through another.
///
/// # Examples
///
/// ```rust
/// use nvcfg::adapters::MemoryRegion;
/// use nvcfg::ports::PersistentRegion;
///
/// let region = MemoryRegion::default();
/// assert_eq!(region.capacity(), 1024);
/// assert!(region.contents().iter().all(|b| *b == 0xFF));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    capacity: usize,
    state: Rc<RefCell<State>>,
}

impl MemoryRegion {
    /// Creates an erased region of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self::with_contents(capacity, &[])
    }

    /// Creates a region whose leading bytes are `contents`; the rest is erased.
    ///
    /// Contents longer than `capacity` are truncated.
    pub fn with_contents(capacity: usize, contents: &[u8]) -> Self {
        let mut durable = vec![ERASED_BYTE; capacity];
        let len = contents.len().min(capacity);
        durable[..len].copy_from_slice(&contents[..len]);
        Self {
            capacity,
            state: Rc::new(RefCell::new(State {
                durable,
                staged: None,
                commits: 0,
                fail_commit: false,
            })),
        }
    }

    /// Returns a copy of the durable bytes.
    pub fn contents(&self) -> Vec<u8> {
        self.state.borrow().durable.clone()
    }

    /// Returns how many commits have succeeded.
    pub fn commit_count(&self) -> usize {
        self.state.borrow().commits
    }

    /// Returns true while a `begin`/`end` bracket is open.
    pub fn is_open(&self) -> bool {
        self.state.borrow().staged.is_some()
    }

    /// Makes subsequent commits fail, simulating a worn or locked device.
    pub fn fail_commits(&self, fail: bool) {
        self.state.borrow_mut().fail_commit = fail;
    }
}

impl Default for MemoryRegion {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_CAPACITY)
    }
}

impl PersistentRegion for MemoryRegion {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn begin(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.staged.is_some() {
            return Err(ConfigError::region_error("region is already open"));
        }
        state.staged = Some(state.durable.clone());
        Ok(())
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()> {
        check_bounds(self.capacity, offset, buf.len())?;
        let state = self.state.borrow();
        let staged = state
            .staged
            .as_ref()
            .ok_or_else(|| ConfigError::region_error("read outside begin/end"))?;
        buf.copy_from_slice(&staged[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        check_bounds(self.capacity, offset, data.len())?;
        let mut state = self.state.borrow_mut();
        let staged = state
            .staged
            .as_mut()
            .ok_or_else(|| ConfigError::region_error("write outside begin/end"))?;
        staged[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_commit {
            return Err(ConfigError::region_error("commit failed"));
        }
        let staged = state
            .staged
            .clone()
            .ok_or_else(|| ConfigError::region_error("commit outside begin/end"))?;
        state.durable = staged;
        state.commits += 1;
        Ok(())
    }

    fn end(&mut self) {
        self.state.borrow_mut().staged = None;
    }
}
