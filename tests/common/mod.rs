// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helper utilities shared by the integration tests.

use nvcfg::adapters::SerdeCodec;
use nvcfg::ports::{DocumentCodec, DocumentFormat};
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;

/// Counts how often the mount and unmount hooks ran.
#[derive(Debug, Clone, Default)]
pub struct HookCounter {
    mounts: Rc<Cell<usize>>,
    unmounts: Rc<Cell<usize>>,
}

#[allow(dead_code)]
impl HookCounter {
    /// Creates a counter with both counts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a mount hook feeding this counter.
    pub fn mount_hook(&self) -> impl FnMut() + 'static {
        let mounts = Rc::clone(&self.mounts);
        move || mounts.set(mounts.get() + 1)
    }

    /// Returns an unmount hook feeding this counter.
    pub fn unmount_hook(&self) -> impl FnMut() + 'static {
        let unmounts = Rc::clone(&self.unmounts);
        move || unmounts.set(unmounts.get() + 1)
    }

    /// Returns how often the mount hook ran.
    pub fn mounts(&self) -> usize {
        self.mounts.get()
    }

    /// Returns how often the unmount hook ran.
    pub fn unmounts(&self) -> usize {
        self.unmounts.get()
    }
}

/// Encodes `doc` the way a persisted snapshot is stored.
#[allow(dead_code)]
pub fn snapshot_bytes(doc: &Value) -> Vec<u8> {
    SerdeCodec::new()
        .encode(doc, DocumentFormat::Binary)
        .expect("snapshot encodes")
}

/// Installs a test-friendly tracing subscriber once per test binary.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
