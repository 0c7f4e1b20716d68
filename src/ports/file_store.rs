// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical file store trait definition.

use crate::domain::Result;

/// Largest configuration file read by default (64 KiB).
///
/// Configuration documents are small; anything larger is rejected as a source
/// error instead of being parsed.
pub const DEFAULT_MAX_FILE_SIZE: usize = 64 * 1024;

/// A trait for the hierarchical file storage holding configuration files.
///
/// Paths are store-relative, slash separated strings such as `/config.json`.
/// Files are read and written whole; an implementation opens, transfers and
/// closes the file within a single call.
///
/// The configuration service brackets every use of a file store between the
/// mount and unmount hooks of its
/// [`SourceDescriptor`](crate::domain::SourceDescriptor).
pub trait FileStore {
    /// Returns a short identifier used in log messages.
    fn name(&self) -> &str;

    /// Returns true if the underlying storage is currently mounted.
    fn is_mounted(&self) -> bool;

    /// Reads the complete contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the file is missing or cannot be read.
    fn read(&mut self, path: &str) -> Result<Vec<u8>>;

    /// Replaces the file at `path` with `contents`.
    ///
    /// Returns the number of bytes written. A count lower than
    /// `contents.len()` is reported by the caller as a short write, and the
    /// implementation must leave the previous file in place in that case.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the file cannot be opened for writing.
    fn write(&mut self, path: &str, contents: &[u8]) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;
    use std::collections::BTreeMap;

    struct TestStore {
        files: BTreeMap<String, Vec<u8>>,
    }

    impl FileStore for TestStore {
        fn name(&self) -> &str {
            "test"
        }

        fn is_mounted(&self) -> bool {
            true
        }

        fn read(&mut self, path: &str) -> Result<Vec<u8>> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| ConfigError::source_error(path, "not found", None))
        }

        fn write(&mut self, path: &str, contents: &[u8]) -> Result<usize> {
            self.files.insert(path.to_string(), contents.to_vec());
            Ok(contents.len())
        }
    }

    #[test]
    fn test_file_store_write_then_read() {
        let mut store = TestStore {
            files: BTreeMap::new(),
        };
        assert_eq!(store.write("/a.json", b"{}").unwrap(), 2);
        assert_eq!(store.read("/a.json").unwrap(), b"{}");
    }

    #[test]
    fn test_file_store_missing_file() {
        let mut store = TestStore {
            files: BTreeMap::new(),
        };
        assert!(matches!(
            store.read("/missing.json"),
            Err(ConfigError::SourceError { .. })
        ));
    }

    #[test]
    fn test_file_store_is_object_safe() {
        let store: Box<dyn FileStore> = Box::new(TestStore {
            files: BTreeMap::new(),
        });
        assert_eq!(store.name(), "test");
    }
}
