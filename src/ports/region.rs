// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-capacity persistent byte region trait definition.
//!
//! This is the EEPROM-style non-volatile region that holds the binary
//! configuration snapshot. Accesses are bracketed by `begin` and `end`, and
//! writes only become durable on `commit`.

use crate::domain::{ConfigError, Result};

/// Default capacity of a persistent region in bytes.
pub const DEFAULT_REGION_CAPACITY: usize = 1024;

/// A trait for a fixed-capacity, byte-addressable persistent region.
///
/// Implementations stage writes between `begin` and `commit`: bytes written
/// but never committed must not reach durable storage, and `end` without a
/// prior `commit` discards them.
///
/// Prefer [`RegionSession`] over calling `begin`/`end` directly.
pub trait PersistentRegion {
    /// Returns the total number of bytes the region can hold.
    fn capacity(&self) -> usize;

    /// Opens the region for access.
    fn begin(&mut self) -> Result<()>;

    /// Fills `buf` with the bytes starting at `offset`.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()>;

    /// Stages `data` at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()>;

    /// Makes every staged write durable.
    fn commit(&mut self) -> Result<()>;

    /// Closes the region, discarding uncommitted writes.
    fn end(&mut self);
}

/// Checks that `len` bytes at `offset` fit in a region of `capacity` bytes.
pub fn check_bounds(capacity: usize, offset: usize, len: usize) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(ConfigError::region_error(format!(
            "access of {} bytes at offset {} exceeds capacity {}",
            len, offset, capacity
        ))),
    }
}

/// An open `begin`/`end` bracket over a persistent region.
///
/// `end` runs when the session is dropped, so every early return through `?`
/// still closes the region.
///
/// # Examples
///
/// ```
/// use nvcfg::adapters::MemoryRegion;
/// use nvcfg::ports::RegionSession;
///
/// # fn main() -> nvcfg::domain::Result<()> {
/// let mut region = MemoryRegion::new(16);
/// {
///     let mut session = RegionSession::begin(&mut region)?;
///     session.write(0, b"abc")?;
///     session.commit()?;
/// }
/// assert_eq!(&region.contents()[..3], b"abc");
/// # Ok(())
/// # }
/// ```
pub struct RegionSession<'a> {
    region: &'a mut dyn PersistentRegion,
}

impl<'a> RegionSession<'a> {
    /// Begins a session on `region`.
    pub fn begin(region: &'a mut dyn PersistentRegion) -> Result<Self> {
        region.begin()?;
        Ok(Self { region })
    }

    /// Returns the capacity of the underlying region.
    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    /// Reads the whole region.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.region.capacity()];
        self.region.read(0, &mut buf)?;
        Ok(buf)
    }

    /// Stages `data` at `offset`.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        check_bounds(self.region.capacity(), offset, data.len())?;
        self.region.write(offset, data)
    }

    /// Makes staged writes durable.
    pub fn commit(&mut self) -> Result<()> {
        self.region.commit()
    }
}

impl Drop for RegionSession<'_> {
    fn drop(&mut self) {
        self.region.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingRegion {
        begins: usize,
        ends: usize,
        commits: usize,
        staged: Vec<u8>,
    }

    impl PersistentRegion for CountingRegion {
        fn capacity(&self) -> usize {
            8
        }

        fn begin(&mut self) -> Result<()> {
            self.begins += 1;
            self.staged = vec![0; 8];
            Ok(())
        }

        fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()> {
            buf.copy_from_slice(&self.staged[offset..offset + buf.len()]);
            Ok(())
        }

        fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
            self.staged[offset..offset + data.len()].copy_from_slice(data);
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            self.commits += 1;
            Ok(())
        }

        fn end(&mut self) {
            self.ends += 1;
        }
    }

    #[test]
    fn test_check_bounds() {
        assert!(check_bounds(8, 0, 8).is_ok());
        assert!(check_bounds(8, 4, 4).is_ok());
        assert!(check_bounds(8, 4, 5).is_err());
        assert!(check_bounds(8, usize::MAX, 1).is_err());
    }

    #[test]
    fn test_session_ends_on_drop() {
        let mut region = CountingRegion::default();
        {
            let mut session = RegionSession::begin(&mut region).unwrap();
            session.write(0, b"hi").unwrap();
            session.commit().unwrap();
        }
        assert_eq!(region.begins, 1);
        assert_eq!(region.commits, 1);
        assert_eq!(region.ends, 1);
    }

    #[test]
    fn test_session_ends_after_error() {
        let mut region = CountingRegion::default();
        let result = (|| -> Result<()> {
            let mut session = RegionSession::begin(&mut region)?;
            session.write(4, b"too long")?;
            session.commit()
        })();

        assert!(matches!(result, Err(ConfigError::RegionError { .. })));
        assert_eq!(region.commits, 0);
        assert_eq!(region.ends, 1);
    }

    #[test]
    fn test_read_all_covers_capacity() {
        let mut region = CountingRegion::default();
        let mut session = RegionSession::begin(&mut region).unwrap();
        assert_eq!(session.read_all().unwrap().len(), 8);
        assert_eq!(session.capacity(), 8);
    }
}
