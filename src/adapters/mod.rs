// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! The in-memory adapters work everywhere. The filesystem-backed adapters are
//! behind the `fs` feature.

#[cfg(feature = "fs")]
pub mod directory_file_store;
#[cfg(feature = "fs")]
pub mod file_region;
pub mod memory_file_store;
pub mod memory_region;
pub mod serde_codec;

// Re-export adapters based on feature flags
#[cfg(feature = "fs")]
pub use directory_file_store::DirectoryFileStore;
#[cfg(feature = "fs")]
pub use file_region::FileRegion;
pub use memory_file_store::MemoryFileStore;
pub use memory_region::MemoryRegion;
pub use serde_codec::SerdeCodec;
