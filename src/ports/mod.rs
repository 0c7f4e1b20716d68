// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits describe the external collaborators of the configuration
//! store: the document codec, the hierarchical file store, and the fixed
//! capacity persistent region. Adapters implement them.

pub mod codec;
pub mod file_store;
pub mod region;

// Re-export commonly used types
pub use codec::{DocumentCodec, DocumentFormat};
pub use file_store::{FileStore, DEFAULT_MAX_FILE_SIZE};
pub use region::{PersistentRegion, RegionSession, DEFAULT_REGION_CAPACITY};
