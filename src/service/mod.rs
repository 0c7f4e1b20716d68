// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration service implementation.
//!
//! This module contains the concrete implementation of the `ConfigurationService`
//! trait: the layered merge pipeline and the capacity-checked save.

pub mod default_service;

// Re-export commonly used types
pub use default_service::{ConfigServiceBuilder, DefaultConfigService};
