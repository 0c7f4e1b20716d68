// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration store.
//!
//! Every error in this crate is recoverable. Reading the wrong kind of value out
//! of a store is not an error at all (it yields the kind's zero value), so the
//! variants here only cover I/O, decoding, and capacity problems.

use thiserror::Error;

/// The main error type for configuration operations.
///
/// The enum is marked `#[non_exhaustive]` so new failure modes can be added
/// without breaking callers.
///
/// # Examples
///
/// ```
/// use nvcfg::domain::errors::ConfigError;
///
/// let err = ConfigError::CapacityExceeded {
///     attempted: 1500,
///     available: 1024,
/// };
/// assert!(err.to_string().contains("1500"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A file-backed source could not be opened or read.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source (usually the file path)
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A document or binary payload could not be decoded.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying decoding error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The encoded snapshot does not fit in the persistent region.
    #[error(
        "Encoded configuration is {attempted} bytes but the persistent region holds {available}; increase the region capacity"
    )]
    CapacityExceeded {
        /// Size of the encoded payload in bytes
        attempted: usize,
        /// Capacity of the persistent region in bytes
        available: usize,
    },

    /// The file store accepted fewer bytes than were handed to it.
    #[error("Short write to '{path}': {written} of {expected} bytes written")]
    ShortWrite {
        /// The file being written
        path: String,
        /// Bytes actually written
        written: usize,
        /// Bytes that should have been written
        expected: usize,
    },

    /// A file save was requested but no configuration file is configured.
    #[error("No configuration file is configured for saving")]
    NoConfigFile,

    /// The persistent region rejected an access.
    #[error("Persistent region error: {message}")]
    RegionError {
        /// The error message
        message: String,
    },

    /// An I/O error occurred while reading or writing configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `SourceError` for the named source.
    pub fn source_error(
        source_name: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ConfigError::SourceError {
            source_name: source_name.into(),
            message: message.into(),
            source,
        }
    }

    /// Creates a `ParseError` wrapping the underlying decoder error.
    pub fn parse_error<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::ParseError {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a `RegionError`.
    pub fn region_error(message: impl Into<String>) -> Self {
        ConfigError::RegionError {
            message: message.into(),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
