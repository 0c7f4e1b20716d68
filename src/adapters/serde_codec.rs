// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document codec backed by `serde_json` and `ciborium`.
//!
//! Text formats are JSON; the binary format is CBOR, which keeps snapshots
//! small enough for a kilobyte-sized persistent region.

use crate::domain::{ConfigError, Document, Result};
use crate::ports::{DocumentCodec, DocumentFormat};

/// The default [`DocumentCodec`]: JSON text and CBOR binary.
///
/// # Examples
///
/// ```rust
/// use nvcfg::adapters::SerdeCodec;
/// use nvcfg::ports::{DocumentCodec, DocumentFormat};
/// use serde_json::json;
///
/// let codec = SerdeCodec::new();
/// let doc = json!({ "port": 8080 });
///
/// let text = codec.encode(&doc, DocumentFormat::Minified).unwrap();
/// assert_eq!(text, br#"{"port":8080}"#);
///
/// let binary = codec.encode(&doc, DocumentFormat::Binary).unwrap();
/// assert_eq!(codec.decode(&binary, DocumentFormat::Binary).unwrap(), doc);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeCodec;

impl SerdeCodec {
    /// Creates a new codec.
    pub fn new() -> Self {
        SerdeCodec
    }
}

impl DocumentCodec for SerdeCodec {
    fn name(&self) -> &str {
        "serde"
    }

    fn encode(&self, document: &Document, format: DocumentFormat) -> Result<Vec<u8>> {
        match format {
            DocumentFormat::Minified => serde_json::to_vec(document)
                .map_err(|e| ConfigError::parse_error("Failed to encode JSON", e)),
            DocumentFormat::Pretty => serde_json::to_vec_pretty(document)
                .map_err(|e| ConfigError::parse_error("Failed to encode JSON", e)),
            DocumentFormat::Binary => {
                let mut buf = Vec::new();
                ciborium::into_writer(document, &mut buf)
                    .map_err(|e| ConfigError::parse_error("Failed to encode CBOR", e))?;
                Ok(buf)
            }
        }
    }

    fn decode(&self, bytes: &[u8], format: DocumentFormat) -> Result<Document> {
        match format {
            DocumentFormat::Minified | DocumentFormat::Pretty => serde_json::from_slice(bytes)
                .map_err(|e| ConfigError::parse_error(format!("Failed to parse JSON: {}", e), e)),
            DocumentFormat::Binary => ciborium::from_reader(bytes)
                .map_err(|e| ConfigError::parse_error(format!("Failed to parse CBOR: {}", e), e)),
        }
    }
}
