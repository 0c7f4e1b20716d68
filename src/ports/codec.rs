// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document codec trait definition.
//!
//! This module defines the `DocumentCodec` trait, which converts between the
//! generic document tree and bytes in one of the supported output formats.

use crate::domain::{ConfigError, ConfigStore, Document, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The output formats a document can be encoded to.
///
/// All three formats carry the same tree, so decoding any of them reproduces an
/// equivalent store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Compact single-line text
    #[default]
    Minified,
    /// Indented, human readable text
    Pretty,
    /// Compact binary encoding, used for the persistent region
    Binary,
}

impl DocumentFormat {
    /// Returns true for the two text formats.
    pub fn is_text(self) -> bool {
        !matches!(self, DocumentFormat::Binary)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Minified => f.write_str("minified"),
            DocumentFormat::Pretty => f.write_str("pretty"),
            DocumentFormat::Binary => f.write_str("binary"),
        }
    }
}

/// A trait for encoding and decoding document trees.
///
/// Decoding failures must be reported as
/// [`ConfigError::ParseError`](crate::domain::ConfigError::ParseError), never
/// by panicking. Both text formats decode with the same text parser.
///
/// # Examples
///
/// ```rust
/// use nvcfg::domain::{ConfigError, Document, Result};
/// use nvcfg::ports::{DocumentCodec, DocumentFormat};
///
/// struct TextOnly;
///
/// impl DocumentCodec for TextOnly {
///     fn name(&self) -> &str {
///         "text-only"
///     }
///
///     fn encode(&self, document: &Document, _format: DocumentFormat) -> Result<Vec<u8>> {
///         Ok(document.to_string().into_bytes())
///     }
///
///     fn decode(&self, bytes: &[u8], _format: DocumentFormat) -> Result<Document> {
///         serde_json::from_slice(bytes).map_err(|e| ConfigError::parse_error("bad text", e))
///     }
/// }
///
/// let codec = TextOnly;
/// let doc = codec.decode(br#"{"x":1}"#, DocumentFormat::Minified).unwrap();
/// assert_eq!(doc["x"], 1);
/// ```
pub trait DocumentCodec {
    /// Returns a short identifier used in log messages.
    fn name(&self) -> &str;

    /// Encodes `document` in the requested format.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying serializer fails, which does not
    /// happen for trees produced by the document mapper.
    fn encode(&self, document: &Document, format: DocumentFormat) -> Result<Vec<u8>>;

    /// Decodes bytes in the given format into a document tree.
    ///
    /// Trailing bytes after a complete binary document are ignored, so a
    /// persistent region can be decoded without knowing the payload length.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the bytes are not a valid document.
    fn decode(&self, bytes: &[u8], format: DocumentFormat) -> Result<Document>;

    /// Encodes a store, including the `saved` marker.
    fn serialize(&self, store: &ConfigStore, format: DocumentFormat) -> Result<Vec<u8>> {
        self.encode(&store.to_document(), format)
    }

    /// Decodes bytes into a fresh store.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the bytes are not a valid document or the
    /// root of the document is not an object.
    fn deserialize(&self, bytes: &[u8], format: DocumentFormat) -> Result<ConfigStore> {
        let document = self.decode(bytes, format)?;
        if !document.is_object() {
            return Err(ConfigError::ParseError {
                message: "document root is not an object".to_string(),
                source: None,
            });
        }
        Ok(ConfigStore::from_document(&document))
    }
}
