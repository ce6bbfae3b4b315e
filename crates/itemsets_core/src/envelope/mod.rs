//! Preferences envelope handling.
//!
//! # Responsibility
//! - Locate the item-set document inside an opaque preferences blob.
//! - Build envelopes around a (re)written document with a fresh checksum.
//!
//! # Invariants
//! - Entry points take raw bytes; decoded text never reaches the scanner.
//! - The end of the document is found by balancing braces over the whole
//!   input, starting at offset 0 rather than at the document start. Two
//!   balanced regions anywhere in the input are reported as ambiguous. This
//!   mirrors the client-side consumer and is kept for parity even though it
//!   can reject envelopes with stray balanced braces before the marker.
//!
//! # Layout
//! `... 0x06 <checksum: 2 or 3 bytes> {<json document>} ...`

use std::error::Error;
use std::fmt::{Display, Formatter};

mod rewrite;
mod scanner;

pub use rewrite::{encode_envelope, rewrite_envelope};
pub use scanner::{
    extract_document, find_document_end, find_document_start, locate_document, DocumentSpan,
    DocumentStart,
};

/// Byte that precedes the checksum field of the document record.
pub const MARKER: u8 = 0x06;
pub const OPEN_DELIMITER: u8 = b'{';
pub const CLOSE_DELIMITER: u8 = b'}';

pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Envelope scanning and rewriting errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// No marker followed by a document start, or the document never closes.
    NotFound,
    /// More than one balanced brace region exists in the input.
    Ambiguous,
    /// The located bytes are not a valid item-set document.
    MalformedDocument(String),
    /// The document handed in for embedding cannot be serialized.
    InvalidInput(String),
}

impl Display for EnvelopeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "could not find any item sets; add one in the client to use as a starting point"
            ),
            Self::Ambiguous => write!(f, "found an unexpected number of item sets; aborting"),
            Self::MalformedDocument(message) => {
                write!(f, "embedded item sets are malformed: {message}")
            }
            Self::InvalidInput(message) => write!(f, "invalid item set document: {message}"),
        }
    }
}

impl Error for EnvelopeError {}
