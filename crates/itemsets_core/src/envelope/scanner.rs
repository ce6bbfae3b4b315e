//! Document boundary detection.

use super::{EnvelopeError, EnvelopeResult, CLOSE_DELIMITER, MARKER, OPEN_DELIMITER};
use crate::model::item_set::ItemSetDocument;
use log::{debug, warn};
use std::ops::Range;

/// Offsets of the first marker whose checksum field is followed by `{`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStart {
    /// Offset of the `0x06` marker byte.
    pub marker: usize,
    /// Offset of the opening `{`.
    pub start: usize,
}

impl DocumentStart {
    /// Width of the checksum field between marker and document (2 or 3).
    pub fn checksum_width(&self) -> usize {
        self.start - self.marker - 1
    }
}

/// Located document record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSpan {
    pub marker: usize,
    pub start: usize,
    /// Exclusive end, one past the balancing `}`.
    pub end: usize,
}

impl DocumentSpan {
    /// Byte range of the document text. Empty when the balancing brace
    /// precedes the start.
    pub fn document_range(&self) -> Range<usize> {
        self.start..self.end.max(self.start)
    }
}

/// Finds the first marker followed, after a 2 or 3-byte field, by `{`.
///
/// The 2-byte layout is checked first, so a 3-byte field whose last byte is
/// `0x7B` is taken as a 2-byte field.
pub fn find_document_start(bytes: &[u8]) -> Option<DocumentStart> {
    bytes
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == MARKER)
        .find_map(|(marker, _)| {
            [marker + 3, marker + 4]
                .into_iter()
                .find(|offset| bytes.get(*offset) == Some(&OPEN_DELIMITER))
                .map(|start| DocumentStart { marker, start })
        })
}

/// Finds the exclusive end of the single balanced brace region in `bytes`.
///
/// Scans from offset 0. `}` bytes seen before any `{` are ignored. Returns
/// `Ok(None)` when braces never balance.
///
/// # Errors
/// - [`EnvelopeError::Ambiguous`] when braces balance more than once.
pub fn find_document_end(bytes: &[u8]) -> EnvelopeResult<Option<usize>> {
    let mut opens = 0usize;
    let mut closes = 0usize;
    let mut end = None;

    for (offset, byte) in bytes.iter().enumerate() {
        if *byte == OPEN_DELIMITER {
            opens += 1;
        }
        if opens > 0 && *byte == CLOSE_DELIMITER {
            closes += 1;
            if opens == closes {
                if end.is_some() {
                    return Err(EnvelopeError::Ambiguous);
                }
                end = Some(offset + 1);
            }
        }
    }

    Ok(end)
}

/// Locates the document record in `bytes`.
///
/// # Errors
/// - [`EnvelopeError::NotFound`] when no start or no end exists.
/// - [`EnvelopeError::Ambiguous`] from [`find_document_end`].
pub fn locate_document(bytes: &[u8]) -> EnvelopeResult<DocumentSpan> {
    let result = find_document_start(bytes)
        .ok_or(EnvelopeError::NotFound)
        .and_then(|start| {
            find_document_end(bytes)?
                .map(|end| DocumentSpan {
                    marker: start.marker,
                    start: start.start,
                    end,
                })
                .ok_or(EnvelopeError::NotFound)
        });

    match &result {
        Ok(span) => debug!(
            "event=envelope_locate module=envelope status=ok len={} marker={} start={} end={}",
            bytes.len(),
            span.marker,
            span.start,
            span.end
        ),
        Err(err) => warn!(
            "event=envelope_locate module=envelope status=error len={} error={:?}",
            bytes.len(),
            err
        ),
    }
    result
}

/// Locates and decodes the item-set document embedded in `bytes`.
///
/// # Errors
/// - Everything [`locate_document`] returns.
/// - [`EnvelopeError::MalformedDocument`] when the located bytes are not a
///   JSON item-set document.
pub fn extract_document(bytes: &[u8]) -> EnvelopeResult<ItemSetDocument> {
    let span = locate_document(bytes)?;
    ItemSetDocument::from_json_slice(&bytes[span.document_range()]).map_err(|err| {
        warn!(
            "event=envelope_decode module=envelope status=error start={} end={} line={} column={}",
            span.start,
            span.end,
            err.line(),
            err.column()
        );
        EnvelopeError::MalformedDocument(err.to_string())
    })
}
