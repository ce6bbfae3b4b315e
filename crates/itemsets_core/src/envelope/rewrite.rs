//! Envelope construction around a new document.

use super::scanner::locate_document;
use super::{EnvelopeError, EnvelopeResult, MARKER};
use crate::checksum::calculate_checksum;
use crate::model::item_set::ItemSetDocument;
use log::info;

/// Builds a bare document record: marker, checksum field, compact JSON.
///
/// Documents with an empty `itemSets` list have a 1-byte checksum; the
/// resulting record is written as-is but cannot be located by the scanner.
/// The same holds when a checksum byte is itself `0x7B` (`{`), as for a
/// single set titled with 36 UTF-16 units (`[0x84, 0x7B]`): the stray
/// delimiter keeps the brace count from balancing.
///
/// # Errors
/// - [`EnvelopeError::InvalidInput`] when the document cannot be serialized.
pub fn encode_envelope(document: &ItemSetDocument) -> EnvelopeResult<Vec<u8>> {
    let mut record = Vec::new();
    append_record(&mut record, document)?;
    Ok(record)
}

/// Replaces the document record inside `envelope`.
///
/// Bytes up to and including the marker and bytes after the old document
/// are kept. The checksum field is rewritten for the new document and may
/// change width.
///
/// The output is written even when the new checksum contains a delimiter
/// or marker byte (`0x7B`, `0x7D`, `0x06`). Such an envelope cannot be read
/// back by [`extract_document`](super::extract_document); see
/// [`encode_envelope`].
///
/// # Errors
/// - Everything [`locate_document`](super::locate_document) returns for
///   `envelope`.
/// - [`EnvelopeError::InvalidInput`] when `document` cannot be serialized.
pub fn rewrite_envelope(envelope: &[u8], document: &ItemSetDocument) -> EnvelopeResult<Vec<u8>> {
    let span = locate_document(envelope)?;
    if span.end <= span.start {
        return Err(EnvelopeError::MalformedDocument(
            "document end precedes its start".to_string(),
        ));
    }

    let mut rewritten = Vec::with_capacity(envelope.len());
    rewritten.extend_from_slice(&envelope[..span.marker]);
    append_record(&mut rewritten, document)?;
    rewritten.extend_from_slice(&envelope[span.end..]);

    info!(
        "event=envelope_rewrite module=envelope status=ok item_sets={} old_len={} new_len={}",
        document.item_sets.len(),
        envelope.len(),
        rewritten.len()
    );
    Ok(rewritten)
}

fn append_record(out: &mut Vec<u8>, document: &ItemSetDocument) -> EnvelopeResult<()> {
    let json = document
        .to_json_vec()
        .map_err(|err| EnvelopeError::InvalidInput(err.to_string()))?;
    let checksum = calculate_checksum(document);

    out.push(MARKER);
    out.extend_from_slice(&checksum.to_bytes());
    out.extend_from_slice(&json);
    Ok(())
}
