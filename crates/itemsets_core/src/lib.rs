//! Core logic for reading and rewriting client item-set preferences.
//! This crate owns the envelope format and the checksum the client verifies.

pub mod checksum;
pub mod envelope;
pub mod logging;
pub mod model;

pub use checksum::{calculate_checksum, Checksum};
pub use envelope::{
    encode_envelope, extract_document, find_document_end, find_document_start, locate_document,
    rewrite_envelope, DocumentSpan, DocumentStart, EnvelopeError, EnvelopeResult,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::item_set::{AssociationId, Block, Item, ItemSet, ItemSetDocument};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
