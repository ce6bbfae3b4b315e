//! Checksum the client stores in front of the item-set document.
//!
//! # Responsibility
//! - Reproduce the client's checksum for a document, bit for bit.
//! - Encode the finalized value in the 1, 2 or 3-byte big-endian form the
//!   envelope expects.
//!
//! # Invariants
//! - The computation is a pure function of document shape and lengths.
//! - Accumulator state lives in one call; nothing is shared across calls.
//! - Arithmetic is `i64`; truncation happens only in [`Checksum::to_bytes`].

mod accumulator;

use crate::model::item_set::{utf16_len, AssociationId, ItemSet, ItemSetDocument};
use accumulator::Accumulator;
use log::debug;

const ITEM_SET_COST: i64 = 608;
/// Taken back before each item set is added.
const ITEM_SET_REBATE: i64 = 128;
const SEPARATOR_COST: i64 = 2;
const ASSOCIATION_COST: i64 = 2;
const BLOCK_COST: i64 = 44;
const ITEM_COST: i64 = 46;
const CHAR_COST: i64 = 2;

const TWO_BYTE_LIMIT: i64 = 0xFFFF;
const ONE_BYTE_LIMIT: i64 = 128;
const WIDE_STEP: i64 = 0x8000;
const WIDE_OFFSET: i64 = 0x80_8000;

/// Finalized checksum value together with its encoded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
    value: i64,
    width: usize,
}

impl Checksum {
    /// Finalizes a raw accumulator total.
    ///
    /// Totals above `0xFFFF` are shifted by one `0x8000` step per full
    /// `0x8000` past the limit, then offset by `0x808000`.
    pub fn from_total(total: i64) -> Self {
        if total > TWO_BYTE_LIMIT {
            let steps = (total - TWO_BYTE_LIMIT).div_euclid(WIDE_STEP);
            Self {
                value: total + steps * WIDE_STEP + WIDE_OFFSET,
                width: 3,
            }
        } else if total > ONE_BYTE_LIMIT {
            Self {
                value: total,
                width: 2,
            }
        } else {
            Self {
                value: total,
                width: 1,
            }
        }
    }

    /// Finalized value. For 3-byte checksums this is the adjusted total.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Encoded length in bytes (1, 2 or 3).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Big-endian encoding, truncated to [`Checksum::width`] bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let be = self.value.to_be_bytes();
        be[be.len() - self.width..].to_vec()
    }

    /// Lowercase hex rendering of [`Checksum::to_bytes`].
    pub fn to_hex(&self) -> String {
        self.to_bytes()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

/// Computes the checksum the client expects for `document`.
pub fn calculate_checksum(document: &ItemSetDocument) -> Checksum {
    let mut acc = Accumulator::new();

    for (index, item_set) in document.item_sets.iter().enumerate() {
        add_item_set(&mut acc, index, item_set);
    }

    let checksum = Checksum::from_total(acc.total());
    debug!(
        "event=checksum_computed module=checksum status=ok item_sets={} total={} value={} width={}",
        document.item_sets.len(),
        acc.total(),
        checksum.value(),
        checksum.width()
    );
    checksum
}

// Step order matters: each accumulate call may cross a band.
fn add_item_set(acc: &mut Accumulator, index: usize, item_set: &ItemSet) {
    acc.rebate(ITEM_SET_REBATE);
    acc.accumulate(ITEM_SET_COST);
    acc.accumulate(text_cost(&item_set.title));
    if index > 0 {
        acc.accumulate(SEPARATOR_COST);
    }

    for id in item_set
        .associated_maps
        .iter()
        .chain(item_set.associated_champions.iter())
    {
        acc.accumulate(ASSOCIATION_COST);
        acc.accumulate(decimal_digits(*id) * CHAR_COST);
    }

    for (block_index, block) in item_set.blocks.iter().enumerate() {
        acc.accumulate(BLOCK_COST);
        acc.accumulate(text_cost(&block.kind));
        if block_index > 0 {
            acc.accumulate(SEPARATOR_COST);
        }

        for item_index in 0..block.items.len() {
            acc.accumulate(ITEM_COST);
            if item_index > 0 {
                acc.accumulate(SEPARATOR_COST);
            }
        }
    }
}

fn text_cost(value: &str) -> i64 {
    utf16_len(value) as i64 * CHAR_COST
}

/// Length of the decimal rendering of `id`, sign included.
fn decimal_digits(id: AssociationId) -> i64 {
    id.to_string().len() as i64
}

#[cfg(test)]
mod tests {
    use super::{calculate_checksum, decimal_digits, Checksum};
    use crate::model::item_set::{Block, ItemSet, ItemSetDocument};

    #[test]
    fn decimal_digits_counts_sign() {
        assert_eq!(decimal_digits(1), 1);
        assert_eq!(decimal_digits(10), 2);
        assert_eq!(decimal_digits(-7), 2);
    }

    #[test]
    fn finalization_picks_width_from_total() {
        assert_eq!(Checksum::from_total(83).to_bytes(), vec![0x53]);
        assert_eq!(Checksum::from_total(128).width(), 1);
        assert_eq!(Checksum::from_total(129).width(), 2);
        assert_eq!(Checksum::from_total(0xFFFF).to_bytes(), vec![0xFF, 0xFF]);
    }

    #[test]
    fn wide_totals_step_per_full_0x8000() {
        // One full step past 0xFFFF.
        let checksum = Checksum::from_total(0xFFFF + 0x8000);
        assert_eq!(checksum.value(), 0xFFFF + 0x8000 + 0x8000 + 0x80_8000);
        assert_eq!(checksum.width(), 3);

        let just_over = Checksum::from_total(0x1_0000);
        assert_eq!(just_over.value(), 0x1_0000 + 0x80_8000);
        assert_eq!(just_over.to_bytes(), vec![0x81, 0x80, 0x00]);
    }

    #[test]
    fn hex_rendering_matches_bytes() {
        assert_eq!(Checksum::from_total(33843).to_hex(), "8433");
    }

    #[test]
    fn checksum_does_not_mutate_document() {
        let mut doc = ItemSetDocument::new(1_402_323_520_721);
        doc.push_item_set(ItemSet::custom("Custom"))
            .add_block(Block::new("starting"))
            .add_item(3000);
        let before = doc.clone();

        let _ = calculate_checksum(&doc);
        assert_eq!(doc, before);
    }
}
