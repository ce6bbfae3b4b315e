//! Item-set document model shared by the envelope scanner and checksum engine.
//!
//! # Responsibility
//! - Define the canonical shape of the JSON document embedded in a
//!   preferences envelope.
//! - Keep wire field names (`itemSets`, `timeStamp`, ...) stable across
//!   parse/serialize cycles.
//!
//! # Invariants
//! - Every sequence preserves insertion order.
//! - Fields the host application writes but core never reads are carried
//!   through unchanged, including unknown members.

pub mod item_set;
