//! Item-set document types.
//!
//! # Responsibility
//! - Deserialize the embedded document into explicit, defaulted records.
//! - Provide builders matching the defaults the host client writes for a
//!   freshly created custom item set.
//!
//! # Invariants
//! - Missing collections decode as empty sequences, missing strings as `""`.
//!   Both are written back explicitly (`[]`, `""`).
//! - Typed scalars the checksum ignores (`timeStamp`, `uid`, item `id` and
//!   `count`, ...) are optional: absent members stay absent on re-serialize.
//!   An explicit `null` in one of them reads as absent and is dropped.
//! - Unknown members land in `extra` and are written back verbatim.
//! - `title` and block `type` lengths are measured in UTF-16 code units.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Item set kind written by the client for user-created sets.
pub const ITEM_SET_TYPE_CUSTOM: &str = "custom";
/// Mode/map value meaning "applies everywhere".
pub const SCOPE_ANY: &str = "any";
/// Prefix the client puts in front of every item set uid.
pub const UID_PREFIX: &str = "LOL_";

/// Map or champion identifier as stored in `associatedMaps` /
/// `associatedChampions`.
pub type AssociationId = i64;

/// Root document embedded in the preferences envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSetDocument {
    /// Ordered item sets. Order is significant for the checksum.
    #[serde(default)]
    pub item_sets: Vec<ItemSet>,
    /// Unix epoch milliseconds of the last client-side save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemSetDocument {
    /// Creates an empty document stamped with `time_stamp`.
    pub fn new(time_stamp: i64) -> Self {
        Self {
            item_sets: Vec::new(),
            time_stamp: Some(time_stamp),
            extra: Map::new(),
        }
    }

    /// Appends an item set and returns a handle to it for further edits.
    pub fn push_item_set(&mut self, item_set: ItemSet) -> &mut ItemSet {
        self.item_sets.push(item_set);
        let last = self.item_sets.len() - 1;
        &mut self.item_sets[last]
    }

    /// Parses a document from raw JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serializes the document as compact JSON, the form the client writes.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// One item set (a titled build with blocks of items).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub title: String,
    /// Serialized as `type` to match the client schema.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortrank: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_global_for_maps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_global_for_champions: Option<bool>,
    #[serde(default)]
    pub associated_maps: Vec<AssociationId>,
    #[serde(default)]
    pub associated_champions: Vec<AssociationId>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemSet {
    /// Creates a custom item set with the defaults the client assigns to a
    /// new, empty set: global for every map and champion, mode/map `any`.
    pub fn custom(title: impl Into<String>) -> Self {
        Self {
            uid: Some(new_uid()),
            title: title.into(),
            kind: Some(ITEM_SET_TYPE_CUSTOM.to_string()),
            mode: Some(SCOPE_ANY.to_string()),
            map: Some(SCOPE_ANY.to_string()),
            sortrank: Some(0),
            priority: Some(false),
            is_global_for_maps: Some(true),
            is_global_for_champions: Some(true),
            ..Self::default()
        }
    }

    /// Restricts the set to `map_id`; the set stops being map-global.
    pub fn add_map(&mut self, map_id: AssociationId) -> &mut Self {
        self.associated_maps.push(map_id);
        self.is_global_for_maps = Some(false);
        self
    }

    /// Restricts the set to `champion_id`; the set stops being
    /// champion-global.
    pub fn add_champion(&mut self, champion_id: AssociationId) -> &mut Self {
        self.associated_champions.push(champion_id);
        self.is_global_for_champions = Some(false);
        self
    }

    /// Appends a block and returns a handle to it.
    pub fn add_block(&mut self, block: Block) -> &mut Block {
        self.blocks.push(block);
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }
}

/// Titled group of items inside an item set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block heading, e.g. `starting`. Serialized as `type`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Appends one copy of item `id`.
    pub fn add_item(&mut self, id: i64) -> &mut Self {
        self.items.push(Item::new(id, 1));
        self
    }
}

/// Single item entry of a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(id: i64, count: i64) -> Self {
        Self {
            id: Some(id),
            count: Some(count),
            extra: Map::new(),
        }
    }
}

/// Number of UTF-16 code units in `value`, the unit the client counts in.
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn new_uid() -> String {
    format!(
        "{UID_PREFIX}{}",
        Uuid::new_v4().hyphenated().to_string().to_ascii_uppercase()
    )
}
