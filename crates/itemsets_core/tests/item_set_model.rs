use itemsets_core::{Block, Item, ItemSet, ItemSetDocument};
use serde_json::json;

#[test]
fn custom_item_set_serializes_with_client_field_names() {
    let mut set = ItemSet::custom("Custom Item Set 1");
    set.uid = Some("LOL_4A10C341-090D-0A22-4209-ECE41F1DB04F".to_string());
    set.add_map(10);
    set.add_block(Block::new("starting")).add_item(3340);

    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json["uid"], "LOL_4A10C341-090D-0A22-4209-ECE41F1DB04F");
    assert_eq!(json["type"], "custom");
    assert_eq!(json["mode"], "any");
    assert_eq!(json["map"], "any");
    assert_eq!(json["sortrank"], 0);
    assert_eq!(json["priority"], false);
    assert_eq!(json["isGlobalForMaps"], false);
    assert_eq!(json["isGlobalForChampions"], true);
    assert_eq!(json["associatedMaps"], json!([10]));
    assert_eq!(json["associatedChampions"], json!([]));
    assert_eq!(
        json["blocks"],
        json!([{"type": "starting", "items": [{"id": 3340, "count": 1}]}])
    );

    let decoded: ItemSet = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, set);
}

#[test]
fn document_uses_camel_case_root_fields() {
    let mut doc = ItemSetDocument::new(1_402_018_653_132);
    doc.push_item_set(ItemSet::custom(""));

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["timeStamp"], 1_402_018_653_132_i64);
    assert!(json["itemSets"].is_array());
    assert_eq!(json.as_object().map(|root| root.len()), Some(2));
}

#[test]
fn pass_through_fields_round_trip_unchanged() {
    let source = json!({
        "uid": "LOL_7962AA86-44CC-5D6F-4959-B68C8B1D0888",
        "type": "global",
        "mode": "ARAM",
        "map": "HA",
        "sortrank": 4,
        "priority": true,
        "isGlobalForMaps": false,
        "isGlobalForChampions": true,
        "title": "ARAM",
        "associatedMaps": [12],
        "associatedChampions": [],
        "blocks": []
    });

    let set: ItemSet = serde_json::from_value(source.clone()).unwrap();
    assert_eq!(set.mode.as_deref(), Some("ARAM"));
    assert_eq!(set.sortrank, Some(4));
    assert_eq!(serde_json::to_value(&set).unwrap(), source);
}

#[test]
fn json_bytes_helpers_round_trip() {
    let mut doc = ItemSetDocument::new(42);
    doc.push_item_set(ItemSet::custom("Custom"))
        .add_block(Block::new("core"))
        .add_item(3031);

    let bytes = doc.to_json_vec().unwrap();
    assert!(bytes.starts_with(b"{\"itemSets\":["));
    assert_eq!(ItemSetDocument::from_json_slice(&bytes).unwrap(), doc);
}

#[test]
fn item_keeps_count() {
    let item: Item = serde_json::from_value(json!({"id": 2003, "count": 4})).unwrap();
    assert_eq!(item, Item::new(2003, 4));
}
