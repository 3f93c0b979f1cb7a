#![cfg(feature = "serde")]

use nullable_sorted_map::NullableSortedMap;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A map read back from its serialized form is equal to the original and enumerates in the
    /// same order.
    #[test]
    fn roundtrip_preserves_entries_and_order(
        entries in proptest::collection::vec((proptest::option::of("[a-z]{0,6}"), any::<i64>()), 0..200),
    ) {
        let map: NullableSortedMap<String, i64> = entries.into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        let restored: NullableSortedMap<String, i64> = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(&restored, &map);
        prop_assert!(restored.iter().eq(map.iter()));
        prop_assert_eq!(restored.value_hash(), map.value_hash());
    }
}

#[test]
fn roundtrip_with_absent_key_holding_null_like_value() {
    let map: NullableSortedMap<i32, Option<i32>> = NullableSortedMap::from([(None, None), (Some(1), Some(1))]);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, "[[[1,1]],true,null]");

    let restored: NullableSortedMap<i32, Option<i32>> = serde_json::from_str(&json).unwrap();
    assert!(restored.contains_key(None));
    assert_eq!(restored, map);
}

#[test]
fn roundtrip_empty_map() {
    let map: NullableSortedMap<i32, i32> = NullableSortedMap::new();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, "[[],false]");
    let restored: NullableSortedMap<i32, i32> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
}

#[test]
fn restored_map_is_writable() {
    let frozen = NullableSortedMap::from([(Some(1), 1)]).into_read_only();
    let json = serde_json::to_string(&frozen).unwrap();
    let mut restored: NullableSortedMap<i32, i32> = serde_json::from_str(&json).unwrap();
    assert!(!restored.is_read_only());
    restored.add(None, 0).unwrap();
    assert_eq!(restored.len(), 2);
}

#[test]
fn unsorted_input_is_sorted_on_read() {
    let restored: NullableSortedMap<i32, &str> = serde_json::from_str(r#"[[[3,"c"],[1,"a"],[2,"b"]],false]"#).unwrap();
    let keys: Vec<_> = restored.keys().iter().collect();
    assert_eq!(keys, [Some(&1), Some(&2), Some(&3)]);
}

#[test]
fn malformed_input_is_rejected() {
    for input in [r#"[]"#, r#"[[]]"#, r#"[[[1,"a"]],"yes"]"#, r#"{"a":1}"#] {
        let result: Result<NullableSortedMap<i32, String>, _> = serde_json::from_str(input);
        assert!(result.is_err(), "{input} should not deserialize");
    }
}
