// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests use property-based testing to verify that the store and the
//! document mapping handle arbitrary inputs correctly.

use nvcfg::prelude::*;
use proptest::prelude::*;

fn finite_double() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("non-finite doubles have no document form", |d| d.is_finite())
}

fn scalar_value() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        any::<bool>().prop_map(ConfigValue::from),
        any::<i32>().prop_map(ConfigValue::from),
        finite_double().prop_map(ConfigValue::from),
        "\\PC{0,16}".prop_map(ConfigValue::from),
        prop::collection::vec(any::<bool>(), 1..6).prop_map(ConfigValue::from),
        prop::collection::vec(any::<i32>(), 1..6).prop_map(ConfigValue::from),
        prop::collection::vec(finite_double(), 1..6).prop_map(ConfigValue::from),
        (finite_double(), finite_double()).prop_map(|(lat, lon)| ConfigValue::from([lat, lon])),
        prop::collection::vec("[a-z]{0,8}", 1..6).prop_map(ConfigValue::from),
    ]
}

fn store_strategy() -> impl Strategy<Value = ConfigStore> {
    let leaf = prop::collection::btree_map("[a-z]{1,8}", scalar_value(), 0..6)
        .prop_map(|entries| entries.into_iter().collect::<ConfigStore>());

    leaf.prop_recursive(2, 24, 4, |inner| {
        let nested = prop_oneof![
            inner.clone().prop_map(ConfigValue::from),
            prop::collection::vec(inner, 1..4).prop_map(ConfigValue::from),
        ];
        prop::collection::btree_map("[a-z]{1,8}", nested, 0..4)
            .prop_map(|children| children.into_iter().collect::<ConfigStore>())
    })
    .prop_map(|mut store| {
        store.remove("saved");
        store
    })
}

// Setting a value and reading it back under the same kind returns it
proptest! {
    #[test]
    fn test_set_then_get_i32(key in "[a-z]{1,12}", n in any::<i32>()) {
        let mut store = ConfigStore::new();
        store.set(key.as_str(), n);
        prop_assert!(store.is::<i32>(&key));
        prop_assert_eq!(store.get::<i32>(&key), n);
        prop_assert_eq!(store.get::<String>(&key), String::new());
        prop_assert!(!store.get::<bool>(&key));
    }
}

proptest! {
    #[test]
    fn test_set_then_get_string(key in "[a-z]{1,12}", s in "\\PC*") {
        let mut store = ConfigStore::new();
        store.set(key.as_str(), s.as_str());
        prop_assert_eq!(store.get::<String>(&key), s.clone());
        prop_assert_eq!(store.get_str(&key), s.as_str());
        prop_assert_eq!(store.get::<f64>(&key), 0.0);
    }
}

// The last write to a key wins, regardless of kind
proptest! {
    #[test]
    fn test_overwrite_changes_kind(key in "[a-z]{1,12}", b in any::<bool>(), n in any::<i32>()) {
        let mut store = ConfigStore::new();
        store.set(key.as_str(), b);
        store.set(key.as_str(), n);
        prop_assert_eq!(store.kind_of(&key), Some(ValueKind::Int32));
        prop_assert_eq!(store.len(), 1);
    }
}

// Keys always come back sorted
proptest! {
    #[test]
    fn test_keys_are_ordered(keys in prop::collection::vec("[a-z]{1,8}", 0..20)) {
        let mut store = ConfigStore::new();
        for key in &keys {
            store.set(key.as_str(), true);
        }
        let listed = store.keys();
        let mut sorted = listed.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(listed, sorted);
    }
}

// Encoding then decoding a store yields an equivalent store in every format
proptest! {
    #[test]
    fn test_document_round_trip(store in store_strategy()) {
        let restored = ConfigStore::from_document(&store.to_document());
        prop_assert_eq!(&restored, &store);
    }
}

proptest! {
    #[test]
    fn test_codec_round_trip(store in store_strategy()) {
        let service = DefaultConfigService::builder()
            .with_store(store.clone())
            .build()
            .unwrap();
        let codec = SerdeCodec::new();

        for format in [DocumentFormat::Minified, DocumentFormat::Pretty, DocumentFormat::Binary] {
            let bytes = service.to_bytes(format).unwrap();
            let doc = codec.decode(&bytes, format).unwrap();
            prop_assert_eq!(&ConfigStore::from_document(&doc), &store);
        }
    }
}

// Text formats reproduce every finite double bit for bit
proptest! {
    #[test]
    fn test_finite_doubles_survive_text_codecs(d in finite_double()) {
        let mut store = ConfigStore::new();
        store.set("d", d).set("pair", [d, -d]);
        let codec = SerdeCodec::new();

        for format in [DocumentFormat::Minified, DocumentFormat::Pretty] {
            let bytes = codec.serialize(&store, format).unwrap();
            let restored = codec.deserialize(&bytes, format).unwrap();
            prop_assert_eq!(restored.get::<f64>("d").to_bits(), d.to_bits());
            prop_assert_eq!(restored.get::<GeoPoint>("pair"), [d, -d]);
        }
    }
}

// Reading arbitrary bytes as a snapshot never panics and never trusts garbage
proptest! {
    #[test]
    fn test_random_region_contents(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let region = MemoryRegion::with_contents(64, &bytes);
        let mut service = DefaultConfigService::builder()
            .with_region(Box::new(region))
            .build()
            .unwrap();

        let report = service.read();
        if !report.snapshot_applied {
            prop_assert!(service.store().is_empty());
        }
    }
}

// Malformed inline text never changes the store
proptest! {
    #[test]
    fn test_inline_garbage_is_harmless(text in "[^{]\\PC*") {
        let mut service = DefaultConfigService::new();
        service.store_mut().set("x", 1);
        let report = service.read_str(&text);
        if !report.inline_applied {
            prop_assert_eq!(service.store().len(), 1);
            prop_assert_eq!(service.store().get::<i32>("x"), 1);
        }
    }
}
