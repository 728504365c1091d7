// LongMap unit test suite (public API).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round trip: put(k, v) then get(k) yields v.
// - Uniqueness: overwriting a key never changes len().
// - Absent values: put(k, None) errors and leaves the map untouched.
// - Resize transparency: growth and shrink keep every entry reachable.
// - Clear: resets len, keys, values and capacity.
use long_map::{LongMap, LongMapConfig, LongMapError, MIN_CAPACITY};
use std::collections::BTreeSet;

// Builds a key whose folded hash is `hash`, distinct per `salt`.
fn colliding_key(salt: i64, hash: u32) -> i64 {
    (salt << 32) | i64::from(salt as u32 ^ hash)
}

// Test: basic put/get.
// Verifies: stored value comes back; an unknown key is absent.
#[test]
fn basic_put_get() {
    let mut m: LongMap<&str> = LongMap::new();
    assert_eq!(m.put(5, "a"), Ok(&"a"));
    assert_eq!(m.get(5), Some(&"a"));
    assert_eq!(m.get(6), None);
    assert_eq!(m.len(), 1);
    assert!(!m.is_empty());
}

// Test: overwrite keeps a single entry.
// Verifies: the latest value wins and len() stays at one.
#[test]
fn overwrite_keeps_size() {
    let mut m: LongMap<&str> = LongMap::new();
    m.put(1, "x").unwrap();
    m.put(1, "y").unwrap();
    assert_eq!(m.get(1), Some(&"y"));
    assert_eq!(m.len(), 1);
    assert_eq!(m.insert(1, "z"), Some("y"));
    assert_eq!(m.len(), 1);
}

// Test: delete then reinsert.
// Assumes: removal leaves a tombstone that later inserts may reuse.
// Verifies: removed key is absent; reinserting yields the new value.
#[test]
fn delete_then_reinsert() {
    let mut m: LongMap<&str> = LongMap::new();
    m.put(2, "v").unwrap();
    assert_eq!(m.remove(2), Some("v"));
    assert_eq!(m.get(2), None);
    m.put(2, "w").unwrap();
    assert_eq!(m.get(2), Some(&"w"));
    assert_eq!(m.len(), 1);
}

// Test: removal of a missing key.
// Verifies: returns None and len() is unchanged.
#[test]
fn remove_missing_is_noop() {
    let mut m = LongMap::new();
    for k in 0..10 {
        m.insert(k, k);
    }
    assert_eq!(m.remove(99), None);
    assert_eq!(m.remove(99), None);
    assert_eq!(m.len(), 10);
}

// Test: growth past the top load factor.
// Verifies: capacity increases and keys() still holds the full set.
#[test]
fn growth_keeps_every_key() {
    let mut m: LongMap<String> = LongMap::new();
    let inserted: BTreeSet<i64> = (0..1000).map(|k| k * 7919 - 3_000_000).collect();
    for &k in &inserted {
        m.put(k, k.to_string()).unwrap();
    }
    assert!(m.capacity() > MIN_CAPACITY);
    assert_eq!(m.len(), inserted.len());
    let keys: BTreeSet<i64> = m.keys().into_iter().collect();
    assert_eq!(keys, inserted);
    for &k in &inserted {
        assert_eq!(m.get(k), Some(&k.to_string()));
    }
}

// Test: shrink after mass removal.
// Verifies: survivors stay reachable and capacity never drops below the floor.
#[test]
fn shrink_keeps_survivors() {
    let mut m = LongMap::new();
    for k in 0..2000i64 {
        m.insert(k, k);
    }
    let grown = m.capacity();
    for k in 0..1990i64 {
        assert_eq!(m.remove(k), Some(k));
        assert!(m.capacity() >= MIN_CAPACITY);
    }
    assert!(m.capacity() < grown);
    for k in 1990..2000i64 {
        assert_eq!(m.get(k), Some(&k));
    }
    assert_eq!(m.len(), 10);
}

// Test: clear.
// Verifies: len 0, is_empty, keys/values empty, capacity back to the floor.
#[test]
fn clear_resets_everything() {
    let mut m = LongMap::new();
    for k in -100..100 {
        m.insert(k, k);
    }
    m.clear();
    assert_eq!(m.len(), 0);
    assert!(m.is_empty());
    assert!(m.keys().is_empty());
    assert!(m.values().is_empty());
    assert_eq!(m.capacity(), MIN_CAPACITY);
    assert_eq!(m.get(0), None);

    m.insert(3, 3);
    assert_eq!(m.keys(), vec![3]);
}

// Test: empty map accessors.
// Verifies: keys() and values() are empty vectors, not errors.
#[test]
fn empty_map_views() {
    let m: LongMap<String> = LongMap::new();
    assert!(m.keys().is_empty());
    assert!(m.values().is_empty());
    assert_eq!(m.iter().count(), 0);
    assert!(!m.contains_key(0));
}

// Test: absent values.
// Verifies: put(None) errors with the key; contains_value(None) is false.
#[test]
fn absent_value_contracts() {
    let mut m: LongMap<String> = LongMap::new();
    let err = m.put(4, None::<String>).unwrap_err();
    assert_eq!(err, LongMapError::AbsentValue { key: 4 });
    assert_eq!(err.to_string(), "absent value for key 4");
    assert!(m.is_empty());

    m.put(4, "four".to_string()).unwrap();
    assert!(m.contains_value(&"four".to_string()));
    assert!(!m.contains_value(&"five".to_string()));
    assert!(!m.contains_value(None::<&String>));
}

// Test: extreme keys.
// Assumes: the folded hash of i64::MIN is 2^31 and must still index in range.
// Verifies: round trip for boundary keys.
#[test]
fn boundary_keys_round_trip() {
    let mut m: LongMap<usize> = LongMap::new();
    let keys = [0, 1, -1, i64::MAX, i64::MIN, 0x8000_0000, -0x8000_0000, u32::MAX as i64];
    for (i, &k) in keys.iter().enumerate() {
        m.put(k, i).unwrap();
    }
    for (i, &k) in keys.iter().enumerate() {
        assert_eq!(m.get(k), Some(&i));
        assert!(m.contains_key(k));
    }
    assert_eq!(m.len(), keys.len());
}

// Test: colliding keys through the public API.
// Assumes: keys with the same folded hash share a probe sequence.
// Verifies: every key is reachable, removable, and counted once.
#[test]
fn colliding_keys_round_trip() {
    let mut m: LongMap<i64> = LongMap::new();
    let keys: Vec<i64> = (1..=60).map(|s| colliding_key(s, 12345)).collect();
    for &k in &keys {
        m.put(k, k).unwrap();
    }
    let stats = m.stats();
    assert_eq!(stats.len, 60);
    assert!(stats.overflow_len >= 50);
    for &k in &keys {
        assert_eq!(m.get(k), Some(&k));
    }
    for &k in keys.iter().step_by(2) {
        assert_eq!(m.remove(k), Some(k));
    }
    assert_eq!(m.len(), 30);
    for (i, &k) in keys.iter().enumerate() {
        assert_eq!(m.contains_key(k), i % 2 == 1);
    }
}

// Test: custom configuration.
// Verifies: invalid configs are rejected; initial capacity is honored and restored by clear.
#[test]
fn config_is_validated_and_applied() {
    let bad = LongMapConfig::new().with_top_load_factor(0.1).with_bottom_load_factor(0.5);
    assert!(matches!(
        LongMap::<u8>::with_config(bad),
        Err(LongMapError::InvalidConfig(_))
    ));
    // Thresholds this close would resize on every insert/remove pair.
    let thrashing = LongMapConfig::new().with_top_load_factor(0.6).with_bottom_load_factor(0.5);
    assert!(matches!(
        LongMap::<u8>::with_config(thrashing),
        Err(LongMapError::InvalidConfig(_))
    ));

    let cfg = LongMapConfig::new().with_initial_capacity(100).with_max_probe(4);
    let mut m = LongMap::with_config(cfg).unwrap();
    assert_eq!(m.capacity(), 100);
    for k in 0..500 {
        m.insert(k, k as u8);
    }
    assert!(m.capacity() >= 500);
    m.clear();
    assert_eq!(m.capacity(), 100);
    assert_eq!(m.config().max_probe(), 4);
}

// Test: in-place mutation.
// Verifies: get_mut and iter_mut changes are visible through get.
#[test]
fn mutation_through_references() {
    let mut m = LongMap::new();
    for k in 0..50 {
        m.insert(k, k * 2);
    }
    *m.get_mut(10).unwrap() += 1;
    assert_eq!(m.get(10), Some(&21));
    assert!(m.get_mut(1000).is_none());

    for (_, v) in m.iter_mut() {
        *v = -*v;
    }
    assert_eq!(m.get(10), Some(&-21));
    assert_eq!(m.get(49), Some(&-98));
}
