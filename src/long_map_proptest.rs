#![cfg(test)]

// Property tests for LongMap kept inside the crate so the colliding-key
// helper from the slot table tests is reachable.

use crate::config::LongMapConfig;
use crate::error::LongMapError;
use crate::long_map::LongMap;
use crate::slot_table::tests::colliding_key;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, the pool
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    PutNone(usize),
    Get(usize),
    Remove(usize),
    Contains(usize),
    ContainsValue(i32),
    Mutate(usize, i32),
    Keys,
    Values,
    Clear,
}

fn arb_ops(pool_len: usize) -> impl Strategy<Value = Vec<OpI>> {
    let idx = 0..pool_len;
    let op = prop_oneof![
        6 => (idx.clone(), -50..50i32).prop_map(|(i, v)| OpI::Put(i, v)),
        1 => idx.clone().prop_map(OpI::PutNone),
        2 => idx.clone().prop_map(OpI::Get),
        3 => idx.clone().prop_map(OpI::Remove),
        1 => idx.clone().prop_map(OpI::Contains),
        1 => (-50..50i32).prop_map(OpI::ContainsValue),
        1 => (idx, any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
        1 => Just(OpI::Keys),
        1 => Just(OpI::Values),
        1 => Just(OpI::Clear),
    ];
    proptest::collection::vec(op, 1..200)
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i64>, Vec<OpI>)> {
    proptest::collection::vec(any::<i64>(), 1..=48)
        .prop_flat_map(|pool| {
            let n = pool.len();
            (Just(pool), arb_ops(n))
        })
}

// Keys that all fold to the same 32-bit hash, so they share one probe
// sequence and most of them land in the overflow store.
fn arb_colliding_scenario() -> impl Strategy<Value = (Vec<i64>, Vec<OpI>)> {
    (0..1u32 << 31, 4..=40usize).prop_flat_map(|(hash, n)| {
        let pool: Vec<i64> = (1..=n as i64).map(|s| colliding_key(s, hash)).collect();
        (Just(pool), arb_ops(n))
    })
}

// Drives `sut` and a std HashMap model through the same operations.
// Invariants checked after every op:
// - get/contains_key/len/is_empty parity with the model.
// - keys() has no duplicates and equals the model key set.
// - stats: table_len + overflow_len == len.
fn run_state_machine(
    mut sut: LongMap<i32>,
    pool: &[i64],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<i64, i32> = HashMap::new();
    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = pool[i];
                let stored = *sut.put(k, v).expect("present value accepted");
                prop_assert_eq!(stored, v);
                model.insert(k, v);
            }
            OpI::PutNone(i) => {
                let k = pool[i];
                let before = sut.get(k).copied();
                prop_assert_eq!(sut.put(k, None::<i32>), Err(LongMapError::AbsentValue { key: k }));
                prop_assert_eq!(sut.get(k).copied(), before);
            }
            OpI::Get(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.get(k), model.get(&k));
            }
            OpI::Remove(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(&k));
                prop_assert!(sut.get(k).is_none());
            }
            OpI::Contains(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
            }
            OpI::ContainsValue(v) => {
                let expected = model.values().any(|x| *x == v);
                prop_assert_eq!(sut.contains_value(&v), expected);
            }
            OpI::Mutate(i, d) => {
                let k = pool[i];
                match (sut.get_mut(k), model.get_mut(&k)) {
                    (Some(s), Some(m)) => {
                        *s = s.wrapping_add(d);
                        *m = m.wrapping_add(d);
                    }
                    (None, None) => {}
                    (s, m) => {
                        prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m);
                    }
                }
            }
            OpI::Keys => {
                let keys = sut.keys();
                let set: BTreeSet<i64> = keys.iter().copied().collect();
                prop_assert_eq!(keys.len(), set.len(), "duplicate key reported");
                let m_keys: BTreeSet<i64> = model.keys().copied().collect();
                prop_assert_eq!(set, m_keys);
            }
            OpI::Values => {
                let mut vs: Vec<i32> = sut.values().into_iter().copied().collect();
                let mut ms: Vec<i32> = model.values().copied().collect();
                vs.sort_unstable();
                ms.sort_unstable();
                prop_assert_eq!(vs, ms);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert!(sut.keys().is_empty());
                prop_assert!(sut.values().is_empty());
            }
        }

        let st = sut.stats();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(st.table_len + st.overflow_len, st.len);
        prop_assert!(st.capacity >= crate::MIN_CAPACITY);
    }
    for (k, v) in &model {
        prop_assert_eq!(sut.get(*k), Some(v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(LongMap::new(), &pool, ops)?;
    }

    // Same invariants with every key on one probe sequence; exercises the
    // overflow store, tombstone reuse, and reabsorption on rehash.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_colliding_scenario()) {
        run_state_machine(LongMap::new(), &pool, ops)?;
    }

    // A tight probe budget and no shrinking push far more traffic through
    // the overflow store.
    #[test]
    fn prop_state_machine_tight_probe((pool, ops) in arb_scenario(), max_probe in 1..4usize) {
        let cfg = LongMapConfig::new()
            .with_max_probe(max_probe)
            .with_bottom_load_factor(0.0);
        run_state_machine(LongMap::with_config(cfg).unwrap(), &pool, ops)?;
    }
}
