// HashSet property tests.
//
// Property 1: the set agrees with std's HashSet under random
// insert/remove/contains sequences.
//  - Invariant after every step: len() == number of values iter() yields,
//    len() / capacity() <= 0.7, insert/remove/contains results equal the model.
//
// Property 2: a resize keeps every element and the element count, and the
// load factor holds after every insert even from a one-slot table.
//
// Property 3: removals leave tombstones that later inserts reuse without
// hiding the values stored past them. All values share one probe chain.
use std::collections::HashSet as ModelSet;
use std::hash::BuildHasher;
use std::hash::Hasher;

use micro_hash::HashSet;
use micro_hash::TableConfig;
use micro_hash::hasher::BuildMicroHasher;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16),
    Remove(u16),
    Contains(u16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u16>().prop_map(|k| Op::Insert(k % 512)),
        2 => any::<u16>().prop_map(|k| Op::Remove(k % 512)),
        1 => any::<u16>().prop_map(|k| Op::Contains(k % 512)),
    ]
}

#[derive(Clone, Copy, Default)]
struct ZeroState;

struct ZeroHasher;

impl Hasher for ZeroHasher {
    fn finish(&self) -> u64 {
        0
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

impl BuildHasher for ZeroState {
    type Hasher = ZeroHasher;

    fn build_hasher(&self) -> ZeroHasher {
        ZeroHasher
    }
}

proptest! {
    #[test]
    fn prop_matches_model(ops in proptest::collection::vec(op(), 1..600)) {
        let mut set: HashSet<u16, BuildMicroHasher> = HashSet::default();
        let mut model = ModelSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => prop_assert_eq!(set.insert(k), model.insert(k)),
                Op::Remove(k) => prop_assert_eq!(set.remove(&k), model.remove(&k)),
                Op::Contains(k) => prop_assert_eq!(set.contains(&k), model.contains(&k)),
            }

            prop_assert_eq!(set.len(), model.len());
            prop_assert_eq!(set.iter().count(), set.len());
            prop_assert!(set.len() as f64 / set.capacity() as f64 <= 0.7);
            prop_assert!(set.capacity().is_power_of_two());
        }

        for k in &model {
            prop_assert!(set.contains(k));
        }
    }

    #[test]
    fn prop_insert_is_idempotent(keys in proptest::collection::vec(any::<u64>(), 1..200)) {
        let mut set: HashSet<u64> = HashSet::new();
        for &k in &keys {
            set.insert(k);
        }
        let len = set.len();
        for &k in &keys {
            prop_assert!(!set.insert(k));
        }
        prop_assert_eq!(set.len(), len);
    }

    #[test]
    fn prop_resize_preserves_membership(
        keys in proptest::collection::hash_set(any::<u32>(), 1..2000),
        log_capacity in 0u32..5,
        load in 0.05f64..=1.0,
    ) {
        let config = TableConfig::new(1 << log_capacity, load).unwrap();
        let mut set = HashSet::with_config_and_hasher(config, BuildMicroHasher::default());
        let mut capacity = set.capacity();

        for (i, &k) in keys.iter().enumerate() {
            prop_assert!(set.insert(k));
            if set.capacity() != capacity {
                prop_assert!(set.capacity() > capacity);
                prop_assert!(set.capacity().is_power_of_two());
                capacity = set.capacity();
            }
            prop_assert_eq!(set.len(), i + 1);
            prop_assert!(set.len() as f64 / set.capacity() as f64 <= load);
        }

        for k in &keys {
            prop_assert!(set.contains(k));
        }
    }

    #[test]
    fn prop_tombstones_are_reused(
        len in 2u32..11,
        removed in any::<prop::sample::Index>(),
        fresh in 100u32..200,
    ) {
        let mut set = HashSet::with_hasher(ZeroState);
        for k in 0..len {
            set.insert(k);
        }
        let capacity = set.capacity();
        let removed = removed.index(len as usize) as u32;

        prop_assert!(set.remove(&removed));
        prop_assert!(set.insert(fresh));

        prop_assert_eq!(set.capacity(), capacity);
        prop_assert_eq!(set.len(), len as usize);
        prop_assert!(set.contains(&fresh));
        prop_assert!(!set.contains(&removed));
        for k in (0..len).filter(|&k| k != removed) {
            prop_assert!(set.contains(&k));
        }

        // The fresh value took the removed value's slot, so the chain still
        // spans exactly `len` slots.
        let slots: Vec<u32> = set.iter().copied().collect();
        let mut expected: Vec<u32> = (0..len).collect();
        expected[removed as usize] = fresh;
        prop_assert_eq!(slots, expected);
    }
}

#[test]
fn remove_then_insert_same_value() {
    let mut set = HashSet::with_hasher(ZeroState);
    set.insert(1u8);
    set.insert(2u8);
    assert!(set.remove(&1));
    assert!(set.contains(&2));
    assert!(set.insert(1));
    assert!(!set.insert(2));
    assert_eq!(set.len(), 2);
}
