#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can reach
// internal configuration knobs without feature gates.

use crate::fnv::BuildFnv1a32;
use crate::kind::{Key, KeyKind, Value, ValueKind};
use crate::table::{HashTable, TableConfig, TableError};
use core::hash::BuildHasher;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i64),
    Remove(usize),
    Get(usize),
    Contains(usize),
    Clear,
}

fn arb_ops(pool: usize) -> impl Strategy<Value = Vec<OpI>> {
    let idx = 0..pool;
    let op = prop_oneof![
        4 => (idx.clone(), any::<i64>()).prop_map(|(i, v)| OpI::Insert(i, v)),
        2 => idx.clone().prop_map(OpI::Remove),
        2 => idx.clone().prop_map(OpI::Get),
        1 => idx.prop_map(OpI::Contains),
        1 => Just(OpI::Clear),
    ];
    proptest::collection::vec(op, 1..120)
}

// Drives a HashTable and a std HashMap model through the same op sequence
// and checks parity after every operation:
// - insert succeeds iff the model lacks the key; DuplicateKey otherwise.
// - get/contains/remove agree with model presence and values.
// - len/is_empty parity; capacity stays positive and the load factor stays
//   below the threshold after every successful insert.
fn run_model<S: BuildHasher>(
    mut table: HashTable<S>,
    pool: &[Key],
    ops: Vec<OpI>,
    threshold: f64,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i64> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let already = model.contains_key(&k);
                match table.insert(k.clone(), Value::Int(v)) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(k, v);
                    }
                    Err(TableError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                    Err(e) => return Err(TestCaseError::fail(format!("unexpected: {e:?}"))),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = table.remove(k);
                let model_removed = model.remove(k);
                prop_assert_eq!(removed, model_removed.map(Value::Int));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                let got = table.get(k);
                prop_assert_eq!(got, model.get(k).copied().map(Value::Int));
            }
            OpI::Contains(i) => {
                let k = &pool[i];
                prop_assert_eq!(table.contains_key(k), model.contains_key(k));
            }
            OpI::Clear => {
                table.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(table.len(), model.len());
        prop_assert_eq!(table.is_empty(), model.is_empty());
        prop_assert!(table.capacity() > 0);
        prop_assert!((table.len() as f64) / (table.capacity() as f64) < threshold);
    }
    Ok(())
}

fn int_pool(n: usize) -> Vec<Key> {
    // Spread keys so some collide modulo small capacities.
    (0..n).map(|i| Key::Int((i as i64) * 7 - 3)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_int_keys(ops in arb_ops(12)) {
        let table = HashTable::new(KeyKind::Int, ValueKind::Int)
            .expect("construction with default config");
        run_model(table, &int_pool(12), ops, 0.75)?;
    }

    #[test]
    fn prop_state_machine_string_keys(ops in arb_ops(10)) {
        let pool: Vec<Key> = (0..10).map(|i| Key::from(format!("key-{i}"))).collect();
        let table = HashTable::new(KeyKind::Str, ValueKind::Int)
            .expect("construction with default config");
        run_model(table, &pool, ops, 0.75)?;
    }

    // Tiny initial capacity: nearly every insert crosses the threshold, so
    // growth and rehashing run constantly.
    #[test]
    fn prop_state_machine_under_constant_growth(ops in arb_ops(16)) {
        let table = HashTable::with_config(
            KeyKind::Int,
            ValueKind::Int,
            TableConfig { initial_capacity: 1, max_load_factor: 0.75 },
        )
        .expect("construction with tiny capacity");
        run_model(table, &int_pool(16), ops, 0.75)?;
    }
}

// Collision variant using a constant hasher to stress chain walking,
// tail insertion, and unlinking under worst-case clustering.
#[derive(Copy, Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl core::hash::Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_with_collisions(ops in arb_ops(12)) {
        let table = HashTable::with_config_and_hasher(
            KeyKind::Int,
            ValueKind::Int,
            TableConfig::default(),
            ConstBuildHasher,
        )
        .expect("construction with constant hasher");
        run_model(table, &int_pool(12), ops, 0.75)?;
    }
}

// The default FNV build-hasher must be deterministic across instances;
// otherwise stored hashes and fresh lookups could disagree.
proptest! {
    #[test]
    fn prop_fnv_is_deterministic(v in any::<i64>()) {
        let a = BuildFnv1a32.hash_one(Key::Int(v));
        let b = BuildFnv1a32.hash_one(Key::Int(v));
        prop_assert_eq!(a, b);
        prop_assert!(a <= u64::from(u32::MAX));
    }
}
