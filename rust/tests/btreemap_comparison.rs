use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sortedtable::{ComparatorPolicy, OrdTable, SortedTable};
use std::collections::BTreeMap;

const OPERATIONS: usize = 20_000;
const KEY_SPACE: u32 = 2_000;

fn assert_same_contents(table: &OrdTable<u32, u64>, oracle: &BTreeMap<u32, u64>) {
    assert_eq!(table.len(), oracle.len());
    assert!(table.iter().eq(oracle.iter()), "ascending contents diverged");
    assert!(table.iter_rev().eq(oracle.iter().rev()), "descending contents diverged");
}

#[test]
fn test_random_workload_vs_btreemap() {
    let mut rng = StdRng::seed_from_u64(0x5eed_7ab1e);
    let mut table = OrdTable::new();
    let mut oracle = BTreeMap::new();

    for step in 0..OPERATIONS {
        let key = rng.gen_range(0..KEY_SPACE);
        match rng.gen_range(0..10) {
            0..=4 => {
                let value = rng.gen::<u64>();
                assert_eq!(table.replace(key, value).unwrap(), oracle.insert(key, value));
            }
            5..=7 => {
                assert_eq!(table.remove(&key), oracle.remove(&key));
            }
            8 => {
                assert_eq!(table.pop_min(), oracle.pop_first());
            }
            _ => {
                assert_eq!(table.get(&key), oracle.get(&key));
            }
        }

        if step % 1_000 == 0 {
            table.check_invariants_detailed().unwrap();
            assert_same_contents(&table, &oracle);
        }
    }

    table.check_invariants_detailed().unwrap();
    assert_same_contents(&table, &oracle);
}

#[test]
fn test_grow_then_shrink_vs_btreemap() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut keys: Vec<u32> = (0..5_000).collect();
    let mut table = OrdTable::new();
    let mut oracle = BTreeMap::new();

    for &key in &keys {
        table.insert(key, u64::from(key) * 3).unwrap();
        oracle.insert(key, u64::from(key) * 3);
    }
    assert_same_contents(&table, &oracle);

    // Delete in a shuffled order.
    for i in (1..keys.len()).rev() {
        keys.swap(i, rng.gen_range(0..=i));
    }
    for (i, key) in keys.iter().enumerate() {
        table.delete(key).unwrap();
        oracle.remove(key);
        if i % 500 == 0 {
            assert!(table.check_invariants());
            assert_same_contents(&table, &oracle);
        }
    }
    assert!(table.is_empty());
    assert_eq!(table.arena_stats().allocated_count, 0);
}

#[test]
fn test_custom_comparator_vs_btreemap() {
    // Case-insensitive ordering; the first spelling inserted is kept as the key.
    let policy = ComparatorPolicy::new(|a: &String, b: &String| {
        a.to_lowercase().cmp(&b.to_lowercase())
    });
    let mut table = SortedTable::with_policy(policy);
    let mut oracle = BTreeMap::new();

    for (i, word) in ["Delta", "alpha", "Charlie", "ALPHA", "bravo", "delta"].iter().enumerate() {
        table.insert(word.to_string(), i).unwrap();
        oracle.insert(word.to_lowercase(), i);
    }

    let keys: Vec<_> = table.keys().map(|k| k.to_lowercase()).collect();
    let values: Vec<_> = table.values().copied().collect();
    assert_eq!(keys, oracle.keys().cloned().collect::<Vec<_>>());
    assert_eq!(values, oracle.values().copied().collect::<Vec<_>>());
    assert_eq!(table.keys().next().map(String::as_str), Some("alpha"));
}
