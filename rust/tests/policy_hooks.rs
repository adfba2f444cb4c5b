//! Allocation and destruction hooks observed through a counting policy.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use sortedtable::{Direction, NodeLimit, SortedTable, SortedTableError, TablePolicy, TableResult};

#[derive(Debug, Default)]
struct Ledger {
    allocated: usize,
    released: usize,
    keys: Vec<u32>,
    values: Vec<String>,
    refuse_after: Option<usize>,
}

/// Shares its ledger with the test so counts survive the table being dropped.
#[derive(Clone, Default)]
struct Counting(Rc<RefCell<Ledger>>);

impl Counting {
    fn ledger(&self) -> std::cell::Ref<'_, Ledger> {
        self.0.borrow()
    }
}

impl TablePolicy<u32, String> for Counting {
    fn compare(&self, a: &u32, b: &u32) -> Ordering {
        a.cmp(b)
    }

    fn allocate(&mut self, live_nodes: usize) -> TableResult<()> {
        let mut ledger = self.0.borrow_mut();
        if ledger.refuse_after.is_some_and(|limit| ledger.allocated >= limit) {
            return Err(SortedTableError::allocation_error(
                "node",
                &format!("refused with {} live", live_nodes),
            ));
        }
        ledger.allocated += 1;
        Ok(())
    }

    fn deallocate(&mut self) {
        self.0.borrow_mut().released += 1;
    }

    fn destroy_key(&mut self, key: u32) {
        self.0.borrow_mut().keys.push(key);
    }

    fn destroy_value(&mut self, value: String) {
        self.0.borrow_mut().values.push(value);
    }
}

fn filled(policy: &Counting, keys: &[u32]) -> SortedTable<u32, String, Counting> {
    let mut table = SortedTable::with_policy(policy.clone());
    for &key in keys {
        table.insert(key, format!("v{}", key)).unwrap();
    }
    table
}

#[test]
fn test_overwrite_destroys_old_value_and_duplicate_key() {
    let policy = Counting::default();
    let mut table = filled(&policy, &[1, 2]);
    table.insert(2, "new".to_string()).unwrap();

    assert_eq!(policy.ledger().values, ["v2"]);
    assert_eq!(policy.ledger().keys, [2]);
    assert_eq!(policy.ledger().allocated, 2);
    assert_eq!(table.get(&2).map(String::as_str), Some("new"));
}

#[test]
fn test_delete_destroys_original_entry_once() {
    let policy = Counting::default();
    let mut table = filled(&policy, &[5, 3, 8, 1, 4, 7, 9]);

    // 5 has two children, so its successor is promoted into its place.
    table.delete(&5).unwrap();
    assert_eq!(policy.ledger().keys, [5]);
    assert_eq!(policy.ledger().values, ["v5"]);
    assert_eq!(policy.ledger().released, 1);
    assert_eq!(table.get(&7).map(String::as_str), Some("v7"));

    table.delete_min().unwrap();
    assert_eq!(policy.ledger().keys, [5, 1]);
    assert_eq!(policy.ledger().released, 2);
}

#[test]
fn test_remove_hands_value_back_without_destroying_it() {
    let policy = Counting::default();
    let mut table = filled(&policy, &[1, 2, 3]);

    assert_eq!(table.remove(&2).as_deref(), Some("v2"));
    assert_eq!(policy.ledger().keys, [2]);
    assert!(policy.ledger().values.is_empty());

    assert_eq!(table.pop_min(), Some((1, "v1".to_string())));
    assert_eq!(policy.ledger().keys, [2]);
    assert_eq!(policy.ledger().released, 2);
}

#[test]
fn test_failed_delete_touches_nothing() {
    let policy = Counting::default();
    let mut table = filled(&policy, &[1, 2, 3]);
    let generation = table.generation();

    assert_eq!(table.delete(&9), Err(SortedTableError::KeyNotFound));
    assert_eq!(table.generation(), generation);
    assert_eq!(policy.ledger().released, 0);
    assert!(policy.ledger().keys.is_empty());
}

#[test]
fn test_drop_destroys_every_entry() {
    let policy = Counting::default();
    let table = filled(&policy, &(0..100).collect::<Vec<_>>());
    drop(table);

    let ledger = policy.ledger();
    assert_eq!(ledger.released, 100);
    assert_eq!(ledger.allocated, 100);
    let mut keys = ledger.keys.clone();
    keys.sort_unstable();
    assert_eq!(keys, (0..100).collect::<Vec<_>>());
    assert_eq!(ledger.values.len(), 100);
}

#[test]
fn test_refused_allocation_is_atomic() {
    let policy = Counting::default();
    let mut table = filled(&policy, &[10, 20, 30, 40]);
    policy.0.borrow_mut().refuse_after = Some(4);
    let before: Vec<_> = table.keys().copied().collect();
    let height = table.height();
    let generation = table.generation();

    let err = table.insert(25, "v25".to_string()).unwrap_err();
    assert!(err.is_allocation_error());
    assert_eq!(table.keys().copied().collect::<Vec<_>>(), before);
    assert_eq!(table.height(), height);
    assert_eq!(table.generation(), generation);
    assert!(table.check_invariants());

    // The rejected pair is disposed of rather than leaked.
    assert_eq!(policy.ledger().keys, [25]);
    assert_eq!(policy.ledger().values, ["v25"]);
}

#[test]
fn test_node_limit_can_be_raised() {
    let mut table = SortedTable::with_policy(NodeLimit::new(sortedtable::OrdPolicy, 2));
    table.insert(1, ()).unwrap();
    table.insert(2, ()).unwrap();
    assert!(table.insert(3, ()).is_err());

    table.policy_mut().set_max_nodes(3);
    table.insert(3, ()).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.policy().max_nodes(), 3);
}

#[test]
fn test_cursor_after_insert_never_shows_new_key() {
    let policy = Counting::default();
    let mut table = filled(&policy, &[10, 20, 30, 40, 50]);
    let mut cursor = table.cursor(Direction::Ascending).unwrap();

    let first = cursor.next(&table).map(|(k, _)| *k);
    assert_eq!(first, Some(10));
    table.insert(15, "v15".to_string()).unwrap();

    let mut rest = Vec::new();
    while let Some((k, _)) = cursor.next(&table) {
        rest.push(*k);
    }
    assert!(rest.is_empty());
    assert!(cursor.is_invalidated());
}

#[test]
fn test_clear_resets_and_table_stays_usable() {
    let policy = Counting::default();
    let mut table = filled(&policy, &[3, 1, 2]);
    table.clear();

    assert_eq!(policy.ledger().released, 3);
    assert!(table.is_empty());
    table.insert(7, "v7".to_string()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(policy.ledger().allocated, 4);
}
