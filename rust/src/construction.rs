//! Construction and initialization logic for SortedTable.
//!
//! Tables start empty. The policy is fixed at construction; the arena can be
//! pre-sized so that the first inserts do not grow it.

use crate::arena::NodeArena;
use crate::error::{InitResult, TableResultExt};
use crate::policy::{OrdPolicy, TablePolicy};
use crate::types::{next_table_id, SortedTable};

impl<K: Ord, V> SortedTable<K, V, OrdPolicy> {
    /// Create an empty table ordered by `K: Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::SortedTable;
    ///
    /// let table = SortedTable::<i32, String, _>::new();
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_policy(OrdPolicy)
    }
}

impl<K, V, P: TablePolicy<K, V>> SortedTable<K, V, P> {
    /// Create an empty table governed by `policy`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::{ComparatorPolicy, SortedTable};
    ///
    /// let mut table = SortedTable::with_policy(ComparatorPolicy::new(|a: &i32, b: &i32| b.cmp(a)));
    /// table.insert(1, ()).unwrap();
    /// table.insert(2, ()).unwrap();
    /// assert_eq!(table.keys().copied().collect::<Vec<_>>(), [2, 1]);
    /// ```
    pub fn with_policy(policy: P) -> Self {
        Self {
            root: None,
            arena: NodeArena::new(),
            policy,
            generation: 0,
            id: next_table_id(),
        }
    }

    /// Create an empty table with arena room for `capacity` nodes.
    ///
    /// Returns `AllocationError` if the storage cannot be reserved. Reserving
    /// storage does not admit nodes: the policy still sees every allocation.
    pub fn try_with_capacity(policy: P, capacity: usize) -> InitResult<Self> {
        let arena = NodeArena::try_with_capacity(capacity).with_operation("create")?;
        Ok(Self {
            root: None,
            arena,
            policy,
            generation: 0,
            id: next_table_id(),
        })
    }

    /// Build a table from `(key, value)` pairs. Later duplicates overwrite
    /// earlier ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::{OrdPolicy, SortedTable};
    ///
    /// let table = SortedTable::from_entries(OrdPolicy, [(2, "b"), (1, "a"), (2, "B")]).unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.get(&2), Some(&"B"));
    /// ```
    pub fn from_entries<I>(policy: P, entries: I) -> InitResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut table = Self::with_policy(policy);
        table.insert_all(entries).with_operation("from_entries")?;
        Ok(table)
    }
}

impl<K: Ord, V> Default for SortedTable<K, V, OrdPolicy> {
    fn default() -> Self {
        Self::new()
    }
}
