//! GET operations for SortedTable.
//!
//! Lookups are iterative descents from the root. They never allocate and
//! never change the tree.

use std::cmp::Ordering;

use crate::arena::NodeId;
use crate::error::{KeyResult, SortedTableError};
use crate::policy::TablePolicy;
use crate::types::SortedTable;

impl<K, V, P: TablePolicy<K, V>> SortedTable<K, V, P> {
    /// Get a reference to the value associated with a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::SortedTable;
    ///
    /// let mut table = SortedTable::new();
    /// table.insert(1, "one").unwrap();
    /// assert_eq!(table.get(&1), Some(&"one"));
    /// assert_eq!(table.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.arena[id].value)
    }

    /// Get a mutable reference to the value for a key.
    ///
    /// Changing a value in place is not a structural change, so cursors stay
    /// valid.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.arena[id].value)
    }

    /// Check if key exists in the table.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Get value for a key, returning `KeyNotFound` if the key doesn't exist.
    pub fn get_item(&self, key: &K) -> KeyResult<&V> {
        self.get(key).ok_or(SortedTableError::KeyNotFound)
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::SortedTable;
    ///
    /// let mut table = SortedTable::new();
    /// table.insert(7, 'x').unwrap();
    /// table.insert(3, 'y').unwrap();
    /// assert_eq!(table.min(), Some((&3, &'y')));
    /// ```
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut current = self.root?;
        while let Some(left) = self.arena[current].left {
            current = left;
        }
        let node = &self.arena[current];
        Some((&node.key, &node.value))
    }

    /// Number of keys in the table that order strictly before `key`.
    ///
    /// `key` need not be present.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::SortedTable;
    ///
    /// let mut table = SortedTable::new();
    /// for key in [10, 20, 30] {
    ///     table.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(table.rank(&20), 1);
    /// assert_eq!(table.rank(&25), 2);
    /// assert_eq!(table.rank(&5), 0);
    /// ```
    pub fn rank(&self, key: &K) -> usize {
        self.locate(key).0
    }

    /// Entry at position `index` in ascending order, or `None` when
    /// `index >= len()`.
    pub fn select(&self, index: usize) -> Option<(&K, &V)> {
        if index >= self.len() {
            return None;
        }
        let mut remaining = index;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            let before = self.link_size(node.left);
            current = match remaining.cmp(&before) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Greater => {
                    remaining -= before + 1;
                    node.right
                }
            };
        }
        None
    }

    /// Position of `key` in ascending order, if present.
    pub fn index_of(&self, key: &K) -> Option<usize> {
        match self.locate(key) {
            (rank, true) => Some(rank),
            (_, false) => None,
        }
    }

    /// Rank of `key` and whether it was found, in one descent.
    fn locate(&self, key: &K) -> (usize, bool) {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match self.policy.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => {
                    rank += 1 + self.link_size(node.left);
                    node.right
                }
                Ordering::Equal => return (rank + self.link_size(node.left), true),
            };
        }
        (rank, false)
    }

    /// Locate the node holding `key`.
    pub(crate) fn find(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match self.policy.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SortedTable<i32, String, crate::policy::OrdPolicy> {
        let mut table = SortedTable::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            table.insert(key, format!("v{}", key)).unwrap();
        }
        table
    }

    #[test]
    fn test_get_existing_and_missing() {
        let table = sample();
        assert_eq!(table.get(&4).map(String::as_str), Some("v4"));
        assert_eq!(table.get(&6), None);
        assert!(table.contains_key(&9));
        assert!(!table.contains_key(&10));
    }

    #[test]
    fn test_get_item_reports_missing_key() {
        let table = sample();
        assert_eq!(table.get_item(&1).map(String::as_str), Ok("v1"));
        assert_eq!(table.get_item(&2), Err(SortedTableError::KeyNotFound));
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut table = sample();
        table.get_mut(&7).unwrap().push('!');
        assert_eq!(table.get(&7).map(String::as_str), Some("v7!"));
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn test_min() {
        let table = sample();
        assert_eq!(table.min().map(|(k, _)| *k), Some(1));
        let empty = SortedTable::<i32, i32, _>::new();
        assert_eq!(empty.min(), None);
    }

    #[test]
    fn test_rank_counts_smaller_keys() {
        let table = sample();
        // Keys: 1 3 4 5 7 8 9
        assert_eq!(table.rank(&1), 0);
        assert_eq!(table.rank(&5), 3);
        assert_eq!(table.rank(&9), 6);
        assert_eq!(table.rank(&0), 0);
        assert_eq!(table.rank(&6), 4);
        assert_eq!(table.rank(&100), 7);
    }

    #[test]
    fn test_select_walks_ascending_order() {
        let table = sample();
        let selected: Vec<i32> = (0..table.len()).map(|i| *table.select(i).unwrap().0).collect();
        assert_eq!(selected, vec![1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(table.select(2).map(|(_, v)| v.as_str()), Some("v4"));
        assert_eq!(table.select(7), None);
        assert_eq!(SortedTable::<i32, i32, _>::new().select(0), None);
    }

    #[test]
    fn test_index_of_requires_presence() {
        let table = sample();
        assert_eq!(table.index_of(&1), Some(0));
        assert_eq!(table.index_of(&8), Some(5));
        assert_eq!(table.index_of(&6), None);
        for i in 0..table.len() {
            let (key, _) = table.select(i).unwrap();
            assert_eq!(table.index_of(key), Some(i));
        }
    }
}
