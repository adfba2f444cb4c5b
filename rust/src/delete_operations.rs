//! DELETE operations for SortedTable.
//!
//! Deletion follows the top-down LLRB discipline: before descending into a
//! child, `move_red_left`/`move_red_right` make sure the child is not a lone
//! 2-node, so the node finally unlinked always hangs off a red link or is the
//! last node. `fixup` repairs every node on the way back up.
//!
//! The recursive helpers return the new subtree root together with the ID of
//! the node that was physically unlinked. That node is still allocated; the
//! public operations release it and decide who receives its key and value.

use std::cmp::Ordering;

use crate::arena::NodeId;
use crate::error::{ModifyResult, SortedTableError};
use crate::policy::TablePolicy;
use crate::types::{Color, SortedTable};

impl<K, V, P: TablePolicy<K, V>> SortedTable<K, V, P> {
    /// Remove a key, handing its key and value to the policy's destructors.
    ///
    /// Returns `KeyNotFound`, leaving the table untouched, if the key is
    /// absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::{SortedTable, SortedTableError};
    ///
    /// let mut table = SortedTable::new();
    /// table.insert(1, "one").unwrap();
    /// assert!(table.delete(&1).is_ok());
    /// assert_eq!(table.delete(&1), Err(SortedTableError::KeyNotFound));
    /// ```
    pub fn delete(&mut self, key: &K) -> ModifyResult<()> {
        let (key, value) = self.remove_entry(key).ok_or(SortedTableError::KeyNotFound)?;
        self.destroy_entry(key, value);
        Ok(())
    }

    /// Remove the smallest key, handing its key and value to the policy's
    /// destructors. Returns `Empty` on an empty table.
    pub fn delete_min(&mut self) -> ModifyResult<()> {
        let (key, value) = self.pop_min().ok_or(SortedTableError::Empty)?;
        self.destroy_entry(key, value);
        Ok(())
    }

    /// Remove a key and return its value. The stored key goes to the
    /// policy's key destructor.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (key, value) = self.remove_entry(key)?;
        self.policy.destroy_key(key);
        Some(value)
    }

    /// Remove a key and return the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let root = self.root?;
        // The descent below restructures as it goes, so it must not start
        // unless it is going to find the key.
        if !self.contains_key(key) {
            return None;
        }
        self.redden_root(root);
        let (root, removed) = self.delete_at(root, key);
        self.finish_removal(root, removed)
    }

    /// Remove the smallest key and return the stored key and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::SortedTable;
    ///
    /// let mut table = SortedTable::new();
    /// for key in [3, 1, 2] {
    ///     table.insert(key, key * 10).unwrap();
    /// }
    /// assert_eq!(table.pop_min(), Some((1, 10)));
    /// assert_eq!(table.pop_min(), Some((2, 20)));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        self.redden_root(root);
        let (root, removed) = self.delete_min_at(root);
        self.finish_removal(root, removed)
    }

    /// A black root with two black children gets borrowed from like any
    /// other node on the way down.
    fn redden_root(&mut self, root: NodeId) {
        if !self.is_red(self.arena[root].left) && !self.is_red(self.arena[root].right) {
            self.arena[root].color = Color::Red;
        }
    }

    fn finish_removal(&mut self, root: Option<NodeId>, removed: NodeId) -> Option<(K, V)> {
        if let Some(root) = root {
            self.arena[root].color = Color::Black;
        }
        self.root = root;
        self.generation = self.generation.wrapping_add(1);
        self.release_node(removed)
    }

    fn delete_min_at(&mut self, mut h: NodeId) -> (Option<NodeId>, NodeId) {
        let Some(left) = self.arena[h].left else {
            debug_assert!(self.arena[h].right.is_none());
            return (None, h);
        };
        if !self.is_red(Some(left)) && !self.is_red(self.arena[left].left) {
            h = self.move_red_left(h);
        }
        let (left, removed) = self.delete_min_at(self.left_of(h));
        self.arena[h].left = left;
        (Some(self.fixup(h)), removed)
    }

    /// `key` must be present in the subtree rooted at `h`.
    fn delete_at(&mut self, mut h: NodeId, key: &K) -> (Option<NodeId>, NodeId) {
        if self.policy.compare(key, &self.arena[h].key) == Ordering::Less {
            let left = self.left_of(h);
            if !self.is_red(Some(left)) && !self.is_red(self.arena[left].left) {
                h = self.move_red_left(h);
            }
            let (left, removed) = self.delete_at(self.left_of(h), key);
            self.arena[h].left = left;
            return (Some(self.fixup(h)), removed);
        }

        if self.is_red(self.arena[h].left) {
            h = self.rotate_right(h);
        }
        let found = self.policy.compare(key, &self.arena[h].key) == Ordering::Equal;
        if found && self.arena[h].right.is_none() {
            return (None, h);
        }

        let right = self.right_of(h);
        if !self.is_red(Some(right)) && !self.is_red(self.arena[right].left) {
            h = self.move_red_right(h);
        }

        let removed = if self.policy.compare(key, &self.arena[h].key) == Ordering::Equal {
            // Unlink the successor, then trade entries with it so the slot
            // being released carries the deleted key and value.
            let (right, successor) = self.delete_min_at(self.right_of(h));
            self.arena[h].right = right;
            if let Some((target, successor)) = self.arena.get_pair_mut(h, successor) {
                std::mem::swap(&mut target.key, &mut successor.key);
                std::mem::swap(&mut target.value, &mut successor.value);
            }
            successor
        } else {
            let (right, removed) = self.delete_at(self.right_of(h), key);
            self.arena[h].right = right;
            removed
        };
        (Some(self.fixup(h)), removed)
    }
}
