//! Tree structure management operations for SortedTable.
//!
//! This module contains the table-level operations that look at or tear down
//! the tree as a whole: size queries, height, clearing and destruction.

use tracing::trace;

use crate::arena::{ArenaStats, NodeId};
use crate::policy::TablePolicy;
use crate::types::SortedTable;

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K, V, P: TablePolicy<K, V>> SortedTable<K, V, P> {
    /// Returns the number of entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.link_size(self.root)
    }

    /// Returns true if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path. Zero when empty.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[id];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    /// Remove every entry, handing each key and value to the policy's
    /// destructors. Children are destroyed before their parent.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::SortedTable;
    ///
    /// let mut table = SortedTable::new();
    /// table.insert(1, "one").unwrap();
    /// table.insert(2, "two").unwrap();
    /// table.clear();
    /// assert!(table.is_empty());
    /// table.insert(3, "three").unwrap();
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn clear(&mut self) {
        let destroyed = match self.root.take() {
            Some(root) => self.destroy_subtree(root),
            None => 0,
        };
        self.arena.clear();
        self.generation = self.generation.wrapping_add(1);
        trace!(destroyed, "table cleared");
    }

    /// Post-order teardown of the subtree at `root`. Returns the number of
    /// nodes destroyed.
    fn destroy_subtree(&mut self, root: NodeId) -> usize {
        let mut destroyed = 0;
        // (node, children already scheduled)
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                if let Some((key, value)) = self.release_node(id) {
                    self.destroy_entry(key, value);
                    destroyed += 1;
                }
                continue;
            }
            stack.push((id, true));
            let node = &self.arena[id];
            for child in [node.right, node.left].into_iter().flatten() {
                stack.push((child, false));
            }
        }
        destroyed
    }

    /// Take a node out of the arena and tell the policy it is gone.
    pub(crate) fn release_node(&mut self, id: NodeId) -> Option<(K, V)> {
        let node = self.arena.deallocate(id)?;
        self.policy.deallocate();
        Some((node.key, node.value))
    }

    pub(crate) fn destroy_entry(&mut self, key: K, value: V) {
        self.policy.destroy_key(key);
        self.policy.destroy_value(value);
    }

    // ============================================================================
    // ACCESSORS
    // ============================================================================

    /// The policy the table was built with.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Mutable access to the policy, e.g. to raise a node limit.
    ///
    /// The comparator must keep ordering the stored keys the same way.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Statistics for the node arena.
    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Structural modification counter. Changes on every successful insert,
    /// delete or clear.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<K, V, P: TablePolicy<K, V>> Drop for SortedTable<K, V, P> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            let destroyed = self.destroy_subtree(root);
            trace!(destroyed, "table dropped");
        }
    }
}
