//! INSERT operations for SortedTable.
//!
//! Insertion descends recursively and rebalances with `fixup` on the way
//! back up. A new node is only allocated at the bottom of the descent, so an
//! allocation failure unwinds before any node has been touched.

use std::cmp::Ordering;

use tracing::warn;

use crate::arena::NodeId;
use crate::error::{ModifyResult, SortedTableError, TreeResult};
use crate::policy::TablePolicy;
use crate::types::{Color, Node, SortedTable};

impl<K, V, P: TablePolicy<K, V>> SortedTable<K, V, P> {
    /// Insert a key-value pair, overwriting the value of an existing key.
    ///
    /// The overwritten value and the duplicate key are handed to the policy's
    /// destructors. On `AllocationError` the table is unchanged and the
    /// rejected key and value are handed to the destructors as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::SortedTable;
    ///
    /// let mut table = SortedTable::new();
    /// table.insert(1, "one").unwrap();
    /// table.insert(1, "uno").unwrap();
    /// assert_eq!(table.get(&1), Some(&"uno"));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> ModifyResult<()> {
        if let Some(old_value) = self.replace(key, value)? {
            self.policy.destroy_value(old_value);
        }
        Ok(())
    }

    /// Insert a key-value pair, returning the previous value of the key.
    ///
    /// Unlike [`insert`](Self::insert), ownership of an overwritten value goes
    /// back to the caller.
    pub fn replace(&mut self, key: K, value: V) -> ModifyResult<Option<V>> {
        let (root, old_value) = self.insert_at(self.root, key, value)?;
        self.arena[root].color = Color::Black;
        self.root = Some(root);
        self.generation = self.generation.wrapping_add(1);
        Ok(old_value)
    }

    /// Insert every pair from `entries`, stopping at the first failure.
    pub fn insert_all<I>(&mut self, entries: I) -> ModifyResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    fn insert_at(
        &mut self,
        link: Option<NodeId>,
        key: K,
        value: V,
    ) -> TreeResult<(NodeId, Option<V>)> {
        let Some(h) = link else {
            return Ok((self.allocate_node(key, value)?, None));
        };

        let old_value = match self.policy.compare(&key, &self.arena[h].key) {
            Ordering::Less => {
                let (left, old_value) = self.insert_at(self.arena[h].left, key, value)?;
                self.arena[h].left = Some(left);
                old_value
            }
            Ordering::Greater => {
                let (right, old_value) = self.insert_at(self.arena[h].right, key, value)?;
                self.arena[h].right = Some(right);
                old_value
            }
            Ordering::Equal => {
                let old_value = std::mem::replace(&mut self.arena[h].value, value);
                self.policy.destroy_key(key);
                Some(old_value)
            }
        };

        Ok((self.fixup(h), old_value))
    }

    /// Admit and store a new red node.
    pub(crate) fn allocate_node(&mut self, key: K, value: V) -> TreeResult<NodeId> {
        if let Err(e) = self.policy.allocate(self.arena.len()) {
            return Err(self.reject(key, value, e));
        }
        if let Err(e) = self.arena.reserve_slot() {
            self.policy.deallocate();
            return Err(self.reject(key, value, e));
        }
        Ok(self.arena.allocate(Node::new(key, value)))
    }

    fn reject(&mut self, key: K, value: V, error: SortedTableError) -> SortedTableError {
        warn!(live_nodes = self.arena.len(), %error, "node allocation refused");
        self.policy.destroy_key(key);
        self.policy.destroy_value(value);
        error
    }
}
