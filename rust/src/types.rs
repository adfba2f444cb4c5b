//! Core types and data structures for SortedTable.
//!
//! This module contains the table itself, the node layout and the link color
//! used by the left-leaning red-black balancing.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::arena::{NodeArena, NodeId};
use crate::policy::{OrdPolicy, TablePolicy};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Sorted key/value table backed by a left-leaning red-black tree.
///
/// Keys are ordered by the table's [`TablePolicy`]. Nodes live in an arena
/// owned by the table; every node allocation is admitted by the policy first,
/// and every key or value the table discards is handed back to the policy's
/// destructors.
///
/// # Examples
///
/// ```
/// use sortedtable::SortedTable;
///
/// let mut table = SortedTable::new();
/// table.insert(5, "five").unwrap();
/// table.insert(3, "three").unwrap();
/// table.insert(8, "eight").unwrap();
///
/// assert_eq!(table.get(&3), Some(&"three"));
/// assert_eq!(table.len(), 3);
///
/// let keys: Vec<_> = table.keys().copied().collect();
/// assert_eq!(keys, [3, 5, 8]);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(log n)
/// - **Lookup**: O(log n)
/// - **Deletion**: O(log n)
/// - **Iteration**: O(n), with an O(height) stack
///
/// The height never exceeds 2·log2(n + 1).
pub struct SortedTable<K, V, P: TablePolicy<K, V>> {
    /// Root of the tree, absent when the table is empty.
    pub(crate) root: Option<NodeId>,
    /// Storage for every live node.
    pub(crate) arena: NodeArena<Node<K, V>>,
    /// Comparator, allocator and destructors.
    pub(crate) policy: P,
    /// Bumped by every successful mutation; cursors compare against it.
    pub(crate) generation: u64,
    /// Distinguishes this table from every other table in the process.
    pub(crate) id: u64,
}

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

/// A process-wide unique table identity.
pub(crate) fn next_table_id() -> u64 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A table ordered by `K: Ord`.
pub type OrdTable<K, V> = SortedTable<K, V, OrdPolicy>;

/// Color of the link from a node's parent to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub(crate) fn flipped(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// One stored key/value pair.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    /// Number of nodes in the subtree rooted here, including this one.
    pub(crate) size: usize,
    pub(crate) color: Color,
}

impl<K, V> Node<K, V> {
    /// New nodes always hang off a red link.
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            size: 1,
            color: Color::Red,
        }
    }
}

impl<K, V, P> std::fmt::Debug for SortedTable<K, V, P>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
    P: TablePolicy<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
