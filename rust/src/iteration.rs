//! Iterator implementations for SortedTable.
//!
//! [`Cursor`] is the detached iterator: it stores node IDs only, so the table
//! stays free to change between calls to [`Cursor::next`]. A cursor that
//! observes a structural change ends permanently instead of yielding entries
//! from a tree that no longer matches its stack.
//!
//! [`Iter`], [`Keys`] and [`Values`] run the same traversal while borrowing
//! the table, so they can never be invalidated.

use std::iter::FusedIterator;

use tracing::debug;

use crate::arena::NodeId;
use crate::error::{SortedTableError, TableResult};
use crate::policy::TablePolicy;
use crate::types::{Node, SortedTable};

// ============================================================================
// DIRECTION
// ============================================================================

/// Order in which a cursor visits keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// The child explored before a node is yielded.
    #[inline]
    fn near<K, V>(self, node: &Node<K, V>) -> Option<NodeId> {
        match self {
            Direction::Ascending => node.left,
            Direction::Descending => node.right,
        }
    }

    /// The child explored after a node is yielded.
    #[inline]
    fn far<K, V>(self, node: &Node<K, V>) -> Option<NodeId> {
        match self {
            Direction::Ascending => node.right,
            Direction::Descending => node.left,
        }
    }
}

// ============================================================================
// CURSOR
// ============================================================================

/// The link a stacked node was reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reached {
    Root,
    Near(NodeId),
    Far(NodeId),
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    reached: Reached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Active,
    Exhausted,
    Invalidated,
}

/// Ordered traversal that does not borrow the table between steps.
///
/// The traversal stack is sized once, from the height of the tree when the
/// cursor was created. Each step checks that it was handed the same table,
/// that the table's generation is unchanged, and that the next node is still
/// linked the way it was when stacked; any mismatch ends the cursor.
///
/// # Examples
///
/// ```
/// use sortedtable::{Direction, SortedTable};
///
/// let mut table = SortedTable::new();
/// for key in [2, 1, 3] {
///     table.insert(key, ()).unwrap();
/// }
///
/// let mut cursor = table.cursor(Direction::Descending).unwrap();
/// assert_eq!(cursor.next(&table).map(|(k, _)| *k), Some(3));
///
/// table.insert(4, ()).unwrap();
/// assert_eq!(cursor.next(&table), None);
/// assert!(cursor.is_invalidated());
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    stack: Vec<Frame>,
    capacity: usize,
    direction: Direction,
    table_id: u64,
    generation: u64,
    state: CursorState,
    reason: Option<&'static str>,
}

impl Cursor {
    fn start<K, V, P: TablePolicy<K, V>>(
        table: &SortedTable<K, V, P>,
        direction: Direction,
        stack: Vec<Frame>,
        capacity: usize,
    ) -> Self {
        let mut cursor = Self {
            stack,
            capacity,
            direction,
            table_id: table.id,
            generation: table.generation,
            state: CursorState::Active,
            reason: None,
        };
        if let Some(root) = table.root {
            cursor.push_spine(table, root, Reached::Root);
        }
        cursor.settle();
        cursor
    }

    /// Whether another call to [`next`](Self::next) may yield an entry.
    ///
    /// A change to the table is only noticed by `next`, so this can still
    /// report `true` for a cursor that is about to be invalidated.
    pub fn has_next(&self) -> bool {
        self.state == CursorState::Active
    }

    /// Whether the cursor ended because the table changed under it, or
    /// because it was stepped over a different table.
    pub fn is_invalidated(&self) -> bool {
        self.state == CursorState::Invalidated
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advance the cursor over `table`, the table it was created from.
    ///
    /// Returns `None` once the traversal is complete, and from then on if the
    /// table has been modified since the cursor was created or `table` is not
    /// the table it came from.
    pub fn next<'t, K, V, P: TablePolicy<K, V>>(
        &mut self,
        table: &'t SortedTable<K, V, P>,
    ) -> Option<(&'t K, &'t V)> {
        if self.state != CursorState::Active {
            return None;
        }
        if table.id != self.table_id {
            self.invalidate("foreign table");
            return None;
        }
        if table.generation != self.generation {
            self.invalidate("table modified");
            return None;
        }

        let frame = self.stack.pop()?;
        if !self.link_holds(table, frame) {
            self.invalidate("stale link");
            return None;
        }
        let Some(node) = table.arena.get(frame.node) else {
            self.invalidate("node released");
            return None;
        };
        if let Some(far) = self.direction.far(node) {
            if !self.push_spine(table, far, Reached::Far(frame.node)) {
                return None;
            }
        }
        self.settle();
        Some((&node.key, &node.value))
    }

    fn link_holds<K, V, P: TablePolicy<K, V>>(
        &self,
        table: &SortedTable<K, V, P>,
        frame: Frame,
    ) -> bool {
        let link = match frame.reached {
            Reached::Root => table.root,
            Reached::Near(parent) => table.arena.get(parent).and_then(|p| self.direction.near(p)),
            Reached::Far(parent) => table.arena.get(parent).and_then(|p| self.direction.far(p)),
        };
        link == Some(frame.node)
    }

    /// Push `start` and every node along its near-side spine.
    fn push_spine<K, V, P: TablePolicy<K, V>>(
        &mut self,
        table: &SortedTable<K, V, P>,
        start: NodeId,
        reached: Reached,
    ) -> bool {
        let mut next = Some((start, reached));
        while let Some((node, reached)) = next {
            if self.stack.len() >= self.capacity {
                self.invalidate("stack capacity exceeded");
                return false;
            }
            let Some(current) = table.arena.get(node) else {
                self.invalidate("node released");
                return false;
            };
            self.stack.push(Frame { node, reached });
            next = self.direction.near(current).map(|child| (child, Reached::Near(node)));
        }
        true
    }

    fn settle(&mut self) {
        if self.state == CursorState::Active && self.stack.is_empty() {
            self.state = CursorState::Exhausted;
        }
    }

    fn invalidate(&mut self, reason: &'static str) {
        debug!(reason, direction = ?self.direction, "cursor invalidated");
        self.stack.clear();
        self.state = CursorState::Invalidated;
        self.reason = Some(reason);
    }
}

// ============================================================================
// SORTEDTABLE ITERATOR METHODS
// ============================================================================

impl<K, V, P: TablePolicy<K, V>> SortedTable<K, V, P> {
    /// Create a detached cursor over the current contents.
    ///
    /// The traversal stack is reserved up front; `AllocationError` is
    /// returned if that fails.
    pub fn cursor(&self, direction: Direction) -> TableResult<Cursor> {
        let capacity = self.height();
        let mut stack = Vec::new();
        stack.try_reserve_exact(capacity).map_err(|e| {
            SortedTableError::allocation_error("cursor stack", &e.to_string())
        })?;
        Ok(Cursor::start(self, direction, stack, capacity))
    }

    /// Returns an iterator over all entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, P> {
        Iter::new(self, Direction::Ascending)
    }

    /// Returns an iterator over all entries in descending key order.
    pub fn iter_rev(&self) -> Iter<'_, K, V, P> {
        Iter::new(self, Direction::Descending)
    }

    /// Returns an iterator over all keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V, P> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over all values in ascending key order.
    pub fn values(&self) -> Values<'_, K, V, P> {
        Values { inner: self.iter() }
    }
}

// ============================================================================
// BORROWING ITERATORS
// ============================================================================

/// Iterator over the entries of a borrowed table.
pub struct Iter<'a, K, V, P: TablePolicy<K, V>> {
    table: &'a SortedTable<K, V, P>,
    cursor: Cursor,
    remaining: usize,
}

impl<'a, K, V, P: TablePolicy<K, V>> Iter<'a, K, V, P> {
    fn new(table: &'a SortedTable<K, V, P>, direction: Direction) -> Self {
        let remaining = table.len();
        // A valid LLRB is never taller than 2 * log2(n + 1).
        let capacity = 2 * (usize::BITS - remaining.leading_zeros()) as usize + 1;
        let stack = Vec::with_capacity(capacity);
        Self {
            table,
            cursor: Cursor::start(table, direction, stack, capacity),
            remaining,
        }
    }
}

impl<'a, K, V, P: TablePolicy<K, V>> Iterator for Iter<'a, K, V, P> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.next(self.table)?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, P: TablePolicy<K, V>> ExactSizeIterator for Iter<'_, K, V, P> {}

impl<K, V, P: TablePolicy<K, V>> FusedIterator for Iter<'_, K, V, P> {}

/// Iterator over the keys of a borrowed table.
pub struct Keys<'a, K, V, P: TablePolicy<K, V>> {
    inner: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: TablePolicy<K, V>> Iterator for Keys<'a, K, V, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: TablePolicy<K, V>> ExactSizeIterator for Keys<'_, K, V, P> {}

/// Iterator over the values of a borrowed table.
pub struct Values<'a, K, V, P: TablePolicy<K, V>> {
    inner: Iter<'a, K, V, P>,
}

impl<'a, K, V, P: TablePolicy<K, V>> Iterator for Values<'a, K, V, P> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, P: TablePolicy<K, V>> ExactSizeIterator for Values<'_, K, V, P> {}

impl<'a, K, V, P: TablePolicy<K, V>> IntoIterator for &'a SortedTable<K, V, P> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
