//! Comparator, allocator and destructor policy for SortedTable.
//!
//! A table is parameterized by one [`TablePolicy`] chosen at construction.
//! The policy orders keys, admits or refuses every node allocation, is told
//! about every node release, and receives ownership of every key and value the
//! table discards.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{SortedTableError, TableResult};

/// The capability set a table is built with.
///
/// Only `compare` is required. The remaining hooks default to an unbounded
/// allocator and plain `drop` destructors.
pub trait TablePolicy<K, V> {
    /// Total order over keys. Must be consistent for the table's lifetime.
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Admit one more node. `live_nodes` is the count before the new node.
    fn allocate(&mut self, live_nodes: usize) -> TableResult<()> {
        let _ = live_nodes;
        Ok(())
    }

    /// A node admitted by [`allocate`](Self::allocate) has been released.
    fn deallocate(&mut self) {}

    /// Take ownership of a key the table no longer holds.
    fn destroy_key(&mut self, key: K) {
        drop(key);
    }

    /// Take ownership of a value the table no longer holds.
    fn destroy_value(&mut self, value: V) {
        drop(value);
    }
}

/// Orders keys by their `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrdPolicy;

impl<K: Ord, V> TablePolicy<K, V> for OrdPolicy {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys with a caller-supplied closure.
#[derive(Clone, Copy)]
pub struct ComparatorPolicy<F> {
    compare: F,
}

impl<F> ComparatorPolicy<F> {
    pub fn new(compare: F) -> Self {
        Self { compare }
    }
}

impl<F> fmt::Debug for ComparatorPolicy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorPolicy").finish_non_exhaustive()
    }
}

impl<K, V, F> TablePolicy<K, V> for ComparatorPolicy<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.compare)(a, b)
    }
}

/// Caps the number of live nodes, delegating everything else to `inner`.
///
/// Allocation beyond the cap fails with
/// [`SortedTableError::AllocationError`], which makes memory budgets explicit
/// for embedders.
#[derive(Debug, Clone)]
pub struct NodeLimit<P> {
    inner: P,
    max_nodes: usize,
}

impl<P> NodeLimit<P> {
    pub fn new(inner: P, max_nodes: usize) -> Self {
        Self { inner, max_nodes }
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Change the cap. Nodes already live are unaffected.
    pub fn set_max_nodes(&mut self, max_nodes: usize) {
        self.max_nodes = max_nodes;
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<K, V, P: TablePolicy<K, V>> TablePolicy<K, V> for NodeLimit<P> {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.inner.compare(a, b)
    }

    fn allocate(&mut self, live_nodes: usize) -> TableResult<()> {
        if live_nodes >= self.max_nodes {
            return Err(SortedTableError::allocation_error(
                "node",
                &format!("limit of {} live nodes reached", self.max_nodes),
            ));
        }
        self.inner.allocate(live_nodes)
    }

    fn deallocate(&mut self) {
        self.inner.deallocate();
    }

    fn destroy_key(&mut self, key: K) {
        self.inner.destroy_key(key);
    }

    fn destroy_value(&mut self, value: V) {
        self.inner.destroy_value(value);
    }
}
