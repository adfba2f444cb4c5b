//! Slot arena backing the table's nodes.
//!
//! Nodes are addressed by [`NodeId`] indices instead of pointers. Growth is
//! fallible: [`NodeArena::reserve_slot`] must succeed before
//! [`NodeArena::allocate`] is called, so an allocation failure is reported
//! before any node is touched.

use std::ops::{Index, IndexMut};

use crate::error::{SortedTableError, TreeResult};

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Never handed out by [`NodeArena::allocate`]; indexing with it panics.
pub(crate) const NULL_NODE: NodeId = u32::MAX;

/// Statistics for a node arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
    pub fragmentation: f64,
}

/// Arena allocator with a free list for slot reuse.
#[derive(Debug)]
pub struct NodeArena<T> {
    storage: Vec<Option<T>>,
    /// Vacated slot indices, reused before the storage grows.
    free_list: Vec<usize>,
    allocated: usize,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated: 0,
        }
    }

    /// Create an arena with room for `capacity` nodes, failing instead of aborting
    /// when the memory is not available.
    pub fn try_with_capacity(capacity: usize) -> TreeResult<Self> {
        let mut arena = Self::new();
        arena.grow_to(capacity)?;
        Ok(arena)
    }

    /// Make sure the next [`allocate`](Self::allocate) cannot fail.
    pub fn reserve_slot(&mut self) -> TreeResult<()> {
        if !self.free_list.is_empty() {
            return Ok(());
        }
        if self.storage.len() >= NULL_NODE as usize {
            return Err(SortedTableError::allocation_error(
                "node slot",
                "node id space exhausted",
            ));
        }
        self.grow_to(self.storage.len() + 1)
    }

    fn grow_to(&mut self, slots: usize) -> TreeResult<()> {
        let additional = slots.saturating_sub(self.storage.len());
        self.storage
            .try_reserve(additional)
            .map_err(|e| SortedTableError::allocation_error("node slot", &e.to_string()))?;
        // Deallocation pushes onto the free list; keep it able to hold every slot.
        let free_additional = slots.saturating_sub(self.free_list.len());
        self.free_list
            .try_reserve(free_additional)
            .map_err(|e| SortedTableError::allocation_error("free list", &e.to_string()))
    }

    /// Store `item` and return its ID. Call [`reserve_slot`](Self::reserve_slot) first.
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = Some(item);
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(Some(item));
            index
        };
        self.allocated += 1;
        index as NodeId
    }

    /// Remove an item from the arena and return it.
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T> {
        let index = id as usize;
        let item = self.storage.get_mut(index)?.take()?;
        self.free_list.push(index);
        self.allocated -= 1;
        Some(item)
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.storage.get(id as usize)?.as_ref()
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.storage.get_mut(id as usize)?.as_mut()
    }

    /// Mutable access to two distinct slots at once.
    pub fn get_pair_mut(&mut self, a: NodeId, b: NodeId) -> Option<(&mut T, &mut T)> {
        let (a, b) = (a as usize, b as usize);
        if a == b || a >= self.storage.len() || b >= self.storage.len() {
            return None;
        }
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.storage.split_at_mut(high);
        let (first, second) = (head[low].as_mut()?, tail[0].as_mut()?);
        if a < b {
            Some((first, second))
        } else {
            Some((second, first))
        }
    }

    /// Drop every slot. Items still present are dropped without ceremony;
    /// callers that need per-item teardown must deallocate first.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.free_list.clear();
        self.allocated = 0;
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// Get the number of vacant slots awaiting reuse
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Get arena statistics
    pub fn stats(&self) -> ArenaStats {
        let total_capacity = self.storage.capacity();
        let allocated_count = self.allocated;
        let free_count = self.free_count();
        let utilization = if total_capacity > 0 {
            allocated_count as f64 / total_capacity as f64
        } else {
            0.0
        };
        let fragmentation = if allocated_count > 0 {
            free_count as f64 / (allocated_count + free_count) as f64
        } else {
            0.0
        };

        ArenaStats {
            total_capacity,
            allocated_count,
            free_count,
            utilization,
            fragmentation,
        }
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("node {} is not allocated", id),
        }
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(item) => item,
            None => panic!("node {} is not allocated", id),
        }
    }
}
