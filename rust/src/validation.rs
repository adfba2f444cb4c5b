//! Validation and debugging utilities for SortedTable.
//!
//! The checker walks the tree with an explicit stack and resolves every link
//! through a checked arena lookup, so a corrupted tree with cycles or
//! dangling links is reported as `CorruptedTree` rather than looping or
//! panicking.

use std::cmp::Ordering;

use crate::arena::NodeId;
use crate::error::{SortedTableError, TableResult};
use crate::policy::TablePolicy;
use crate::types::{Color, SortedTable};

/// Shape summary produced by a successful [`SortedTable::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    pub len: usize,
    pub height: usize,
    /// Black nodes on every root-to-leaf path.
    pub black_height: usize,
    pub red_links: usize,
}

/// Pending node in the validation walk.
struct Visit {
    id: NodeId,
    /// Exclusive key bounds, as the nodes holding them.
    lower: Option<NodeId>,
    upper: Option<NodeId>,
    depth: usize,
    /// Black nodes above this one.
    blacks: usize,
    is_right: bool,
    parent_red: bool,
}

impl<K, V, P: TablePolicy<K, V>> SortedTable<K, V, P> {
    /// Check if the tree maintains the LLRB invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        self.validate().map(|_| ()).map_err(|e| e.to_string())
    }

    /// Verify ordering, coloring, black balance, subtree sizes and arena
    /// accounting.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortedtable::SortedTable;
    ///
    /// let mut table = SortedTable::new();
    /// for key in 0..100 {
    ///     table.insert(key, ()).unwrap();
    /// }
    /// let stats = table.validate().unwrap();
    /// assert_eq!(stats.len, 100);
    /// assert!(stats.height <= 2 * stats.black_height);
    /// ```
    pub fn validate(&self) -> TableResult<TreeStats> {
        let Some(root) = self.root else {
            return self.check_arena_accounting(0).map(|_| TreeStats::default());
        };
        if self.arena.get(root).map(|n| n.color) != Some(Color::Black) {
            return Err(SortedTableError::corrupted_tree("root", "root is missing or red"));
        }

        let mut stats = TreeStats::default();
        let mut leaf_blacks: Option<usize> = None;
        let mut stack = vec![Visit {
            id: root,
            lower: None,
            upper: None,
            depth: 1,
            blacks: 0,
            is_right: false,
            parent_red: false,
        }];

        while let Some(visit) = stack.pop() {
            stats.len += 1;
            if stats.len > self.arena.len() {
                return Err(SortedTableError::corrupted_tree(
                    "link",
                    "more nodes reachable than allocated",
                ));
            }
            let node = self.arena.get(visit.id).ok_or_else(|| {
                SortedTableError::corrupted_tree("link", &format!("node {} is not allocated", visit.id))
            })?;
            let id = visit.id;
            stats.height = stats.height.max(visit.depth);

            self.check_bounds(id, visit.lower, visit.upper)?;

            let red = node.color == Color::Red;
            if red {
                stats.red_links += 1;
                if visit.is_right {
                    return Err(SortedTableError::corrupted_tree(
                        "color",
                        &format!("node {} is a red right child", id),
                    ));
                }
                if visit.parent_red {
                    return Err(SortedTableError::corrupted_tree(
                        "color",
                        &format!("node {} is red below a red parent", id),
                    ));
                }
            }
            let blacks = visit.blacks + usize::from(!red);

            let expected = 1 + self.child_size(id, node.left)? + self.child_size(id, node.right)?;
            if node.size != expected {
                return Err(SortedTableError::corrupted_tree(
                    "size",
                    &format!("node {} records {} but holds {}", id, node.size, expected),
                ));
            }

            for (child, is_right) in [(node.left, false), (node.right, true)] {
                let Some(child) = child else {
                    // Every absent link ends a path.
                    match leaf_blacks {
                        None => leaf_blacks = Some(blacks),
                        Some(b) if b != blacks => {
                            return Err(SortedTableError::corrupted_tree(
                                "balance",
                                &format!("paths with {} and {} black nodes", b, blacks),
                            ));
                        }
                        Some(_) => {}
                    }
                    continue;
                };
                let (lower, upper) = if is_right {
                    (Some(id), visit.upper)
                } else {
                    (visit.lower, Some(id))
                };
                stack.push(Visit {
                    id: child,
                    lower,
                    upper,
                    depth: visit.depth + 1,
                    blacks,
                    is_right,
                    parent_red: red,
                });
            }
        }

        stats.black_height = leaf_blacks.unwrap_or(0);
        if self.len() != stats.len {
            return Err(SortedTableError::corrupted_tree(
                "size",
                &format!("root records {} entries, {} reachable", self.len(), stats.len),
            ));
        }
        self.check_arena_accounting(stats.len)?;
        Ok(stats)
    }

    /// Size of a child subtree, without trusting that the link resolves.
    fn child_size(&self, parent: NodeId, link: Option<NodeId>) -> TableResult<usize> {
        match link {
            None => Ok(0),
            Some(child) => self.arena.get(child).map(|node| node.size).ok_or_else(|| {
                SortedTableError::corrupted_tree(
                    "link",
                    &format!("node {} links to unallocated node {}", parent, child),
                )
            }),
        }
    }

    fn check_bounds(&self, id: NodeId, lower: Option<NodeId>, upper: Option<NodeId>) -> TableResult<()> {
        let key = &self.arena[id].key;
        if let Some(lower) = lower {
            if self.policy.compare(key, &self.arena[lower].key) != Ordering::Greater {
                return Err(SortedTableError::corrupted_tree(
                    "order",
                    &format!("node {} is not above its lower bound {}", id, lower),
                ));
            }
        }
        if let Some(upper) = upper {
            if self.policy.compare(key, &self.arena[upper].key) != Ordering::Less {
                return Err(SortedTableError::corrupted_tree(
                    "order",
                    &format!("node {} is not below its upper bound {}", id, upper),
                ));
            }
        }
        Ok(())
    }

    fn check_arena_accounting(&self, reachable: usize) -> TableResult<()> {
        if self.arena.len() != reachable {
            return Err(SortedTableError::corrupted_tree(
                "arena",
                &format!("{} nodes allocated, {} reachable", self.arena.len(), reachable),
            ));
        }
        Ok(())
    }

    /// Returns all key-value pairs as a vector (for testing/debugging).
    pub fn slice(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }
}
