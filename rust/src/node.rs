//! Balancing primitives for the left-leaning red-black tree.
//!
//! All primitives work on arena indices and return the ID of the node that
//! now roots the affected subtree; callers reattach that ID to the parent.

use crate::arena::{NodeId, NULL_NODE};
use crate::policy::TablePolicy;
use crate::types::{Color, SortedTable};

// Rotations are mirror images; `$near` is the side the old root moves to.
macro_rules! rotation {
    ($near:ident, $far:ident) => {
        paste::paste! {
            /// Rotate `h` across its red far-side link. The promoted child
            /// inherits `h`'s color and `h` hangs below it on a red link.
            pub(crate) fn [<rotate_ $near>](&mut self, h: NodeId) -> NodeId {
                let Some(x) = self.arena[h].$far else {
                    return h;
                };
                debug_assert!(
                    self.arena[x].color == Color::Red,
                    "rotating across a black link"
                );
                self.arena[h].$far = self.arena[x].$near;
                self.arena[x].$near = Some(h);
                self.arena[x].color = self.arena[h].color;
                self.arena[h].color = Color::Red;
                self.arena[x].size = self.arena[h].size;
                self.update_size(h);
                x
            }
        }
    };
}

impl<K, V, P: TablePolicy<K, V>> SortedTable<K, V, P> {
    /// Absent links are black.
    #[inline]
    pub(crate) fn is_red(&self, link: Option<NodeId>) -> bool {
        match link {
            Some(id) => self.arena[id].color == Color::Red,
            None => false,
        }
    }

    #[inline]
    pub(crate) fn link_size(&self, link: Option<NodeId>) -> usize {
        link.map_or(0, |id| self.arena[id].size)
    }

    #[inline]
    pub(crate) fn update_size(&mut self, h: NodeId) {
        let node = &self.arena[h];
        let size = 1 + self.link_size(node.left) + self.link_size(node.right);
        self.arena[h].size = size;
    }

    /// Left child of a node the rebalancing logic knows has one.
    #[inline]
    pub(crate) fn left_of(&self, h: NodeId) -> NodeId {
        let left = self.arena[h].left;
        debug_assert!(left.is_some(), "node {} has no left child", h);
        left.unwrap_or(NULL_NODE)
    }

    /// Right child of a node the rebalancing logic knows has one.
    #[inline]
    pub(crate) fn right_of(&self, h: NodeId) -> NodeId {
        let right = self.arena[h].right;
        debug_assert!(right.is_some(), "node {} has no right child", h);
        right.unwrap_or(NULL_NODE)
    }

    rotation!(left, right);
    rotation!(right, left);

    /// Toggle the color of `h` and of both its children.
    pub(crate) fn flip_colors(&mut self, h: NodeId) {
        let node = &mut self.arena[h];
        node.color = node.color.flipped();
        let (left, right) = (node.left, node.right);
        for child in [left, right].into_iter().flatten() {
            let child = &mut self.arena[child];
            child.color = child.color.flipped();
        }
    }

    /// Restore the local invariants at `h` on the way back up.
    pub(crate) fn fixup(&mut self, mut h: NodeId) -> NodeId {
        if self.is_red(self.arena[h].right) && !self.is_red(self.arena[h].left) {
            h = self.rotate_left(h);
        }
        if let Some(left) = self.arena[h].left {
            if self.is_red(Some(left)) && self.is_red(self.arena[left].left) {
                h = self.rotate_right(h);
            }
        }
        if self.is_red(self.arena[h].left) && self.is_red(self.arena[h].right) {
            self.flip_colors(h);
        }
        self.update_size(h);
        h
    }

    /// Make `h.left` or one of its children red before descending left.
    pub(crate) fn move_red_left(&mut self, mut h: NodeId) -> NodeId {
        self.flip_colors(h);
        let right = self.right_of(h);
        if self.is_red(self.arena[right].left) {
            let promoted = self.rotate_right(right);
            self.arena[h].right = Some(promoted);
            h = self.rotate_left(h);
            self.flip_colors(h);
        }
        h
    }

    /// Make `h.right` or one of its children red before descending right.
    pub(crate) fn move_red_right(&mut self, mut h: NodeId) -> NodeId {
        self.flip_colors(h);
        let left = self.left_of(h);
        if self.is_red(self.arena[left].left) {
            h = self.rotate_right(h);
            self.flip_colors(h);
        }
        h
    }
}
