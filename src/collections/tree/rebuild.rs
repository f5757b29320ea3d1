//! Bulk construction of an [`AvlTree`] from pre-sorted entries.
//!
//! Instead of `count` single insertions the tree is shaped first: a complete
//! data-less skeleton of the smallest sufficient height is built, surplus
//! bottom leaves are trimmed away in order, and the sorted entries are then
//! poured into the remaining slots in order.

use super::avl_tree::AvlTree;
use super::error::TreeError;
use super::node::{Node, NodeId, Side};

/// Smallest `h` such that a complete binary tree of height `h` has at least `count` slots.
pub(crate) fn height_for_count(count: usize) -> u32 {
    let mut height = 0u32;
    while slots_at_height(height) < count {
        height += 1;
    }
    height
}

fn slots_at_height(height: u32) -> usize {
    1usize
        .checked_shl(height)
        .map_or(usize::MAX, |full| full - 1)
}

#[derive(Debug, Clone, Copy)]
struct Blank {
    left: Option<usize>,
    right: Option<usize>,
    parent: Option<usize>,
    left_height: u32,
    right_height: u32,
}

impl Blank {
    fn height(&self) -> u32 {
        self.left_height.max(self.right_height) + 1
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Shape-only tree used while deciding where each entry goes.
#[derive(Debug)]
struct Skeleton {
    slots: Vec<Blank>,
    root: Option<usize>,
    len: usize,
}

impl Skeleton {
    fn complete(height: u32) -> Self {
        let mut skeleton = Self {
            slots: Vec::with_capacity(slots_at_height(height)),
            root: None,
            len: 0,
        };
        skeleton.root = skeleton.blank_subtree(height, None);
        skeleton
    }

    fn blank_subtree(&mut self, height: u32, parent: Option<usize>) -> Option<usize> {
        if height == 0 {
            return None;
        }

        let slot = self.slots.len();
        self.slots.push(Blank {
            left: None,
            right: None,
            parent,
            left_height: height - 1,
            right_height: height - 1,
        });
        self.len += 1;

        let left = self.blank_subtree(height - 1, Some(slot));
        let right = self.blank_subtree(height - 1, Some(slot));
        self.slots[slot].left = left;
        self.slots[slot].right = right;
        Some(slot)
    }

    /// Drops bottom leaves, leftmost first, until exactly `requested` slots remain.
    fn trim_in_order(&mut self, requested: usize) {
        if let Some(root) = self.root {
            self.trim(root, requested);
        }
    }

    fn trim(&mut self, slot: usize, requested: usize) {
        if self.len == requested {
            return;
        }

        if let Some(left) = self.slots[slot].left {
            self.trim(left, requested);
        }

        let blank = self.slots[slot];
        if blank.is_leaf() {
            if self.len > requested {
                self.detach(slot);
            }
            return;
        }

        if let Some(right) = blank.right {
            self.trim(right, requested);
        }
        self.refresh(slot);
    }

    fn detach(&mut self, slot: usize) {
        match self.slots[slot].parent {
            Some(parent) => {
                let p = &mut self.slots[parent];
                if p.left == Some(slot) {
                    p.left = None;
                    p.left_height = 0;
                } else {
                    p.right = None;
                    p.right_height = 0;
                }
            }
            None => self.root = None,
        }
        self.len -= 1;
    }

    fn refresh(&mut self, slot: usize) {
        let blank = self.slots[slot];
        let left = blank.left.map_or(0, |l| self.slots[l].height());
        let right = blank.right.map_or(0, |r| self.slots[r].height());
        self.slots[slot].left_height = left;
        self.slots[slot].right_height = right;
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    /// Rebuilds the tree from the first `count` of `entries`, which must be
    /// sorted by strictly ascending key.
    ///
    /// Entries past `count` are dropped. A `count` of zero empties the tree.
    /// When `count` equals the current length the existing shape is kept and
    /// only the entries are replaced.
    ///
    /// # Errors
    /// - [`TreeError::InvalidArgument`] if `count` is negative, exceeds the
    ///   number of entries, or the keys are not strictly ascending.
    /// - [`TreeError::NullArgument`] if `count` is positive but `entries` is empty.
    ///
    /// The tree is left untouched on error.
    pub fn generate_in_order(&mut self, mut entries: Vec<(K, V)>, count: isize) -> Result<(), TreeError> {
        let count = usize::try_from(count)
            .map_err(|_| TreeError::InvalidArgument("count must not be negative"))?;
        if count == 0 {
            self.clear();
            return Ok(());
        }
        if entries.is_empty() {
            return Err(TreeError::NullArgument("sorted entries"));
        }
        if entries.len() < count {
            return Err(TreeError::InvalidArgument("count exceeds the number of entries"));
        }
        if entries[..count].windows(2).any(|pair| pair[0].0 >= pair[1].0) {
            return Err(TreeError::InvalidArgument("entries are not in strictly ascending key order"));
        }
        entries.truncate(count);

        if count == self.len() {
            self.refill_in_order(entries);
        } else {
            let height = height_for_count(count);
            let mut skeleton = Skeleton::complete(height);
            skeleton.trim_in_order(count);

            self.clear();
            let mut entries = entries.into_iter();
            self.root = self.fill_slot(&skeleton, skeleton.root, &mut entries);
        }
        self.refresh_minimum();

        trace_debug!(count, height = self.height(), "rebuilt tree from sorted entries");
        Ok(())
    }

    fn refill_in_order(&mut self, entries: Vec<(K, V)>) {
        for (id, (key, value)) in self.in_order_ids().into_iter().zip(entries) {
            let node = &mut self.nodes[id];
            node.key = key;
            node.value = value;
        }
    }

    fn fill_slot<I>(&mut self, skeleton: &Skeleton, slot: Option<usize>, entries: &mut I) -> Option<NodeId>
    where
        I: Iterator<Item = (K, V)>,
    {
        let blank = skeleton.slots[slot?];

        let left = self.fill_slot(skeleton, blank.left, entries);
        let (key, value) = entries.next()?;
        let id = self.nodes.alloc(Node::new(key, value));
        let right = self.fill_slot(skeleton, blank.right, entries);

        if let Some(left) = left {
            self.attach(id, Side::Left, left);
        }
        if let Some(right) = right {
            self.attach(id, Side::Right, right);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_for_count_matches_complete_tree_sizes() {
        assert_eq!(height_for_count(0), 0);
        assert_eq!(height_for_count(1), 1);
        assert_eq!(height_for_count(3), 2);
        assert_eq!(height_for_count(4), 3);
        assert_eq!(height_for_count(7), 3);
        assert_eq!(height_for_count(8), 4);
    }

    #[test]
    fn trim_removes_leftmost_bottom_leaves() {
        let mut skeleton = Skeleton::complete(3);
        assert_eq!(skeleton.len, 7);
        skeleton.trim_in_order(5);
        assert_eq!(skeleton.len, 5);

        let root = skeleton.slots[skeleton.root.unwrap()];
        let left = skeleton.slots[root.left.unwrap()];
        let right = skeleton.slots[root.right.unwrap()];
        assert!(left.is_leaf());
        assert_eq!(right.height(), 2);
        assert_eq!((root.left_height, root.right_height), (1, 2));
    }

    #[test]
    fn trim_to_full_size_keeps_skeleton() {
        let mut skeleton = Skeleton::complete(2);
        skeleton.trim_in_order(3);
        assert_eq!(skeleton.len, 3);
        assert_eq!(skeleton.slots[0].height(), 2);
    }

    #[test]
    fn five_sorted_entries_build_height_three() {
        let mut tree = AvlTree::new();
        let entries: Vec<_> = (1..=5).map(|k| (k, k * 100)).collect();
        tree.generate_in_order(entries, 5).unwrap();

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.height(), 3);
        assert!(tree.is_consistent());
        assert_eq!(tree.in_order_keys(), vec![&1, &2, &3, &4, &5]);
        assert_eq!(tree.get(&4), Some(&400));
    }

    #[test]
    fn rejected_input_leaves_tree_untouched() {
        let mut tree = AvlTree::new();
        tree.insert(9, 9).unwrap();

        assert!(matches!(
            tree.generate_in_order(vec![(1, 1)], -1),
            Err(TreeError::InvalidArgument(_))
        ));
        assert!(matches!(
            tree.generate_in_order(Vec::new(), 2),
            Err(TreeError::NullArgument(_))
        ));
        assert!(matches!(
            tree.generate_in_order(vec![(1, 1)], 2),
            Err(TreeError::InvalidArgument(_))
        ));
        assert!(matches!(
            tree.generate_in_order(vec![(2, 2), (1, 1)], 2),
            Err(TreeError::InvalidArgument(_))
        ));
        assert!(matches!(
            tree.generate_in_order(vec![(1, 1), (1, 2)], 2),
            Err(TreeError::InvalidArgument(_))
        ));

        assert_eq!(tree.in_order_keys(), vec![&9]);
        assert!(tree.is_consistent());
    }

    #[test]
    fn same_size_rebuild_reuses_shape() {
        let mut tree = AvlTree::new();
        for k in [10, 20, 30] {
            tree.insert(k, ()).unwrap();
        }
        let root = tree.root;

        tree.generate_in_order(vec![(1, ()), (2, ()), (3, ())], 3).unwrap();
        assert_eq!(tree.root, root);
        assert_eq!(tree.in_order_keys(), vec![&1, &2, &3]);
        assert_eq!(*tree.minimum().unwrap().key(), 1);
    }

    #[test]
    fn zero_count_clears_and_extra_entries_are_dropped() {
        let mut tree = AvlTree::new();
        tree.generate_in_order(vec![(1, 'a'), (2, 'b'), (0, 'z')], 2).unwrap();
        assert_eq!(tree.in_order_keys(), vec![&1, &2]);

        tree.generate_in_order(Vec::new(), 0).unwrap();
        assert!(tree.is_empty());
        assert!(tree.minimum().is_err());
    }

    #[test]
    fn every_count_up_to_64_is_balanced() {
        for count in 1..=64 {
            let mut tree = AvlTree::new();
            let entries: Vec<_> = (0..count).map(|k| (k, ())).collect();
            tree.generate_in_order(entries, count as isize).unwrap();
            assert!(tree.is_consistent(), "count {count}");
            assert_eq!(tree.height(), height_for_count(count as usize));
        }
    }
}
