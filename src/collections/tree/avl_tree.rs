//! `AvlTree` - a height-balanced binary search tree over a node arena.
//!
//! Every node caches the heights of both of its subtrees; a node's balance
//! factor is the difference of the two. Insertions and deletions recurse down
//! from the root and, on the way back up, refresh the cache of the side they
//! came from and rotate any node whose balance factor reached ±2.
//!
//! Nodes are owned by a [`GenerationalPool`], so the parent back-reference is
//! just another index and never an owner.
//!
//! Invariants between public calls:
//! - keys in a left subtree < node key < keys in the right subtree
//! - `|balance factor| <= 1` at every node
//! - cached side heights equal the real subtree heights
//! - `minimum` points at the leftmost node

use super::cursor::{Cursor, NodeHandle};
use super::error::TreeError;
use super::iter::Iter;
use super::node::{Node, NodeId, Side};
use crate::alloc::GenerationalPool;
use core::cmp::Ordering;
use core::fmt;

/// An ordered map backed by an AVL tree.
///
/// Keys are unique. Failed operations never modify the tree.
pub struct AvlTree<K, V> {
    pub(crate) nodes: GenerationalPool<Node<K, V>>,
    pub(crate) root: Option<NodeId>,
    pub(crate) minimum: Option<NodeId>,
}

impl<K, V> AvlTree<K, V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: GenerationalPool::new(),
            root: None,
            minimum: None,
        }
    }

    /// Number of entries in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; an empty tree has height 0.
    pub fn height(&self) -> u32 {
        self.root.map_or(0, |r| self.nodes[r].height())
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.minimum = None;
    }

    /// Cursor at the entry with the smallest key.
    ///
    /// # Errors
    /// Returns [`TreeError::KeyNotFound`] if the tree is empty.
    pub fn minimum(&self) -> Result<Cursor<'_, K, V>, TreeError> {
        self.minimum
            .map(|id| Cursor::new(self, id))
            .ok_or(TreeError::KeyNotFound)
    }

    /// Cursor at the root node.
    ///
    /// # Errors
    /// Returns [`TreeError::KeyNotFound`] if the tree is empty.
    pub fn root_cursor(&self) -> Result<Cursor<'_, K, V>, TreeError> {
        self.root
            .map(|id| Cursor::new(self, id))
            .ok_or(TreeError::KeyNotFound)
    }

    /// Re-opens a cursor at a node remembered through [`Cursor::handle`].
    ///
    /// A handle stays valid for as long as its node is alive, even across
    /// rebalancing. Deleting an entry whose node has two children moves the
    /// in-order successor's entry into that node, so the handle then observes
    /// the successor's key and value. [`clear`](Self::clear) and a
    /// [`generate_in_order`](Self::generate_in_order) that changes the length
    /// free every node, so all earlier handles go stale.
    ///
    /// # Errors
    /// Returns [`TreeError::KeyNotFound`] if the node has been freed.
    pub fn cursor_at(&self, handle: NodeHandle) -> Result<Cursor<'_, K, V>, TreeError> {
        if self.nodes.contains(handle.0) {
            Ok(Cursor::new(self, handle.0))
        } else {
            Err(TreeError::KeyNotFound)
        }
    }

    /// Values in ascending key order.
    pub fn in_order_extract(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Keys in ascending order.
    pub fn in_order_keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Iterates over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Consumes the tree, returning its entries in ascending key order.
    pub fn into_sorted_vec(mut self) -> Vec<(K, V)> {
        let ids = self.in_order_ids();
        ids.into_iter()
            .filter_map(|id| self.nodes.free(id))
            .map(|node| (node.key, node.value))
            .collect()
    }

    /// Returns true if no node has a balance factor outside `-1..=1`.
    pub fn is_balanced(&self) -> bool {
        self.max_balance_factor() < 2
    }

    /// Largest absolute balance factor over all nodes, recomputed from scratch.
    pub fn max_balance_factor(&self) -> u64 {
        self.in_order_ids()
            .into_iter()
            .map(|id| self.nodes[id].balance_factor().unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn in_order_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.nodes[id].left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            out.push(id);
            current = self.nodes[id].right;
        }
        out
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    pub(crate) fn refresh_minimum(&mut self) {
        self.minimum = self.root.map(|r| self.leftmost(r));
    }

    fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if let Some((x, y)) = self.nodes.get_pair_mut(a, b) {
            core::mem::swap(&mut x.key, &mut y.key);
            core::mem::swap(&mut x.value, &mut y.value);
        }
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    fn locate(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Returns true if `key` is stored in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    /// Cursor at the entry for `key`.
    ///
    /// # Errors
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent.
    pub fn find(&self, key: &K) -> Result<Cursor<'_, K, V>, TreeError> {
        self.locate(key)
            .map(|id| Cursor::new(self, id))
            .ok_or(TreeError::KeyNotFound)
    }

    /// Mutable access to the value for `key`.
    ///
    /// # Errors
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent.
    pub fn find_mut(&mut self, key: &K) -> Result<&mut V, TreeError> {
        self.get_mut(key).ok_or(TreeError::KeyNotFound)
    }

    /// Shared access to the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.locate(key).map(|id| &self.nodes[id].value)
    }

    /// Mutable access to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.locate(key)?;
        Some(&mut self.nodes[id].value)
    }

    /// Inserts a new entry.
    ///
    /// # Errors
    /// Returns [`TreeError::KeyAlreadyExists`] if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), TreeError> {
        if self.contains_key(&key) {
            return Err(TreeError::KeyAlreadyExists);
        }

        let id = self.nodes.alloc(Node::new(key, value));
        match self.root {
            None => self.root = Some(id),
            Some(root) => self.insert_below(root, id),
        }
        self.refresh_minimum();
        Ok(())
    }

    fn insert_below(&mut self, current: NodeId, new: NodeId) {
        let side = if self.nodes[current].key < self.nodes[new].key {
            Side::Right
        } else {
            Side::Left
        };

        match self.nodes[current].child(side) {
            None => self.attach(current, side, new),
            Some(child) => {
                self.insert_below(child, new);
                self.refresh_height(current, side);
            }
        }

        self.rebalance(current);
    }

    /// Removes the entry for `key` and returns its value.
    ///
    /// # Errors
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent.
    pub fn delete(&mut self, key: &K) -> Result<V, TreeError> {
        let root = match self.root {
            Some(root) if self.contains_key(key) => root,
            _ => return Err(TreeError::KeyNotFound),
        };

        let removed = self.delete_below(root, key);
        self.refresh_minimum();
        removed.map(|node| node.value).ok_or(TreeError::KeyNotFound)
    }

    fn delete_below(&mut self, current: NodeId, key: &K) -> Option<Node<K, V>> {
        let removed = match key.cmp(&self.nodes[current].key) {
            Ordering::Equal => {
                let node = &self.nodes[current];
                match (node.left, node.right) {
                    (Some(_), Some(right)) => {
                        // The successor's entry moves up into `current`; the
                        // key being deleted now sits at the successor's node.
                        let successor = self.leftmost(right);
                        self.swap_entries(current, successor);
                        let removed = self.delete_below(right, key);
                        self.refresh_height(current, Side::Right);
                        removed
                    }
                    (lone, None) | (None, lone) => {
                        self.splice_out(current, lone);
                        return self.nodes.free(current);
                    }
                }
            }
            Ordering::Less => {
                let left = self.nodes[current].left?;
                let removed = self.delete_below(left, key);
                self.refresh_height(current, Side::Left);
                removed
            }
            Ordering::Greater => {
                let right = self.nodes[current].right?;
                let removed = self.delete_below(right, key);
                self.refresh_height(current, Side::Right);
                removed
            }
        };

        self.rebalance(current);
        removed
    }

    /// Checks every structural invariant from scratch.
    ///
    /// Verifies ordering, balance, cached heights, parent links, the entry
    /// count and the cached minimum. Meant for tests and diagnostics.
    pub fn is_consistent(&self) -> bool {
        let Some(root) = self.root else {
            return self.is_empty_consistent();
        };
        if self.nodes[root].parent.is_some() {
            return false;
        }

        let mut visited = 0;
        if self.check_subtree(root, None, None, &mut visited).is_none() {
            return false;
        }
        visited == self.len() && self.minimum == Some(self.leftmost(root))
    }

    fn is_empty_consistent(&self) -> bool {
        self.nodes.is_empty() && self.minimum.is_none()
    }

    /// Returns the subtree height when every check below `id` passes.
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        visited: &mut usize,
    ) -> Option<u32> {
        let node = self.nodes.get(id)?;
        *visited += 1;

        if lower.is_some_and(|lo| node.key <= *lo) || upper.is_some_and(|hi| node.key >= *hi) {
            return None;
        }

        let mut heights = [0u32; 2];
        for (slot, child) in [node.left, node.right].into_iter().enumerate() {
            if let Some(child) = child {
                if self.nodes.get(child)?.parent != Some(id) {
                    return None;
                }
                let (lo, hi) = if slot == 0 {
                    (lower, Some(&node.key))
                } else {
                    (Some(&node.key), upper)
                };
                heights[slot] = self.check_subtree(child, lo, hi, visited)?;
            }
        }

        let [left, right] = heights;
        let cached = node.left_height == left && node.right_height == right;
        (cached && node.balance_factor().abs() <= 1).then(|| left.max(right) + 1)
    }
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders the keys in ascending order as `k1,k2,...,`.
impl<K: fmt::Display, V> fmt::Display for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, _) in self {
            write!(f, "{key},")?;
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
