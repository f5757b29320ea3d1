//! Cursors: navigable positions inside an [`AvlTree`].

use super::avl_tree::AvlTree;
use super::error::TreeError;
use super::node::NodeId;
use core::fmt;

/// A detached reference to a tree node.
///
/// Obtained from [`Cursor::handle`] and turned back into a cursor with
/// [`AvlTree::cursor_at`]. Unlike a cursor it does not borrow the tree, so it
/// can be kept across mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeHandle(pub(crate) NodeId);

/// A position in an [`AvlTree`] that can walk to children and parents.
///
/// Two cursors are equal when they belong to the same tree and sit on the
/// same node.
pub struct Cursor<'a, K, V> {
    tree: &'a AvlTree<K, V>,
    current: NodeId,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(tree: &'a AvlTree<K, V>, current: NodeId) -> Self {
        Self { tree, current }
    }

    /// Key of the current node.
    pub fn key(&self) -> &'a K {
        let tree = self.tree;
        &tree.nodes[self.current].key
    }

    /// Value of the current node.
    pub fn value(&self) -> &'a V {
        let tree = self.tree;
        &tree.nodes[self.current].value
    }

    /// Key and value of the current node.
    pub fn entry(&self) -> (&'a K, &'a V) {
        let tree = self.tree;
        let node = &tree.nodes[self.current];
        (&node.key, &node.value)
    }

    /// Returns true if the cursor is on the root node.
    pub fn is_root(&self) -> bool {
        self.tree.nodes[self.current].parent.is_none()
    }

    /// A detached handle to the current node.
    pub fn handle(&self) -> NodeHandle {
        NodeHandle(self.current)
    }

    /// Moves to the left child.
    ///
    /// # Errors
    /// Returns [`TreeError::IterationExhausted`] if there is no left child;
    /// the cursor stays where it was.
    pub fn move_left(&mut self) -> Result<&mut Self, TreeError> {
        self.current = self.tree.nodes[self.current]
            .left
            .ok_or(TreeError::IterationExhausted)?;
        Ok(self)
    }

    /// Moves to the right child.
    ///
    /// # Errors
    /// Returns [`TreeError::IterationExhausted`] if there is no right child;
    /// the cursor stays where it was.
    pub fn move_right(&mut self) -> Result<&mut Self, TreeError> {
        self.current = self.tree.nodes[self.current]
            .right
            .ok_or(TreeError::IterationExhausted)?;
        Ok(self)
    }

    /// Moves to the parent.
    ///
    /// # Errors
    /// Returns [`TreeError::AtRoot`] if the cursor is on the root.
    pub fn move_parent(&mut self) -> Result<&mut Self, TreeError> {
        self.current = self.tree.nodes[self.current]
            .parent
            .ok_or(TreeError::AtRoot)?;
        Ok(self)
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("key", self.key())
            .field("value", self.value())
            .finish()
    }
}
