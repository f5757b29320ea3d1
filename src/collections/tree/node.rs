use crate::alloc::GenerationalIndex;

/// Arena index of a tree node.
pub(crate) type NodeId = GenerationalIndex;

/// Which child slot of a node an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    // Back-reference only; the tree's pool owns every node.
    pub(crate) parent: Option<NodeId>,
    pub(crate) left_height: u32,
    pub(crate) right_height: u32,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            parent: None,
            left_height: 0,
            right_height: 0,
        }
    }

    pub(crate) fn height(&self) -> u32 {
        self.left_height.max(self.right_height) + 1
    }

    /// Left subtree height minus right subtree height.
    pub(crate) fn balance_factor(&self) -> i64 {
        i64::from(self.left_height) - i64::from(self.right_height)
    }

    #[cfg(test)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}
