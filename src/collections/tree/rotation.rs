//! Link maintenance and AVL rotations.
//!
//! Every helper here keeps three things in step: owning child links, parent
//! back-references and the cached side heights of the nodes whose children
//! changed. Callers never patch heights of a node they relinked by hand.

use super::avl_tree::AvlTree;
use super::node::{NodeId, Side};

impl<K, V> AvlTree<K, V> {
    /// Replaces one child link of `node` and refreshes the cached height on that side.
    pub(crate) fn set_child(&mut self, node: NodeId, side: Side, child: Option<NodeId>) {
        let height = child.map_or(0, |c| self.nodes[c].height());
        let n = &mut self.nodes[node];
        match side {
            Side::Left => {
                n.left = child;
                n.left_height = height;
            }
            Side::Right => {
                n.right = child;
                n.right_height = height;
            }
        }
    }

    /// Links `child` under `parent` in both directions.
    pub(crate) fn attach(&mut self, parent: NodeId, side: Side, child: NodeId) {
        self.set_child(parent, side, Some(child));
        self.nodes[child].parent = Some(parent);
    }

    /// Re-reads the height of the child on `side` into the cache of `node`.
    pub(crate) fn refresh_height(&mut self, node: NodeId, side: Side) {
        let child = self.nodes[node].child(side);
        self.set_child(node, side, child);
    }

    /// Points whatever referenced `old` (its parent's slot, or the root) at `new`.
    ///
    /// `parent` is passed in because rotations overwrite `old`'s back-reference first.
    pub(crate) fn relink_parent(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            Some(p) => {
                let side = if self.nodes[p].left == Some(old) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.set_child(p, side, new);
            }
            None => self.root = new,
        }
    }

    /// Detaches `node` from the tree, handing its slot to `replacement`.
    pub(crate) fn splice_out(&mut self, node: NodeId, replacement: Option<NodeId>) {
        let parent = self.nodes[node].parent.take();
        if let Some(r) = replacement {
            self.nodes[r].parent = parent;
        }
        self.relink_parent(parent, node, replacement);
    }

    /// Promotes the left child of `node`; returns the new subtree root.
    pub(crate) fn rotate_single_left(&mut self, node: NodeId) -> NodeId {
        let Some(promoted) = self.nodes[node].left else {
            return node;
        };
        let parent = self.nodes[node].parent;
        let inherited = self.nodes[promoted].right;

        self.set_child(node, Side::Left, inherited);
        if let Some(inherited) = inherited {
            self.nodes[inherited].parent = Some(node);
        }

        self.attach(promoted, Side::Right, node);
        self.nodes[promoted].parent = parent;
        self.relink_parent(parent, node, Some(promoted));

        trace_trace!(kind = "single-left", "rotated subtree");
        promoted
    }

    /// Promotes the right child of `node`; returns the new subtree root.
    pub(crate) fn rotate_single_right(&mut self, node: NodeId) -> NodeId {
        let Some(promoted) = self.nodes[node].right else {
            return node;
        };
        let parent = self.nodes[node].parent;
        let inherited = self.nodes[promoted].left;

        self.set_child(node, Side::Right, inherited);
        if let Some(inherited) = inherited {
            self.nodes[inherited].parent = Some(node);
        }

        self.attach(promoted, Side::Left, node);
        self.nodes[promoted].parent = parent;
        self.relink_parent(parent, node, Some(promoted));

        trace_trace!(kind = "single-right", "rotated subtree");
        promoted
    }

    /// Left child is right-heavy: straighten it, then promote it.
    pub(crate) fn rotate_double_left(&mut self, node: NodeId) -> NodeId {
        if let Some(left) = self.nodes[node].left {
            self.rotate_single_right(left);
        }
        self.rotate_single_left(node)
    }

    /// Right child is left-heavy: straighten it, then promote it.
    pub(crate) fn rotate_double_right(&mut self, node: NodeId) -> NodeId {
        if let Some(right) = self.nodes[node].right {
            self.rotate_single_left(right);
        }
        self.rotate_single_right(node)
    }

    /// Repairs `node` if its balance factor reached ±2.
    ///
    /// Both of `node`'s height caches must be current when this is called.
    pub(crate) fn rebalance(&mut self, node: NodeId) {
        match self.nodes[node].balance_factor() {
            2 => {
                let Some(left) = self.nodes[node].left else {
                    return;
                };
                if self.nodes[left].balance_factor() >= 0 {
                    self.rotate_single_left(node);
                } else {
                    self.rotate_double_left(node);
                }
            }
            -2 => {
                let Some(right) = self.nodes[node].right else {
                    return;
                };
                if self.nodes[right].balance_factor() == 1 {
                    self.rotate_double_right(node);
                } else {
                    self.rotate_single_right(node);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::tree::node::Node;

    /// Builds a left-leaning chain 3 -> 2 -> 1 by hand, bypassing `insert`.
    fn left_chain() -> (AvlTree<i32, ()>, [NodeId; 3]) {
        let mut tree = AvlTree::new();
        let three = tree.nodes.alloc(Node::new(3, ()));
        let two = tree.nodes.alloc(Node::new(2, ()));
        let one = tree.nodes.alloc(Node::new(1, ()));
        tree.attach(two, Side::Left, one);
        tree.attach(three, Side::Left, two);
        tree.root = Some(three);
        (tree, [three, two, one])
    }

    #[test]
    fn single_left_promotes_left_child_and_fixes_links() {
        let (mut tree, [three, two, one]) = left_chain();
        assert_eq!(tree.nodes[three].balance_factor(), 2);

        let top = tree.rotate_single_left(three);
        assert_eq!(top, two);
        assert_eq!(tree.root, Some(two));
        assert_eq!(tree.nodes[two].parent, None);
        assert_eq!(tree.nodes[two].left, Some(one));
        assert_eq!(tree.nodes[two].right, Some(three));
        assert_eq!(tree.nodes[three].parent, Some(two));
        assert_eq!(tree.nodes[one].parent, Some(two));
        assert_eq!(tree.nodes[three].height(), 1);
        assert_eq!(tree.nodes[two].height(), 2);
        assert_eq!(tree.nodes[two].balance_factor(), 0);
    }

    #[test]
    fn rebalance_picks_double_rotation_for_zigzag() {
        let mut tree = AvlTree::new();
        let three = tree.nodes.alloc(Node::new(3, ()));
        let one = tree.nodes.alloc(Node::new(1, ()));
        let two = tree.nodes.alloc(Node::new(2, ()));
        tree.attach(one, Side::Right, two);
        tree.attach(three, Side::Left, one);
        tree.root = Some(three);
        assert_eq!(tree.nodes[one].balance_factor(), -1);

        tree.rebalance(three);
        assert_eq!(tree.root, Some(two));
        assert_eq!(tree.nodes[two].left, Some(one));
        assert_eq!(tree.nodes[two].right, Some(three));
        assert_eq!(tree.nodes[one].parent, Some(two));
        assert_eq!(tree.nodes[three].parent, Some(two));
        assert!(tree.nodes[one].is_leaf());
        assert!(tree.nodes[three].is_leaf());
    }

    #[test]
    fn rotation_inside_subtree_updates_parent_slot() {
        let (mut tree, [three, two, one]) = left_chain();
        let top = tree.nodes.alloc(Node::new(10, ()));
        tree.attach(top, Side::Left, three);
        tree.root = Some(top);

        tree.rotate_single_left(three);
        assert_eq!(tree.root, Some(top));
        assert_eq!(tree.nodes[top].left, Some(two));
        assert_eq!(tree.nodes[two].parent, Some(top));
        assert_eq!(tree.nodes[top].left_height, 2);
        assert_eq!(tree.nodes[one].parent, Some(two));
    }
}
