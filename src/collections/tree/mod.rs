//! Height-balanced ordered trees.
//!
//! [`AvlTree`] is a key-ordered AVL tree that supports point lookup, insertion,
//! deletion, ascending extraction, minimum tracking and a bulk rebuild from
//! sorted input. [`Cursor`] walks the tree structure node by node.

pub mod avl_tree;
pub mod cursor;
pub mod error;
pub mod iter;
mod node;
mod rebuild;
mod rotation;

pub use avl_tree::AvlTree;
pub use cursor::{Cursor, NodeHandle};
pub use error::TreeError;
pub use iter::Iter;
