//! Collections provided by the crate.
//!
//! Collections are organized by data structure type:
//! - `tree`: the AVL tree and its cursors
//! - `hash`: the tree-bucketed hash map, its hashers and resize policy

pub mod hash;
pub mod tree;

// Re-export commonly used types from submodules
pub use hash::{BucketHasher, BuildBucketHasher, IntegralHasher, MapConfig, MapError, TreeHashMap};
pub use tree::{AvlTree, Cursor, NodeHandle, TreeError};
