//! # `treebucket` - Balanced Trees and Tree-Bucketed Hash Maps
//!
//! Two layered collections:
//!
//! - [`AvlTree`]: a key-ordered, height-balanced binary search tree with point
//!   lookup, insertion, deletion, ascending extraction, minimum tracking and a
//!   bulk rebuild from sorted input.
//! - [`TreeHashMap`]: a hash map whose buckets are [`AvlTree`]s. It owns every
//!   stored value, routes keys with a pluggable [`BucketHasher`], and grows or
//!   shrinks its bucket array to keep the load factor between two thresholds.
//!
//! ## Guarantees
//!
//! ### Structural invariants
//! - **Ordering**: keys in a left subtree < node key < keys in the right subtree.
//! - **Balance**: every node's balance factor stays within `-1..=1`.
//! - **Height caches**: each node's cached subtree heights are exact.
//!
//! These hold before and after every public operation and can be re-checked
//! from scratch with [`AvlTree::is_consistent`].
//!
//! ### Failure atomicity
//! Every precondition (key presence, argument validity) is checked before any
//! node moves, so a failed call leaves the collection exactly as it was.
//!
//! ### Resize policy
//! After each map insert or delete, `len / capacity` is compared with the
//! [`MapConfig`] thresholds (0.75 and 0.25 by default). A resize rehashes
//! everything before returning; capacity never drops below `min_capacity`.
//!
//! ## Architecture
//!
//! Tree nodes live in a [`GenerationalPool`](alloc::GenerationalPool); child and
//! parent links are generational indices, so a node's parent link is never an
//! owner. The map keeps its values in a second pool and its bucket trees index
//! into it, which lets a rehash move only keys and indices.
//!
//! Neither collection is synchronised; share them across threads only behind
//! your own lock.
//!
//! ## Example
//!
//! ```rust
//! use treebucket::{AvlTree, TreeHashMap};
//!
//! let mut tree = AvlTree::new();
//! for k in 1..=8 {
//!     tree.insert(k, k * 10).unwrap();
//! }
//! assert!(tree.is_balanced());
//! assert_eq!(*tree.minimum().unwrap().value(), 10);
//!
//! let mut map = TreeHashMap::new();
//! for k in 0..8 {
//!     map.insert(k, format!("value {k}")).unwrap();
//! }
//! assert_eq!(map.capacity(), 20);
//! assert_eq!(map.find(&3).unwrap(), "value 3");
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod trace;

pub mod alloc;
pub mod collections;

pub use collections::{
    AvlTree,
    BucketHasher,
    BuildBucketHasher,
    Cursor,
    IntegralHasher,
    MapConfig,
    MapError,
    NodeHandle,
    TreeError,
    TreeHashMap,
};

