//! Hash-based collections.
//!
//! [`TreeHashMap`] resolves collisions with one [`AvlTree`](crate::collections::tree::AvlTree)
//! per bucket and resizes itself to keep its load factor inside a configured band.

pub mod bucket_hasher;
pub mod config;
pub mod error;
mod resize;
pub mod tree_hash_map;

pub use bucket_hasher::{BucketHasher, BuildBucketHasher, IntegralHasher};
pub use config::MapConfig;
pub use error::MapError;
pub use tree_hash_map::TreeHashMap;
