//! Slot storage shared by the tree and map implementations.

pub mod generational_pool;

pub use generational_pool::{GenerationalIndex, GenerationalPool};
