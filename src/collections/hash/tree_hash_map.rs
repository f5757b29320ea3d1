//! `TreeHashMap` - a resizing hash map whose buckets are AVL trees.
//!
//! A key is routed to one of `capacity` buckets by a [`BucketHasher`]; each
//! bucket is an [`AvlTree`] ordered by key, so a bucket with many collisions
//! still answers lookups in logarithmic time.
//!
//! Ownership is split: the map owns every value in a [`GenerationalPool`] and
//! the bucket trees only store the `Copy` index of that value. Rehashing
//! therefore moves keys and indices around but never touches a value.
//!
//! Key optimizations:
//! - **Tree buckets**: collisions degrade to `O(log n)`, not `O(n)`
//! - **Load factor management**: grow at 75%, shrink at 25%, never below the configured floor
//! - **Bulk rehash**: buckets are rebuilt from sorted runs instead of one insert at a time

use super::bucket_hasher::{BucketHasher, IntegralHasher};
use super::config::MapConfig;
use super::error::MapError;
use crate::alloc::{GenerationalIndex, GenerationalPool};
use crate::collections::tree::AvlTree;
use core::fmt;

/// Index of a value in the map's value pool.
pub(crate) type ValueKey = GenerationalIndex;

pub(crate) fn empty_buckets<K>(capacity: usize) -> Vec<AvlTree<K, ValueKey>> {
    (0..capacity).map(|_| AvlTree::new()).collect()
}

/// A hash map that chains colliding keys into per-bucket AVL trees.
///
/// Keys are unique across the whole map. Inserting an existing key or
/// deleting a missing one fails without changing anything.
pub struct TreeHashMap<K, V, H = IntegralHasher> {
    pub(crate) buckets: Vec<AvlTree<K, ValueKey>>,
    pub(crate) values: GenerationalPool<V>,
    pub(crate) config: MapConfig,
    pub(crate) hasher: H,
}

impl<K: Ord, V> TreeHashMap<K, V>
where
    IntegralHasher: BucketHasher<K>,
{
    /// Creates an empty map for integer keys with the default policy.
    pub fn new() -> Self {
        Self::with_hasher(IntegralHasher)
    }

    /// Creates an empty map for integer keys with a custom policy.
    ///
    /// # Errors
    /// Returns [`MapError::InvalidArgument`] if `config` fails validation.
    pub fn with_config(config: MapConfig) -> Result<Self, MapError> {
        Self::with_config_and_hasher(config, IntegralHasher)
    }
}

impl<K: Ord, V, H: BucketHasher<K>> TreeHashMap<K, V, H> {
    /// Creates an empty map that routes keys with `hasher`.
    pub fn with_hasher(hasher: H) -> Self {
        let config = MapConfig::default();
        Self {
            buckets: empty_buckets(config.min_capacity),
            values: GenerationalPool::new(),
            config,
            hasher,
        }
    }

    /// Creates an empty map with a custom policy and hasher.
    ///
    /// # Errors
    /// Returns [`MapError::InvalidArgument`] if `config` fails validation.
    pub fn with_config_and_hasher(config: MapConfig, hasher: H) -> Result<Self, MapError> {
        config.validate()?;
        Ok(Self {
            buckets: empty_buckets(config.min_capacity),
            values: GenerationalPool::with_capacity(config.min_capacity),
            config,
            hasher,
        })
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.len() as f64 / self.capacity() as f64;
        ratio
    }

    /// The resize policy in effect.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub(crate) fn bucket_of(&self, key: &K) -> usize {
        let capacity = self.capacity();
        self.hasher.bucket_index(key, capacity) % capacity
    }

    /// Returns true if `key` is stored in the map.
    pub fn contains(&self, key: &K) -> bool {
        self.buckets[self.bucket_of(key)].contains_key(key)
    }

    /// Shared access to the value for `key`.
    ///
    /// # Errors
    /// Returns [`MapError::KeyNotFound`] if `key` is absent.
    pub fn find(&self, key: &K) -> Result<&V, MapError> {
        let handle = self.buckets[self.bucket_of(key)]
            .get(key)
            .ok_or(MapError::KeyNotFound)?;
        self.values.get(*handle).ok_or(MapError::KeyNotFound)
    }

    /// Mutable access to the value for `key`.
    ///
    /// # Errors
    /// Returns [`MapError::KeyNotFound`] if `key` is absent.
    pub fn find_mut(&mut self, key: &K) -> Result<&mut V, MapError> {
        let handle = *self.buckets[self.bucket_of(key)]
            .get(key)
            .ok_or(MapError::KeyNotFound)?;
        self.values.get_mut(handle).ok_or(MapError::KeyNotFound)
    }

    /// Inserts a new entry and returns a reference to the stored value.
    ///
    /// May grow the bucket array afterwards.
    ///
    /// # Errors
    /// Returns [`MapError::KeyAlreadyExists`] if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> Result<&mut V, MapError> {
        if self.contains(&key) {
            return Err(MapError::KeyAlreadyExists);
        }

        let index = self.bucket_of(&key);
        let handle = self.values.alloc(value);
        if let Err(err) = self.buckets[index].insert(key, handle) {
            self.values.free(handle);
            return Err(err.into());
        }

        self.check_load_factor()?;
        self.values.get_mut(handle).ok_or(MapError::KeyNotFound)
    }

    /// Removes the entry for `key` and returns its value.
    ///
    /// May shrink the bucket array afterwards.
    ///
    /// # Errors
    /// Returns [`MapError::KeyNotFound`] if `key` is absent.
    pub fn delete(&mut self, key: &K) -> Result<V, MapError> {
        if !self.contains(key) {
            return Err(MapError::KeyNotFound);
        }

        let index = self.bucket_of(key);
        let handle = self.buckets[index].delete(key)?;
        let value = self.values.free(handle).ok_or(MapError::KeyNotFound)?;

        self.check_load_factor()?;
        Ok(value)
    }

    /// Removes every entry and returns to the minimum capacity.
    pub fn clear(&mut self) {
        self.buckets = empty_buckets(self.config.min_capacity);
        self.values.clear();
    }

    /// Iterates over all entries, bucket by bucket, ascending within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(AvlTree::iter)
            .filter_map(move |(key, handle)| self.values.get(*handle).map(|value| (key, value)))
    }

    /// Iterates over all keys in [`iter`](Self::iter) order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterates over all values in [`iter`](Self::iter) order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Entry count of every bucket, indexed by bucket.
    pub fn bucket_lens(&self) -> Vec<usize> {
        self.buckets.iter().map(AvlTree::len).collect()
    }

    /// Checks every bucket tree and the routing of every key.
    ///
    /// Meant for tests and diagnostics.
    pub fn is_consistent(&self) -> bool {
        let routed = self.buckets.iter().enumerate().all(|(index, bucket)| {
            bucket.is_consistent()
                && bucket
                    .iter()
                    .all(|(key, handle)| self.bucket_of(key) == index && self.values.contains(*handle))
        });
        let total: usize = self.buckets.iter().map(AvlTree::len).sum();
        routed && total == self.values.len() && self.capacity() >= self.config.min_capacity
    }
}

impl<K: Ord, V> Default for TreeHashMap<K, V>
where
    IntegralHasher: BucketHasher<K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> fmt::Debug for TreeHashMap<K, V, H>
where
    K: Ord + fmt::Debug,
    V: fmt::Debug,
    H: BucketHasher<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_resizes_by_handle() {
        let mut map = TreeHashMap::new();
        for k in 0..40i32 {
            map.insert(k, format!("v{k}")).unwrap();
        }
        assert!(map.capacity() > 10);
        assert!(map.is_consistent());
        for k in 0..40 {
            assert_eq!(map.find(&k).unwrap(), &format!("v{k}"));
        }
    }

    #[test]
    fn failed_insert_releases_nothing() {
        let mut map = TreeHashMap::new();
        map.insert(1u32, 10).unwrap();
        assert_eq!(map.insert(1, 20), Err(MapError::KeyAlreadyExists));
        assert_eq!(map.len(), 1);
        assert_eq!(map.values.len(), 1);
        assert_eq!(map.find(&1), Ok(&10));
    }

    #[test]
    fn bucket_lens_follow_modulo_routing() {
        let mut map = TreeHashMap::new();
        for k in [3i64, 13, -7] {
            map.insert(k, ()).unwrap();
        }
        let lens = map.bucket_lens();
        assert_eq!(lens.len(), 10);
        assert_eq!(lens[3], 3);
        assert_eq!(lens.iter().sum::<usize>(), 3);
    }
}
