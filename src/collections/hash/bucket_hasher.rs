//! Key-to-bucket routing for [`TreeHashMap`](super::TreeHashMap).

use core::hash::{BuildHasher, Hash, Hasher};
use num_traits::PrimInt;
use std::collections::hash_map::RandomState;

/// Maps a key to one of `capacity` buckets.
///
/// Implementations must be deterministic for the lifetime of a map and
/// return a value in `0..capacity`; `capacity` is never zero.
pub trait BucketHasher<K: ?Sized> {
    /// Bucket index of `key` in a table of `capacity` buckets.
    fn bucket_index(&self, key: &K, capacity: usize) -> usize;
}

/// `key mod capacity` for primitive integer keys, shifted into range when
/// the remainder is negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegralHasher;

impl<K: PrimInt> BucketHasher<K> for IntegralHasher {
    fn bucket_index(&self, key: &K, capacity: usize) -> usize {
        let wide_capacity = capacity as u128;
        let index = match key.to_i128() {
            Some(k) => {
                #[allow(clippy::cast_possible_wrap)]
                let cap = wide_capacity as i128;
                let rem = k % cap;
                let wrapped = if rem < 0 { rem + cap } else { rem };
                wrapped.unsigned_abs()
            }
            // Only unsigned values above i128::MAX land here.
            None => key.to_u128().map_or(0, |k| k % wide_capacity),
        };
        #[allow(clippy::cast_possible_truncation)]
        let index = index as usize;
        index
    }
}

/// Routes any hashable key through a [`BuildHasher`].
#[derive(Debug, Clone, Default)]
pub struct BuildBucketHasher<S = RandomState> {
    hash_builder: S,
}

impl<S> BuildBucketHasher<S> {
    /// Wraps an existing hasher builder.
    pub fn new(hash_builder: S) -> Self {
        Self { hash_builder }
    }
}

impl<K: Hash + ?Sized, S: BuildHasher> BucketHasher<K> for BuildBucketHasher<S> {
    fn bucket_index(&self, key: &K, capacity: usize) -> usize {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        #[allow(clippy::cast_possible_truncation)]
        let index = (hasher.finish() % capacity as u64) as usize;
        index
    }
}
