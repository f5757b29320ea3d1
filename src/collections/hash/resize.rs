//! Load-factor checks and full rehashing for [`TreeHashMap`].

use super::bucket_hasher::BucketHasher;
use super::error::MapError;
use super::tree_hash_map::{empty_buckets, TreeHashMap, ValueKey};

impl<K: Ord, V, H: BucketHasher<K>> TreeHashMap<K, V, H> {
    /// Grows or shrinks the bucket array if the load factor left its band.
    ///
    /// At most one resize happens per call. Shrinking stops at `min_capacity`.
    pub(crate) fn check_load_factor(&mut self) -> Result<(), MapError> {
        let capacity = self.capacity();
        let load = self.load_factor();

        if load >= self.config.grow_threshold {
            self.resize(capacity.saturating_mul(self.config.resize_factor))
        } else if load <= self.config.shrink_threshold && capacity > self.config.min_capacity {
            self.resize((capacity / self.config.resize_factor).max(self.config.min_capacity))
        } else {
            Ok(())
        }
    }

    /// Rehashes every entry into a fresh array of `new_capacity` buckets.
    ///
    /// Old buckets are drained in ascending key order and routed to per-bucket
    /// staging lists; each list is then installed with a single bulk rebuild.
    /// Only keys and value handles move.
    pub(crate) fn resize(&mut self, new_capacity: usize) -> Result<(), MapError> {
        trace_debug!(
            old_capacity = self.capacity(),
            new_capacity,
            len = self.len(),
            "resizing bucket array"
        );

        let old_buckets = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        let mut staged: Vec<Vec<(K, ValueKey)>> = (0..new_capacity).map(|_| Vec::new()).collect();

        for bucket in old_buckets {
            for (key, handle) in bucket.into_sorted_vec() {
                let index = self.bucket_of(&key);
                staged[index].push((key, handle));
            }
        }

        for (bucket, mut entries) in self.buckets.iter_mut().zip(staged) {
            if entries.is_empty() {
                continue;
            }
            // One ascending run per contributing old bucket.
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let count = isize::try_from(entries.len())
                .map_err(|_| MapError::InvalidArgument("bucket holds more than isize::MAX entries"))?;
            bucket.generate_in_order(entries, count)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::config::MapConfig;
    use super::*;

    #[test]
    fn eighth_insert_doubles_capacity_once() {
        let mut map = TreeHashMap::new();
        let mut growths = 0;
        for k in 0..8i32 {
            let before = map.capacity();
            map.insert(k, k).unwrap();
            if map.capacity() != before {
                growths += 1;
            }
        }
        assert_eq!(growths, 1);
        assert_eq!(map.capacity(), 20);
    }

    #[test]
    fn shrink_stops_at_min_capacity() {
        let mut map = TreeHashMap::new();
        for k in 0..100i32 {
            map.insert(k, ()).unwrap();
        }
        let peak = map.capacity();
        for k in 0..100 {
            map.delete(&k).unwrap();
        }
        assert!(peak > 10);
        assert_eq!(map.capacity(), 10);
        assert!(map.is_empty());
        assert!(map.is_consistent());
    }

    #[test]
    fn explicit_resize_keeps_every_entry() {
        let mut map = TreeHashMap::with_config(MapConfig::default().with_min_capacity(4)).unwrap();
        for k in [5i32, -3, 17, 40] {
            map.insert(k, k * 2).unwrap();
        }
        map.resize(7).unwrap();
        assert_eq!(map.capacity(), 7);
        assert!(map.is_consistent());
        for k in [5, -3, 17, 40] {
            assert_eq!(map.find(&k), Ok(&(k * 2)));
        }
    }
}
