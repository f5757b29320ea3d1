use proptest::prelude::*;
use std::collections::BTreeMap;
use treebucket::{MapError, TreeHashMap};

#[derive(Debug, Clone)]
enum Operation {
    Insert(i32, u32),
    Delete(i32),
    Find(i32),
}

fn operation() -> impl Strategy<Value = Operation> {
    let key = -200i32..200;
    prop_oneof![
        3 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Operation::Insert(k, v)),
        2 => key.clone().prop_map(Operation::Delete),
        1 => key.prop_map(Operation::Find),
    ]
}

proptest! {
    #[test]
    fn test_tree_hash_map_matches_std_map(ops in proptest::collection::vec(operation(), 1..400)) {
        let mut std_map = BTreeMap::new();
        let mut map = TreeHashMap::new();
        let min_capacity = map.config().min_capacity;

        for op in ops {
            match op {
                Operation::Insert(k, v) => {
                    if std_map.contains_key(&k) {
                        prop_assert_eq!(map.insert(k, v).err(), Some(MapError::KeyAlreadyExists));
                    } else {
                        std_map.insert(k, v);
                        prop_assert_eq!(map.insert(k, v).copied(), Ok(v));
                    }
                }
                Operation::Delete(k) => {
                    let expected = std_map.remove(&k).ok_or(MapError::KeyNotFound);
                    prop_assert_eq!(map.delete(&k), expected);
                }
                Operation::Find(k) => {
                    prop_assert_eq!(map.find(&k).ok(), std_map.get(&k));
                }
            }

            prop_assert_eq!(map.len(), std_map.len());
            prop_assert!(map.capacity() >= min_capacity);
            prop_assert!(map.load_factor() < 0.75);
            if map.capacity() > min_capacity {
                prop_assert!(map.load_factor() > 0.25);
            }
        }

        prop_assert!(map.is_consistent());
        for (k, v) in &std_map {
            prop_assert_eq!(map.find(k), Ok(v));
        }
    }
}
