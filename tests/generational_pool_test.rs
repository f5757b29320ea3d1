use treebucket::alloc::GenerationalPool;

#[test]
fn test_generational_pool_basic() {
    let mut pool = GenerationalPool::new();

    let idx1 = pool.alloc(10);
    let idx2 = pool.alloc(20);

    assert_eq!(*pool.get(idx1).unwrap(), 10);
    assert_eq!(*pool.get(idx2).unwrap(), 20);

    assert_eq!(pool.free(idx1), Some(10));
    assert!(pool.get(idx1).is_none());

    // Reuse
    let idx3 = pool.alloc(30);
    assert_eq!(idx1.index(), idx3.index());
    assert_ne!(idx1.generation(), idx3.generation());

    assert!(pool.get(idx1).is_none());
    assert_eq!(*pool.get(idx3).unwrap(), 30);
}

#[test]
fn test_generational_pool_aba_protection() {
    let mut pool = GenerationalPool::new();

    let idx = pool.alloc("A");
    pool.free(idx);
    let idx_new = pool.alloc("B");

    assert_eq!(idx.index(), idx_new.index());
    assert!(pool.get(idx).is_none());
    assert!(pool.get_mut(idx).is_none());
    assert_eq!(pool.free(idx), None);
    assert_eq!(*pool.get(idx_new).unwrap(), "B");
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_generational_pool_mutation() {
    let mut pool = GenerationalPool::with_capacity(2);
    let a = pool.alloc(String::from("left"));
    let b = pool.alloc(String::from("right"));

    pool.get_mut(a).unwrap().push('!');
    pool[b].push('?');

    let (x, y) = pool.get_pair_mut(a, b).unwrap();
    std::mem::swap(x, y);
    assert_eq!(pool[a], "right?");
    assert_eq!(pool[b], "left!");
}
