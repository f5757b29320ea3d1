use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::BTreeMap;
use treebucket::AvlTree;

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("AVL Insert");
    let size = 1000;
    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("std_btree_map_insert", |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in 0..size {
                map.insert(black_box(i), black_box(i));
            }
            map
        });
    });

    group.bench_function("avl_tree_insert_ascending", |b| {
        b.iter(|| {
            let mut tree = AvlTree::new();
            for i in 0..size {
                tree.insert(black_box(i), black_box(i)).unwrap();
            }
            tree
        });
    });

    group.bench_function("avl_tree_generate_in_order", |b| {
        b.iter(|| {
            let mut tree = AvlTree::new();
            let entries: Vec<_> = (0..size).map(|i| (i, i)).collect();
            tree.generate_in_order(black_box(entries), size as isize).unwrap();
            tree
        });
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("AVL Lookup");

    let size = 1000;

    group.bench_function("std_btree_map_lookup", |b| {
        let mut map = BTreeMap::new();
        for i in 0..size {
            map.insert(i, i);
        }

        b.iter(|| {
            for i in 0..size {
                black_box(map.get(&i));
            }
        });
    });

    group.bench_function("avl_tree_lookup", |b| {
        let mut tree = AvlTree::new();
        for i in 0..size {
            tree.insert(i, i).unwrap();
        }

        b.iter(|| {
            for i in 0..size {
                black_box(tree.get(&i));
            }
        });
    });

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("AVL Delete");

    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("avl_tree_delete_all", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut tree = AvlTree::new();
                    for i in 0..size {
                        tree.insert(i, i).unwrap();
                    }
                    tree
                },
                |mut tree| {
                    for i in 0..size {
                        black_box(tree.delete(&i).unwrap());
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_delete);
criterion_main!(benches);
