use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::collections::HashMap;
use treebucket::{MapConfig, TreeHashMap};

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("TreeHashMap Insert");
    let size = 10_000;
    group.throughput(Throughput::Elements(size as u64));

    group.bench_function("std_hash_map_insert", |b| {
        b.iter(|| {
            let mut map = HashMap::new();
            for i in 0..size {
                map.insert(black_box(i), black_box(i));
            }
            map
        });
    });

    group.bench_function("tree_hash_map_insert", |b| {
        b.iter(|| {
            let mut map = TreeHashMap::new();
            for i in 0..size {
                map.insert(black_box(i), black_box(i)).unwrap();
            }
            map
        });
    });

    // Every key lands in bucket 0, so every insert descends one large tree.
    group.bench_function("tree_hash_map_insert_colliding", |b| {
        let config = MapConfig::default().with_min_capacity(size as usize * 2);
        b.iter(|| {
            let mut map = TreeHashMap::with_config(config).unwrap();
            for i in 0..size {
                map.insert(black_box(i * size * 2), black_box(i)).unwrap();
            }
            map
        });
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("TreeHashMap Lookup");
    let size = 10_000;

    group.bench_function("std_hash_map_lookup", |b| {
        let map: HashMap<_, _> = (0..size).map(|i| (i, i)).collect();
        b.iter(|| {
            for i in 0..size {
                black_box(map.get(&i));
            }
        });
    });

    group.bench_function("tree_hash_map_lookup", |b| {
        let mut map = TreeHashMap::new();
        for i in 0..size {
            map.insert(i, i).unwrap();
        }
        b.iter(|| {
            for i in 0..size {
                black_box(map.find(&i).ok());
            }
        });
    });

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("TreeHashMap Churn");

    // Fill then drain: exercises every grow and shrink step.
    group.bench_function("tree_hash_map_fill_drain", |b| {
        b.iter(|| {
            let mut map = TreeHashMap::new();
            for i in 0..5_000i64 {
                map.insert(i, i).unwrap();
            }
            for i in 0..5_000i64 {
                black_box(map.delete(&i).unwrap());
            }
            map
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_churn);
criterion_main!(benches);
