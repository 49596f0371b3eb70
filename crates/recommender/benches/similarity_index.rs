//! Benchmarks for similarity and index construction
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic store so no dataset download is needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::PreferenceStore;
use recommender::{recommend, recommend_items, top_matches, ItemSimilarityIndex, Pearson};

/// 200 actors x 100 items, each actor rating roughly a third of the items
fn synthetic_store() -> PreferenceStore {
    let mut store = PreferenceStore::new();
    for actor in 0..200u32 {
        for item in 0..100u32 {
            let hash = actor.wrapping_mul(2_654_435_761).wrapping_add(item.wrapping_mul(40_503));
            if hash % 3 == 0 {
                let rating = 1.0 + (hash % 5) as f64;
                store.insert_rating(format!("actor{actor}"), format!("item{item}"), rating);
            }
        }
    }
    store
}

fn bench_top_matches(c: &mut Criterion) {
    let store = synthetic_store();

    c.bench_function("top_matches_pearson", |b| {
        b.iter(|| {
            let matches = top_matches(&store, black_box("actor1"), black_box(10), &Pearson);
            black_box(matches)
        })
    });
}

fn bench_user_based(c: &mut Criterion) {
    let store = synthetic_store();

    c.bench_function("recommend_user_based", |b| {
        b.iter(|| black_box(recommend(&store, black_box("actor1"), &Pearson)))
    });
}

fn bench_item_index(c: &mut Criterion) {
    let store = synthetic_store();

    c.bench_function("build_item_index", |b| {
        b.iter(|| black_box(ItemSimilarityIndex::build(&store, black_box(10))))
    });

    let index = ItemSimilarityIndex::build(&store, 10);
    c.bench_function("recommend_items", |b| {
        b.iter(|| black_box(recommend_items(&store, &index, black_box("actor1"))))
    });
}

criterion_group!(benches, bench_top_matches, bench_user_based, bench_item_index);
criterion_main!(benches);
