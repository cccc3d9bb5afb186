use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use inkfeed::{
    domain::post::{FeedFilter, Post},
    model::pagination::{Message, Pagination},
};

const PAGE_SIZE: usize = 20;

/// Pages of `PAGE_SIZE` posts where every page repeats the last five ids of the previous one
fn overlapping_pages(pages: usize) -> Vec<Vec<Post>> {
    (0..pages)
        .map(|page| {
            let start = (page * (PAGE_SIZE - 5)) as i64;
            (start..start + PAGE_SIZE as i64)
                .map(|id| Post::new(id, format!("post {id}")))
                .collect()
        })
        .collect()
}

fn load_all(pages: Vec<Vec<Post>>) -> Pagination {
    let mut feed = Pagination::new(PAGE_SIZE, FeedFilter::default());
    for posts in pages {
        let request = feed.start_fetch();
        feed.update(Message::PageLoaded { request, posts });
    }
    feed
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merge pages");
    for pages in [10, 100] {
        group.bench_function(format!("{pages} overlapping pages"), |b| {
            b.iter_batched(
                || overlapping_pages(pages),
                |pages| black_box(load_all(pages)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
