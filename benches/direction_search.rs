//! Benchmarks for direction search and transfer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sortxfer::{search, transfer, transport_cost, ChannelWeights, Direction, PixelSet, SearchConfig};

fn create_test_images(width: usize, height: usize) -> (PixelSet, PixelSet) {
    let mut target = Vec::with_capacity(width * height);
    let mut source = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            target.push([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
            source.push([255 - (y % 256) as u8, ((x * 3) % 256) as u8, 40]);
        }
    }
    (PixelSet::from_rgb(&target), PixelSet::from_rgb(&source))
}

fn bench_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("transport_cost");
    let direction = Direction::new(0.3, 0.5, 0.2).unwrap();

    for size in [64, 256, 512].iter() {
        let (target, source) = create_test_images(*size, *size);

        group.bench_with_input(BenchmarkId::new("cost", size), size, |b, _| {
            b.iter(|| {
                transport_cost(
                    black_box(&target),
                    black_box(&source),
                    &direction,
                    ChannelWeights::UNIFORM,
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("transfer", size), size, |b, _| {
            b.iter(|| transfer(black_box(&target), black_box(&source), &direction))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    let (target, source) = create_test_images(128, 128);

    group.bench_function("axis_sweep", |b| {
        b.iter(|| search(black_box(&target), black_box(&source), &SearchConfig::axis_sweep()))
    });

    let sampling = SearchConfig::random_sampling(20).with_seed(42);
    group.bench_function("random_sampling_20", |b| {
        b.iter(|| search(black_box(&target), black_box(&source), &sampling))
    });

    group.finish();
}

criterion_group!(benches, bench_cost, bench_search);
criterion_main!(benches);
