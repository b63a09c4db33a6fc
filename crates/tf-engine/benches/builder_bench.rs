//! Ticket Builder Benchmarks
//!
//! Throughput of full multi-field batches at several batch sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tf_core::{EngineConfig, Prize, PrizeList};
use tf_engine::TicketSetBuilder;

const BATCH_SIZES: &[u64] = &[100, 1_000, 10_000];

fn prize_list() -> PrizeList {
    [
        Prize::new("Car", 1),
        Prize::new("Bike", 5),
        Prize::new("TV", 10),
        Prize::new("Phone", 25),
        Prize::new("Voucher", 50),
        Prize::new("Mug", 100),
    ]
    .into_iter()
    .collect()
}

/// Benchmark multi-field batch generation
fn bench_build_multi(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_multi");
    let prizes = prize_list();

    for &size in BATCH_SIZES {
        group.throughput(Throughput::Elements(size));

        group.bench_with_input(BenchmarkId::new("3_of_6", size), &size, |b, &size| {
            let config = EngineConfig::default().with_fields(6).with_fields_to_win(3);
            let mut builder = TicketSetBuilder::seeded(config, 42);
            b.iter(|| black_box(builder.build_multi(&prizes, size).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("2_of_4", size), &size, |b, &size| {
            let config = EngineConfig::default().with_fields(4).with_fields_to_win(2);
            let mut builder = TicketSetBuilder::seeded(config, 42);
            b.iter(|| black_box(builder.build_multi(&prizes, size).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_multi);
criterion_main!(benches);
