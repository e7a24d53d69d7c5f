use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use lfsr_runner::harness::{check_period, run, HarnessConfig};
use lfsr_runner::register::{Lfsr, LfsrConfig, ReversibleConfig, ReversibleLfsr};
use lfsr_runner::state::{Controls, Direction};

fn period_benchmark(c: &mut Criterion) {
    let _ = env_logger::builder().try_init();
    let mut group = c.benchmark_group("period");
    group.measurement_time(Duration::new(10, 0));
    let lfsr = Lfsr::new(LfsrConfig {
        width: 16,
        direction: Direction::Forward,
        non_locking: true,
    })
    .unwrap();
    group.bench_function("lfsr-16", |b| {
        b.iter(|| check_period(&lfsr, 1, Controls::enabled()).unwrap());
    });
    let reversible = ReversibleLfsr::new(ReversibleConfig {
        width: 16,
        non_locking: true,
    })
    .unwrap();
    group.bench_function("reversible-16", |b| {
        b.iter(|| {
            check_period(
                &reversible,
                1,
                Controls::enabled().with_direction(Direction::Reverse),
            )
            .unwrap();
        });
    });
    group.bench_function("default-sweep", |b| {
        b.iter(|| assert!(run(&HarnessConfig::default()).is_success()));
    });
    group.finish();
}

criterion_group![
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = period_benchmark
];
criterion_main!(benches);
