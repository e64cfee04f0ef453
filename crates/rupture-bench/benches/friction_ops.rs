//! Criterion micro-benchmarks for bundle production and kernel evaluation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rupture_bench::fault_profile;
use rupture_config::DRConfig;
use rupture_core::FrictionLawKind;
use rupture_friction::FrictionModelFactory;

const FACES: usize = 4096;

/// Benchmark: produce and verify a bundle for every enabled kind.
fn bench_produce_all(c: &mut Criterion) {
    let configs: Vec<DRConfig> = FrictionLawKind::ALL
        .into_iter()
        .filter(|k| !k.is_disabled())
        .map(DRConfig::new)
        .collect();
    c.bench_function("produce_all_bundles", |b| {
        b.iter(|| {
            for config in &configs {
                let bundle = FrictionModelFactory::produce(black_box(config)).unwrap();
                bundle.verify().unwrap();
            }
        });
    });
}

fn bench_kernel(c: &mut Criterion, name: &str, kind: FrictionLawKind) {
    let (parts, mut storage) = fault_profile(kind, FACES).unwrap();
    let rates = vec![0.5; FACES];
    let mut time = 0.0;
    c.bench_function(name, |b| {
        b.iter(|| {
            parts
                .kernel
                .evaluate(&mut storage, time, 1e-3, black_box(&rates))
                .unwrap();
            time += 1e-3;
        });
    });
}

/// Benchmark: one step of each kernel family over 4096 faces.
fn bench_kernels(c: &mut Criterion) {
    bench_kernel(c, "lsw_4096", FrictionLawKind::LinearSlipWeakening);
    bench_kernel(c, "bimaterial_4096", FrictionLawKind::LinearSlipWeakeningBimaterial);
    bench_kernel(c, "rs_aging_4096", FrictionLawKind::RateAndStateAging);
    bench_kernel(c, "fast_vw_4096", FrictionLawKind::RateAndStateFastVelocityWeakening);
    bench_kernel(c, "yoffe_4096", FrictionLawKind::ImposedSlipRatesYoffe);
}

criterion_group!(benches, bench_produce_all, bench_kernels);
criterion_main!(benches);
