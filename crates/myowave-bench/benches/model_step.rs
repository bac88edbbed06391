//! Criterion benchmarks for full model steps.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use myowave_bench::{ionic_model, reference_model, stress_model};
use myowave_engine::Model;
use myowave_ionic::{LuoRudy91, TenTusscherPanfilov};

fn bench_steps(c: &mut Criterion, name: &str, mut model: Model) {
    // Warm up: let the stimulus fire so the wave is moving.
    for _ in 0..10 {
        model.step().unwrap();
    }
    c.bench_function(name, |b| {
        b.iter(|| {
            let metrics = model.step().unwrap();
            black_box(metrics);
        });
    });
}

fn bench_step_10k(c: &mut Criterion) {
    bench_steps(c, "step_aliev_panfilov_10k", reference_model().unwrap());
}

fn bench_step_100k(c: &mut Criterion) {
    bench_steps(c, "step_aliev_panfilov_100k", stress_model().unwrap());
}

fn bench_step_luo_rudy(c: &mut Criterion) {
    bench_steps(c, "step_luo_rudy91_10k", ionic_model(100, LuoRudy91::default()).unwrap());
}

fn bench_step_tp06(c: &mut Criterion) {
    bench_steps(
        c,
        "step_ten_tusscher_10k",
        ionic_model(100, TenTusscherPanfilov::default()).unwrap(),
    );
}

fn bench_1000_steps_10k(c: &mut Criterion) {
    c.bench_function("1000_steps_aliev_panfilov_10k", |b| {
        b.iter(|| {
            let mut model = reference_model().unwrap();
            for _ in 0..1000 {
                black_box(model.step().unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_step_10k,
    bench_step_100k,
    bench_step_luo_rudy,
    bench_step_tp06,
    bench_1000_steps_10k
);
criterion_main!(benches);
