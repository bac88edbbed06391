//! Criterion benchmarks for weight computation and the diffusion kernel,
//! one group per stencil variant.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use myowave_bench::oblique_tissue;
use myowave_core::{Diffusivity, GridShape};
use myowave_tissue::{CardiacTissue, DiffusionKernel};

const DT: f64 = 0.01;
const DR: f64 = 0.25;

fn prepared(mut tissue: CardiacTissue) -> (CardiacTissue, DiffusionKernel) {
    tissue
        .compute_weights(DR, DT, Diffusivity::anisotropic(1.0, 0.25))
        .unwrap();
    let kernel = DiffusionKernel::select(tissue.shape(), tissue.weights().unwrap()).unwrap();
    (tissue, kernel)
}

fn bench_apply(c: &mut Criterion, name: &str, tissue: CardiacTissue) {
    let (tissue, kernel) = prepared(tissue);
    let cells = tissue.shape().cell_count();
    let u: Vec<f64> = (0..cells).map(|i| (i % 17) as f64 / 17.0).collect();
    let mut u_new = vec![0.0; cells];
    let weights = tissue.weights().unwrap();
    c.bench_function(name, |b| {
        b.iter(|| {
            kernel.apply(&mut u_new, black_box(&u), weights, tissue.mesh());
            black_box(&u_new);
        });
    });
}

fn bench_isotropic_2d(c: &mut Criterion) {
    let tissue = CardiacTissue::new(GridShape::new_2d(316, 316).unwrap());
    bench_apply(c, "diffuse_iso_2d_100k", tissue);
}

fn bench_anisotropic_2d(c: &mut Criterion) {
    let tissue = oblique_tissue(GridShape::new_2d(316, 316).unwrap()).unwrap();
    bench_apply(c, "diffuse_aniso_2d_100k", tissue);
}

fn bench_isotropic_3d(c: &mut Criterion) {
    let tissue = CardiacTissue::new(GridShape::new_3d(46, 46, 46).unwrap());
    bench_apply(c, "diffuse_iso_3d_100k", tissue);
}

fn bench_anisotropic_3d(c: &mut Criterion) {
    let tissue = oblique_tissue(GridShape::new_3d(46, 46, 46).unwrap()).unwrap();
    bench_apply(c, "diffuse_aniso_3d_100k", tissue);
}

fn bench_weights_aniso_3d(c: &mut Criterion) {
    let mut tissue = oblique_tissue(GridShape::new_3d(46, 46, 46).unwrap()).unwrap();
    c.bench_function("weights_aniso_3d_100k", |b| {
        b.iter(|| {
            tissue
                .compute_weights(DR, DT, black_box(Diffusivity::anisotropic(1.0, 0.25)))
                .unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_isotropic_2d,
    bench_anisotropic_2d,
    bench_isotropic_3d,
    bench_anisotropic_3d,
    bench_weights_aniso_3d
);
criterion_main!(benches);
