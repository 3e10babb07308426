use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use fmri_dvars::{clean, dvars, CleanConfig};
use ndarray::Array2;

/// 478 frames × 91 282 grayordinates, the size of one HCP-Aging REST run.
fn hcp_sized() -> Array2<f64> {
    Array2::from_shape_fn((478, 91_282), |(t, c)| {
        ((t * 7 + c * 3) as f64 * 0.01).sin() + 0.001 * t as f64
    })
}

fn bench_dvars(c: &mut Criterion) {
    let x = hcp_sized();
    c.bench_function("dvars [478×91282]", |b| {
        b.iter(|| {
            let table = dvars(black_box(&x)).unwrap();
            black_box(table.n_rows())
        })
    });
}

fn bench_clean_hcp_aging(c: &mut Criterion) {
    let x = hcp_sized().slice(ndarray::s![.., ..4096]).to_owned();
    let cfg = CleanConfig::hcp_aging();
    c.bench_function("clean hcp_aging [478×4096]", |b| {
        b.iter(|| {
            let y = clean(black_box(x.clone()), &cfg).unwrap();
            black_box(y[[0, 0]])
        })
    });
}

criterion_group!(benches, bench_dvars, bench_clean_hcp_aging);
criterion_main!(benches);
