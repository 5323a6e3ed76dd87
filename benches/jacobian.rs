use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jacobian_ad::{
    adjoint_jacobian, adjoint_jacobian_with, forward_jacobian, Dual, JacobianConfig, Reverse, Tape,
};

// ─── Test functions ────────────────────────────────────────────────────────

/// R^n → R^m with every output touching every input.
fn dense_rev(v: &mut [Reverse<f64>], m: usize) -> Vec<Reverse<f64>> {
    (0..m)
        .map(|i| {
            let mut acc = Reverse::constant(0.0);
            for (j, &x) in v.iter().enumerate() {
                acc += (x * (1.0 + (i + j) as f64 * 0.01)).sin();
            }
            acc
        })
        .collect()
}

fn dense_fwd(v: &mut [Dual<f64>], m: usize) -> Vec<Dual<f64>> {
    (0..m)
        .map(|i| {
            let mut acc = Dual::constant(0.0);
            for (j, &x) in v.iter().enumerate() {
                acc += (x * (1.0 + (i + j) as f64 * 0.01)).sin();
            }
            acc
        })
        .collect()
}

fn make_input(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.01 * i as f64).collect()
}

// ─── Benchmarks ────────────────────────────────────────────────────────────

/// Forward cost grows with the domain, adjoint cost with the codomain.
fn bench_mode_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobian_fwd_vs_adj");
    for (n, m) in [(2, 50), (10, 10), (50, 2)] {
        let x = make_input(n);
        let xr: Vec<Reverse<f64>> = x.iter().map(|&v| Reverse::new(v)).collect();
        let xd: Vec<Dual<f64>> = x.iter().map(|&v| Dual::constant(v)).collect();
        let label = format!("{}x{}", m, n);

        group.bench_with_input(BenchmarkId::new("forward", &label), &xd, |b, xd| {
            b.iter(|| black_box(forward_jacobian(black_box(xd), |v| dense_fwd(v, m))))
        });

        group.bench_with_input(BenchmarkId::new("adjoint", &label), &xr, |b, xr| {
            b.iter(|| black_box(adjoint_jacobian(black_box(xr), |v| dense_rev(v, m))))
        });
    }
    group.finish();
}

fn bench_tape_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjoint_tape_reuse");
    let n = 20;
    let m = 5;
    let xr: Vec<Reverse<f64>> = make_input(n).iter().map(|&v| Reverse::new(v)).collect();
    let config = JacobianConfig::default().with_codomain(m);

    group.bench_function("temporary_tape", |b| {
        b.iter(|| black_box(adjoint_jacobian_with(&xr, |v| dense_rev(v, m), &config, None)))
    });

    let mut tape = Tape::with_capacity(n * m * 4);
    group.bench_function("reused_tape", |b| {
        b.iter(|| {
            black_box(adjoint_jacobian_with(
                &xr,
                |v| dense_rev(v, m),
                &config,
                Some(&mut tape),
            ))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_mode_crossover, bench_tape_reuse);
criterion_main!(benches);
