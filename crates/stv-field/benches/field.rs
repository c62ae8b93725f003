use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stv_field::{EvalDomain, FieldElement, Polynomial};

#[inline]
fn det_vec(n: usize, seed: u64) -> Vec<FieldElement> {
    let mut a = 1_664_525u64.wrapping_mul(seed).wrapping_add(1_013_904_223);
    (0..n)
        .map(|i| {
            a = a.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            FieldElement::from(a ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        })
        .collect()
}

fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("prime_field");
    let xs = det_vec(2, 2024);
    let (a, b) = (xs[0], xs[1]);

    group.bench_function("mul", |bn| bn.iter(|| black_box(black_box(a) * black_box(b))));
    group.bench_function("add", |bn| bn.iter(|| black_box(black_box(a) + black_box(b))));
    group.bench_function("inverse", |bn| bn.iter(|| black_box(black_box(a).inverse())));
    group.bench_function("root_of_unity_2^20", |bn| {
        bn.iter(|| black_box(EvalDomain::new(black_box(20))))
    });

    for &n in &[16usize, 256] {
        let poly = Polynomial::new(det_vec(n, 7));
        group.bench_function(BenchmarkId::new("horner", n), |bn| {
            bn.iter(|| black_box(poly.evaluate(black_box(&a))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_field);
criterion_main!(benches);
