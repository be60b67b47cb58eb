use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qrmask::{Mask, MaskPattern, Matrix, State};

/// Square matrix with a solid 7x7 block in three corners.
fn corners(size: usize) -> Matrix {
    let mut m = Matrix::new(size, size);
    for (ox, oy) in [(0, 0), (size - 7, 0), (0, size - 7)] {
        for dy in 0..7 {
            for dx in 0..7 {
                m.set(ox + dx, oy + dy, State::Set).unwrap();
            }
        }
    }
    m
}

fn bench_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_new");
    for size in [21, 57, 177] {
        let m = corners(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &m, |b, m| {
            b.iter(|| Mask::new(black_box(m), MaskPattern::Pattern7).unwrap())
        });
    }
    group.finish();
}

fn bench_all(c: &mut Criterion) {
    let m = corners(177);
    c.bench_function("mask_all_177", |b| b.iter(|| Mask::all(black_box(&m)).unwrap()));
}

criterion_group!(benches, bench_single, bench_all);
criterion_main!(benches);
