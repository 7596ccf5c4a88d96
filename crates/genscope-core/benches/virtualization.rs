//! Benchmark tests for row virtualization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use genscope_core::{VirtualRows, VirtualRowsConfig};

fn rows(count: usize) -> VirtualRows {
    let mut rows = VirtualRows::new(VirtualRowsConfig::default());
    rows.set_row_count(count);
    rows.set_viewport_height(600.0);
    rows
}

fn bench_window_fixed_heights(c: &mut Criterion) {
    let mut rows = rows(100_000);
    rows.set_scroll_offset(1_500_000.0);

    c.bench_function("window_100k_fixed", |b| b.iter(|| black_box(&rows).window()));
}

fn bench_window_measured_heights(c: &mut Criterion) {
    let mut rows = rows(100_000);
    for index in (0..100_000).step_by(7) {
        rows.measure_row(index, 48.0);
    }
    rows.set_scroll_offset(1_000_000.0);

    c.bench_function("window_100k_measured", |b| {
        b.iter(|| black_box(&rows).window())
    });
}

fn bench_set_row_count(c: &mut Criterion) {
    c.bench_function("grow_row_count_10k", |b| {
        b.iter(|| {
            let mut rows = VirtualRows::default();
            rows.set_row_count(black_box(10_000));
            rows.total_size()
        })
    });
}

criterion_group!(
    benches,
    bench_window_fixed_heights,
    bench_window_measured_heights,
    bench_set_row_count,
);
criterion_main!(benches);
