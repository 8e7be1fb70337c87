//! Benchmarks for column width distribution and full layout passes.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use table_layout::layout::distribute;
use table_layout::{
    Attachment, Column, ColumnStore, FixedGroup, HeightProperty, Measurements, Surface,
    TableLayout,
};

/// Mixed column set: every third column declares a width, the rest are flexible
fn columns(count: usize) -> Vec<Column> {
    (0..count)
        .map(|i| {
            let column = Column::new(format!("col{i}"));
            match i % 3 {
                0 => column.with_width(120.0),
                1 => column.with_min_width(60.0 + (i % 7) as f64 * 10.0),
                _ => column,
            }
        })
        .collect()
}

/// Columns nested in pinned groups of four
fn grouped_columns(count: usize) -> Vec<Column> {
    columns(count)
        .chunks(4)
        .enumerate()
        .map(|(i, chunk)| {
            let fixed = match i {
                0 => FixedGroup::Left,
                1 => FixedGroup::Right,
                _ => FixedGroup::None,
            };
            Column::group(format!("group{i}"), chunk.to_vec()).with_fixed(fixed)
        })
        .collect()
}

struct StaticSurface(Measurements);

impl Surface for StaticSurface {
    fn attachment(&self) -> Attachment {
        Attachment::Visible
    }

    fn measure(&self) -> Measurements {
        self.0.clone()
    }

    fn apply_height(&mut self, _property: HeightProperty, _css: &str) {}
}

fn bench_distribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribute");

    for count in [10, 100, 1000] {
        let leaves = columns(count);
        let wide = leaves.iter().map(Column::min_footprint).sum::<f64>() * 1.5;

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("fit", count), &leaves, |b, leaves| {
            b.iter(|| distribute(black_box(leaves), black_box(wide), true))
        });
        group.bench_with_input(BenchmarkId::new("overflow", count), &leaves, |b, leaves| {
            b.iter(|| distribute(black_box(leaves), black_box(100.0), true))
        });
    }

    group.finish();
}

fn bench_flatten(c: &mut Criterion) {
    let store = ColumnStore::new(grouped_columns(400));

    c.bench_function("flatten_grouped_400", |b| b.iter(|| black_box(&store).leaves()));
}

fn bench_do_layout(c: &mut Criterion) {
    let measurements = Measurements {
        client_width: 1600.0,
        client_height: 800.0,
        header_wrapper: Some(40.0),
        footer_wrapper: Some(30.0),
        body_scroll_height: Some(4000.0),
        body_wrapper_scroll_height: Some(4000.0),
        ..Measurements::default()
    };
    let mut layout = TableLayout::builder()
        .table(StaticSurface(measurements))
        .store(ColumnStore::new(grouped_columns(100)))
        .build()
        .expect("layout should build");
    layout
        .set_height(Some(800.0.into()))
        .expect("height should apply");

    c.bench_function("do_layout_grouped_100", |b| {
        b.iter(|| layout.do_layout().expect("layout pass"))
    });
}

criterion_group!(benches, bench_distribute, bench_flatten, bench_do_layout);

criterion_main!(benches);
