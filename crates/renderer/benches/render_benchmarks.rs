//! Benchmarks for the heatmap render pipeline.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use heatmap_common::{BoundingBox, Point};
use renderer::blur::blur;
use renderer::gradient::{colorize_grid, normalize, ALPHA_HEAT};
use renderer::png::create_png;
use renderer::{render, Grid, RenderRequest};
use test_utils::{lattice_points, spiral_cluster, SAMPLE_BBOX};

const SIZES: [(&str, usize, usize); 3] = [
    ("256x256", 256, 256),
    ("400x300", 400, 300),
    ("512x512", 512, 512),
];

fn sample_bbox() -> BoundingBox {
    BoundingBox::from_wms_string(SAMPLE_BBOX).expect("valid sample bbox")
}

/// A few thousand points: one dense cluster plus an even background.
fn generate_points() -> Vec<Point> {
    let bbox = sample_bbox();
    let mut points = spiral_cluster(13.40, 52.51, 0.04, 2000);
    points.extend(lattice_points(&bbox, 40, 30, 0.5));
    points
}

/// Grid with every point already deposited.
fn accumulated_grid(width: usize, height: usize, points: &[Point]) -> Grid {
    let mut grid = Grid::new(width, height, sample_bbox()).expect("valid grid");
    for point in points {
        grid.add(point);
    }
    grid
}

// ============================================================================
// Full pipeline
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let points = generate_points();

    for (name, width, height) in SIZES {
        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(BenchmarkId::new("alpha_heat", name), &points, |b, points| {
            b.iter(|| {
                let request = RenderRequest::new(width, height, sample_bbox(), points.iter().copied());
                black_box(render(request).expect("render"))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Individual stages
// ============================================================================

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("blur");
    let points = generate_points();
    let base = accumulated_grid(400, 300, &points);

    for sigma in [2.0, 5.0, 10.0] {
        group.bench_with_input(BenchmarkId::new("400x300", sigma), &sigma, |b, &sigma| {
            b.iter_batched(
                || base.clone(),
                |mut grid| {
                    blur(&mut grid, sigma).expect("blur");
                    black_box(grid)
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_colorize_and_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("colorize_encode");
    let points = generate_points();

    for (name, width, height) in SIZES {
        let mut grid = accumulated_grid(width, height, &points);
        blur(&mut grid, 10.0).expect("blur");
        normalize(&mut grid);

        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(BenchmarkId::new("colorize", name), &grid, |b, grid| {
            let mut pixels = vec![0u8; width * height * 4];
            b.iter(|| {
                colorize_grid(grid, &ALPHA_HEAT, &mut pixels);
                black_box(pixels[0])
            })
        });

        let mut pixels = vec![0u8; width * height * 4];
        colorize_grid(&grid, &ALPHA_HEAT, &mut pixels);
        group.bench_with_input(BenchmarkId::new("png", name), &pixels, |b, pixels| {
            b.iter(|| black_box(create_png(pixels, width, height).expect("encode")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_blur, bench_colorize_and_encode);
criterion_main!(benches);
