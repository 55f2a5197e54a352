//! Deterministic point generators.
//!
//! Patterns are fully reproducible (no randomness) so tests can assert on
//! exact grids and images.

use heatmap_common::{BoundingBox, Point};

/// Points on a regular `nx x ny` lattice covering the interior of `bbox`.
///
/// Lattice points sit at cell centers, so none of them lies on the bbox edge.
///
/// # Example
///
/// ```
/// use heatmap_common::BoundingBox;
/// use test_utils::lattice_points;
///
/// let points = lattice_points(&BoundingBox::new(0.0, 0.0, 10.0, 10.0), 2, 2, 1.0);
/// assert_eq!(points.len(), 4);
/// assert_eq!((points[0].lon, points[0].lat), (2.5, 2.5));
/// ```
pub fn lattice_points(bbox: &BoundingBox, nx: usize, ny: usize, weight: f64) -> Vec<Point> {
    let mut points = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let lon = bbox.west + (i as f64 + 0.5) * bbox.width() / nx as f64;
            let lat = bbox.south + (j as f64 + 0.5) * bbox.height() / ny as f64;
            points.push(Point::new(lon, lat, weight));
        }
    }
    points
}

/// A cluster of `count` points spiralling out from `(lon, lat)`.
///
/// Points follow a golden-angle spiral whose radius grows with the square
/// root of the index, giving an even disc of radius `radius`. Weights cycle
/// through 1, 2 and 3 like small earthquake magnitudes.
pub fn spiral_cluster(lon: f64, lat: f64, radius: f64, count: usize) -> Vec<Point> {
    const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

    (0..count)
        .map(|k| {
            let r = radius * ((k as f64 + 0.5) / count.max(1) as f64).sqrt();
            let theta = k as f64 * GOLDEN_ANGLE;
            Point::new(
                lon + r * theta.cos(),
                lat + r * theta.sin(),
                (k % 3 + 1) as f64,
            )
        })
        .collect()
}

/// Points placed exactly on every edge and corner of `bbox`, plus a few
/// outside it. None of them should ever be drawn.
pub fn out_of_frame_points(bbox: &BoundingBox) -> Vec<Point> {
    let mid_lon = bbox.west + bbox.width() / 2.0;
    let mid_lat = bbox.south + bbox.height() / 2.0;
    vec![
        Point::unit(bbox.west, mid_lat),
        Point::unit(bbox.east, mid_lat),
        Point::unit(mid_lon, bbox.south),
        Point::unit(mid_lon, bbox.north),
        Point::unit(bbox.west, bbox.south),
        Point::unit(bbox.east, bbox.north),
        Point::unit(bbox.west - bbox.width(), mid_lat),
        Point::unit(mid_lon, bbox.north + bbox.height()),
        Point::unit(f64::NAN, mid_lat),
    ]
}
