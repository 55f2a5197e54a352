//! End-to-end tests for the heatmap render pipeline.

use heatmap_common::{BoundingBox, Point};
use image::ImageFormat;
use renderer::{
    render, render_with_options, ColorMapKind, RenderError, RenderOptions, RenderRequest,
};
use test_utils::{out_of_frame_points, spiral_cluster, SAMPLE_BBOX};

fn decode_rgba(png: &[u8]) -> (u32, u32, Vec<u8>) {
    let img = image::load_from_memory_with_format(png, ImageFormat::Png)
        .expect("decodable PNG")
        .to_rgba8();
    let (w, h) = img.dimensions();
    (w, h, img.into_raw())
}

fn alphas(rgba: &[u8]) -> impl Iterator<Item = u8> + '_ {
    rgba.chunks_exact(4).map(|p| p[3])
}

// ============================================================================
// Empty and degenerate requests
// ============================================================================

#[test]
fn test_zero_points_render_fully_transparent() {
    let request = RenderRequest::new(
        40,
        30,
        BoundingBox::new(0.0, 0.0, 50.0, 50.0),
        Vec::<Point>::new(),
    );
    let png = render(request).unwrap();
    let (w, h, rgba) = decode_rgba(&png);
    assert_eq!((w, h), (40, 30));
    assert!(alphas(&rgba).all(|a| a == 0));
}

#[test]
fn test_only_out_of_frame_points_render_transparent() {
    let bbox = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
    let request = RenderRequest::new(20, 20, bbox, out_of_frame_points(&bbox));
    let output = render_with_options(request, &RenderOptions::default()).unwrap();

    assert_eq!(output.stats.points_drawn, 0);
    assert_eq!(output.stats.points_dropped, out_of_frame_points(&bbox).len() as u64);
    let (_, _, rgba) = decode_rgba(&output.png);
    assert!(alphas(&rgba).all(|a| a == 0));
}

#[test]
fn test_zero_width_fails_without_image() {
    let request = RenderRequest::new(0, 10, BoundingBox::new(0.0, 0.0, 1.0, 1.0), vec![Point::unit(0.5, 0.5)]);
    let err = render(request).unwrap_err();
    assert!(matches!(err, RenderError::InvalidDimensions { width: 0, height: 10 }));
}

#[test]
fn test_zero_height_fails() {
    let request = RenderRequest::new(10, 0, BoundingBox::new(0.0, 0.0, 1.0, 1.0), Vec::<Point>::new());
    assert!(matches!(render(request), Err(RenderError::InvalidDimensions { .. })));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_huge_dimensions_fail_with_error() {
    let request = RenderRequest::new(
        1 << 33,
        1 << 33,
        BoundingBox::new(0.0, 0.0, 1.0, 1.0),
        vec![Point::unit(0.5, 0.5)],
    );
    assert!(matches!(render(request), Err(RenderError::InvalidDimensions { .. })));
}

#[test]
fn test_inverted_bbox_fails() {
    let request = RenderRequest::new(10, 10, BoundingBox::new(5.0, 0.0, 1.0, 1.0), Vec::<Point>::new());
    assert!(matches!(render(request), Err(RenderError::InvalidBoundingBox(_))));
}

// ============================================================================
// Rendered content
// ============================================================================

#[test]
fn test_single_point_produces_halo_centered_on_point() {
    let bbox = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
    let request = RenderRequest::new(100, 100, bbox, vec![Point::unit(50.5, 49.5)]);
    let options = RenderOptions {
        blur_sigma: 5.0,
        ..RenderOptions::default()
    };
    let output = render_with_options(request, &options).unwrap();
    assert_eq!(output.stats.points_drawn, 1);

    let (_, _, rgba) = decode_rgba(&output.png);
    let pixel = |row: usize, col: usize| &rgba[(row * 100 + col) * 4..(row * 100 + col) * 4 + 4];

    // Cell of the point: col = 50, row = floor(100 - 49.5) = 50. Peak normalizes to 1.
    assert_eq!(pixel(50, 50), &[0, 0, 255, 127]);
    // Far corners stay invisible
    assert_eq!(pixel(0, 0)[3], 0);
    assert_eq!(pixel(99, 99)[3], 0);
    // Halo visible a few pixels away
    assert!(pixel(50, 56)[3] > 0);
    assert!(pixel(44, 50)[3] > 0);
}

#[test]
fn test_no_blur_marks_only_hit_cells() {
    let bbox = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
    let request = RenderRequest::new(
        5,
        5,
        bbox,
        vec![Point::unit(32.0, 11.0), Point::unit(22.0, 21.0)],
    );
    let options = RenderOptions {
        blur_sigma: 0.0,
        colormap: ColorMapKind::AlphaHeat,
    };
    let output = render_with_options(request, &options).unwrap();
    let (_, _, rgba) = decode_rgba(&output.png);

    let visible: Vec<usize> = alphas(&rgba)
        .enumerate()
        .filter(|(_, a)| *a > 0)
        .map(|(i, _)| i)
        .collect();
    // (row 2, col 2) and (row 3, col 3)
    assert_eq!(visible, vec![12, 18]);
}

#[test]
fn test_render_is_deterministic() {
    let bbox = BoundingBox::from_wms_string(SAMPLE_BBOX).unwrap();
    let points = spiral_cluster(13.40, 52.51, 0.03, 150);

    let first = render(RenderRequest::new(120, 90, bbox, points.clone())).unwrap();
    let second = render(RenderRequest::new(120, 90, bbox, points)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_render_from_iterator_without_collecting() {
    let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let points = (1..10).map(|i| Point::new(i as f64, i as f64, 0.5));
    let output = render_with_options(
        RenderRequest::new(10, 10, bbox, points),
        &RenderOptions::default(),
    )
    .unwrap();
    assert_eq!(output.stats.points_drawn, 9);
    assert_eq!(output.stats.points_dropped, 0);
}

#[test]
fn test_default_size_request() {
    let bbox = BoundingBox::from_wms_string(SAMPLE_BBOX).unwrap();
    let points = spiral_cluster(13.40, 52.51, 0.05, 500);
    let png = render(RenderRequest::new(400, 300, bbox, points)).unwrap();
    let (w, h, rgba) = decode_rgba(&png);
    assert_eq!((w, h), (400, 300));
    assert!(alphas(&rgba).any(|a| a > 0));
    assert!(alphas(&rgba).all(|a| a <= 127));
}
