//! End-to-end heatmap rendering.
//!
//! Accumulate → blur → normalize → colorize → PNG. One call owns its grid
//! from start to finish; nothing is shared between renders except the
//! immutable colormap tables.

use std::time::Instant;

use heatmap_common::{BoundingBox, Point};
use tracing::debug;

use crate::blur::{blur, validate_sigma};
use crate::buffer_pool::with_pixel_buffer;
use crate::error::RenderError;
use crate::gradient::{colorize_grid, normalize, ColorMapKind};
use crate::grid::Grid;
use crate::png::create_png;

/// Default Gaussian standard deviation, in pixels.
pub const DEFAULT_BLUR_SIGMA: f64 = 10.0;

/// A single heatmap render: output size, map extent and the points to draw.
///
/// `points` must already be in the same CRS as `bbox`.
#[derive(Debug, Clone)]
pub struct RenderRequest<I> {
    pub width: usize,
    pub height: usize,
    pub bbox: BoundingBox,
    pub points: I,
}

impl<I> RenderRequest<I>
where
    I: IntoIterator<Item = Point>,
{
    pub fn new(width: usize, height: usize, bbox: BoundingBox, points: I) -> Self {
        Self {
            width,
            height,
            bbox,
            points,
        }
    }
}

/// Tunable rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Gaussian blur standard deviation in pixels.
    pub blur_sigma: f64,
    pub colormap: ColorMapKind,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            blur_sigma: DEFAULT_BLUR_SIGMA,
            colormap: ColorMapKind::default(),
        }
    }
}

/// Point bookkeeping for one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Points deposited into the grid.
    pub points_drawn: u64,
    /// Points on or outside the bounding box, or with a non-finite weight.
    pub points_dropped: u64,
}

/// Encoded image plus statistics.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub png: Vec<u8>,
    pub stats: RenderStats,
}

/// Render with default options and return only the PNG bytes.
pub fn render<I>(request: RenderRequest<I>) -> Result<Vec<u8>, RenderError>
where
    I: IntoIterator<Item = Point>,
{
    render_with_options(request, &RenderOptions::default()).map(|output| output.png)
}

/// Render a heatmap PNG.
///
/// Dimensions, bounding box and sigma are all validated before any point is
/// read, so a failed render yields no image at all.
pub fn render_with_options<I>(
    request: RenderRequest<I>,
    options: &RenderOptions,
) -> Result<RenderOutput, RenderError>
where
    I: IntoIterator<Item = Point>,
{
    let start = Instant::now();
    let RenderRequest {
        width,
        height,
        bbox,
        points,
    } = request;

    validate_sigma(options.blur_sigma)?;

    let mut grid = Grid::new(width, height, bbox)?;
    let stats = accumulate(&mut grid, points);

    blur(&mut grid, options.blur_sigma)?;
    normalize(&mut grid);

    let colormap = options.colormap.colormap();
    let png = with_pixel_buffer(width, height, |pixels| {
        colorize_grid(&grid, colormap, pixels);
        create_png(pixels, width, height)
    })?;

    debug!(
        width,
        height,
        points_drawn = stats.points_drawn,
        points_dropped = stats.points_dropped,
        png_bytes = png.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Rendered heatmap"
    );

    Ok(RenderOutput { png, stats })
}

/// Deposit every point into the grid, counting drawn and dropped points.
pub fn accumulate<I>(grid: &mut Grid, points: I) -> RenderStats
where
    I: IntoIterator<Item = Point>,
{
    let mut stats = RenderStats::default();
    for point in points {
        if grid.add(&point) {
            stats.points_drawn += 1;
        } else {
            stats.points_dropped += 1;
        }
    }
    stats
}
