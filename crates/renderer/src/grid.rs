//! Density grid accumulation.
//!
//! A [`Grid`] covers a bounding box with `width x height` cells in image
//! order: row 0 is the northern edge, column 0 the western edge. Points are
//! binned into exactly one cell; smoothing happens later in [`crate::blur`].

use heatmap_common::{BoundingBox, Point};

use crate::error::RenderError;

/// Row-major grid of accumulated point weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    bbox: BoundingBox,
    data: Vec<f64>,
}

impl Grid {
    /// Allocate a zero-filled grid.
    ///
    /// Dimensions and bounding box are validated before anything is allocated.
    /// Dimensions whose cell or pixel-byte count overflows, or whose cells
    /// cannot be allocated, are `InvalidDimensions`.
    pub fn new(width: usize, height: usize, bbox: BoundingBox) -> Result<Self, RenderError> {
        // The RGBA image built from this grid needs `width * height * 4` bytes.
        let cells = width
            .checked_mul(height)
            .filter(|cells| *cells > 0 && cells.checked_mul(4).is_some())
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        if !bbox.is_valid() {
            return Err(RenderError::InvalidBoundingBox(format!(
                "expected finite edges with west < east and south < north, got {}",
                bbox
            )));
        }

        let mut data = Vec::new();
        data.try_reserve_exact(cells)
            .map_err(|_| RenderError::InvalidDimensions { width, height })?;
        data.resize(cells, 0.0);

        Ok(Self {
            width,
            height,
            bbox,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.data[row * self.width + col])
    }

    /// Map a coordinate to its `(row, col)` cell.
    ///
    /// Returns `None` unless the coordinate is strictly inside the bounding
    /// box. Indices are computed with an explicit `floor`:
    ///
    /// ```text
    /// col = floor(width  * (lon - west) / (east - west))
    /// row = floor(height - height * (lat - south) / (north - south))
    /// ```
    pub fn cell_index(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        if !self.bbox.contains_strictly(lon, lat) {
            return None;
        }

        let w = self.width as f64;
        let h = self.height as f64;
        let col = (w * (lon - self.bbox.west) / self.bbox.width()).floor();
        let row = (h - h * (lat - self.bbox.south) / self.bbox.height()).floor();

        // A point a hair inside the east/south edge can still round onto it.
        if col < 0.0 || row < 0.0 || col >= w || row >= h {
            return None;
        }

        Some((row as usize, col as usize))
    }

    /// Deposit `weight` into the cell containing `(lon, lat)`.
    ///
    /// Returns `false` and leaves the grid untouched when the point is on or
    /// outside the bounding box, or when the weight is not finite.
    pub fn add_point(&mut self, lon: f64, lat: f64, weight: f64) -> bool {
        if !weight.is_finite() {
            return false;
        }
        match self.cell_index(lon, lat) {
            Some((row, col)) => {
                self.data[row * self.width + col] += weight;
                true
            }
            None => false,
        }
    }

    /// Convenience wrapper around [`Grid::add_point`].
    pub fn add(&mut self, point: &Point) -> bool {
        self.add_point(point.lon, point.lat, point.weight)
    }

    /// Smallest and largest value in the grid.
    pub fn min_max(&self) -> (f64, f64) {
        self.data.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), &v| (min.min(v), max.max(v)),
        )
    }
}
