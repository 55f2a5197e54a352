//! Density normalization and the heatmap colormap.
//!
//! A colormap is four independent piecewise-linear channel curves over the
//! normalized density range [0, 1]. The built-in [`ALPHA_HEAT`] map is fully
//! transparent at zero density, runs through warm colors as density rises and
//! never exceeds 50% opacity, so the base map always shows through.

use std::fmt;
use std::str::FromStr;

use crate::grid::Grid;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }
}

/// A control point on one channel curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position on the normalized density axis, in [0, 1].
    pub position: f64,
    /// Channel intensity at this position, in [0, 1].
    pub value: f64,
}

const fn stop(position: f64, value: f64) -> ColorStop {
    ColorStop { position, value }
}

/// Piecewise-linear RGBA colormap. Each channel's stops are sorted by
/// position and span [0, 1].
#[derive(Debug, PartialEq)]
pub struct ColorMap {
    pub name: &'static str,
    pub red: &'static [ColorStop],
    pub green: &'static [ColorStop],
    pub blue: &'static [ColorStop],
    pub alpha: &'static [ColorStop],
}

static ALPHA_HEAT_RED: [ColorStop; 7] = [
    stop(0.0, 0.0),
    stop(0.001, 0.54),
    stop(0.1, 1.0),
    stop(0.55, 1.0),
    stop(0.7, 0.48),
    stop(0.85, 0.0),
    stop(1.0, 0.0),
];

static ALPHA_HEAT_GREEN: [ColorStop; 8] = [
    stop(0.0, 0.0),
    stop(0.1, 0.0),
    stop(0.25, 0.27),
    stop(0.4, 0.64),
    stop(0.55, 1.0),
    stop(0.7, 0.98),
    stop(0.85, 1.0),
    stop(1.0, 0.0),
];

static ALPHA_HEAT_BLUE: [ColorStop; 4] = [
    stop(0.0, 0.0),
    stop(0.7, 0.0),
    stop(0.85, 1.0),
    stop(1.0, 1.0),
];

// Opacity tops out at 0.5 so the base map is never fully covered.
static ALPHA_HEAT_ALPHA: [ColorStop; 5] = [
    stop(0.0, 0.0),
    stop(0.001, 0.0),
    stop(0.1, 0.25),
    stop(0.25, 0.5),
    stop(1.0, 0.5),
];

/// Heat ramp with a built-in alpha ramp capped at 0.5.
pub static ALPHA_HEAT: ColorMap = ColorMap {
    name: "alpha_heat",
    red: &ALPHA_HEAT_RED,
    green: &ALPHA_HEAT_GREEN,
    blue: &ALPHA_HEAT_BLUE,
    alpha: &ALPHA_HEAT_ALPHA,
};

impl ColorMap {
    /// Evaluate all four channels at `value`, each in [0, 1].
    ///
    /// `value` is clamped to [0, 1]. NaN yields transparent black.
    pub fn evaluate(&self, value: f64) -> [f64; 4] {
        if value.is_nan() {
            return [0.0; 4];
        }
        let x = value.clamp(0.0, 1.0);
        [
            interpolate_channel(self.red, x),
            interpolate_channel(self.green, x),
            interpolate_channel(self.blue, x),
            interpolate_channel(self.alpha, x),
        ]
    }

    /// Map a normalized density to an 8-bit RGBA color.
    pub fn colorize(&self, value: f64) -> Rgba {
        let [r, g, b, a] = self.evaluate(value);
        Rgba::new(to_byte(r), to_byte(g), to_byte(b), to_byte(a))
    }
}

/// Linear interpolation between the two stops surrounding `x`.
fn interpolate_channel(stops: &[ColorStop], x: f64) -> f64 {
    let Some(first) = stops.first() else {
        return 0.0;
    };

    // Index of the first stop at or beyond x
    let idx = stops.partition_point(|s| s.position < x);
    if idx == 0 {
        return first.value;
    }
    if idx == stops.len() {
        return stops[idx - 1].value;
    }

    let hi = stops[idx];
    if hi.position == x {
        return hi.value;
    }
    let lo = stops[idx - 1];
    let t = (x - lo.position) / (hi.position - lo.position);
    lo.value + t * (hi.value - lo.value)
}

/// Scale a [0, 1] intensity to a byte, truncating toward zero.
#[inline]
fn to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).floor() as u8
}

/// Built-in colormaps, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMapKind {
    #[default]
    AlphaHeat,
}

impl ColorMapKind {
    pub fn colormap(&self) -> &'static ColorMap {
        match self {
            ColorMapKind::AlphaHeat => &ALPHA_HEAT,
        }
    }

    pub fn name(&self) -> &'static str {
        self.colormap().name
    }
}

impl FromStr for ColorMapKind {
    type Err = UnknownColorMap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alpha_heat" => Ok(ColorMapKind::AlphaHeat),
            _ => Err(UnknownColorMap(s.to_string())),
        }
    }
}

impl fmt::Display for ColorMapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown colormap: {0}")]
pub struct UnknownColorMap(pub String);

/// Rescale the grid in place so its minimum becomes 0 and its maximum 1.
///
/// A grid whose values are all equal (including the empty all-zero grid)
/// becomes all zeros.
pub fn normalize(grid: &mut Grid) {
    let (min_val, max_val) = grid.min_max();
    let range = max_val - min_val;

    if range <= 0.0 || !range.is_finite() {
        grid.data_mut().fill(0.0);
        return;
    }

    for v in grid.data_mut() {
        *v = ((*v - min_val) / range).clamp(0.0, 1.0);
    }
}

/// Render a normalized grid into RGBA pixels (4 bytes per pixel).
pub fn colorize_grid(grid: &Grid, colormap: &ColorMap, pixels: &mut [u8]) {
    debug_assert_eq!(pixels.len(), grid.data().len() * 4);

    for (pixel, &value) in pixels.chunks_exact_mut(4).zip(grid.data()) {
        let color = colormap.colorize(value);
        pixel[0] = color.r;
        pixel[1] = color.g;
        pixel[2] = color.b;
        pixel[3] = color.a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_common::BoundingBox;

    #[test]
    fn test_zero_is_transparent() {
        assert_eq!(ALPHA_HEAT.colorize(0.0), Rgba::transparent());
    }

    #[test]
    fn test_full_density_keeps_half_alpha() {
        let color = ALPHA_HEAT.colorize(1.0);
        assert_eq!(color, Rgba::new(0, 0, 255, 127));
    }

    #[test]
    fn test_control_points_are_exact() {
        let [r, g, b, a] = ALPHA_HEAT.evaluate(0.55);
        assert_eq!((r, g, b, a), (1.0, 1.0, 0.0, 0.5));
        let [r, _, _, a] = ALPHA_HEAT.evaluate(0.1);
        assert_eq!(r, 1.0);
        assert_eq!(a, 0.25);
    }

    #[test]
    fn test_midpoint_interpolation() {
        // Halfway between green stops 0.25 -> 0.27 and 0.4 -> 0.64
        let [_, g, _, _] = ALPHA_HEAT.evaluate(0.325);
        assert!((g - 0.455).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(ALPHA_HEAT.colorize(-3.0), ALPHA_HEAT.colorize(0.0));
        assert_eq!(ALPHA_HEAT.colorize(7.0), ALPHA_HEAT.colorize(1.0));
        assert_eq!(ALPHA_HEAT.colorize(f64::NAN), Rgba::transparent());
    }

    #[test]
    fn test_colormap_kind_parse() {
        assert_eq!("alpha_heat".parse::<ColorMapKind>().unwrap(), ColorMapKind::AlphaHeat);
        assert_eq!("ALPHA_HEAT".parse::<ColorMapKind>().unwrap(), ColorMapKind::AlphaHeat);
        assert!("viridis".parse::<ColorMapKind>().is_err());
        assert_eq!(ColorMapKind::default().to_string(), "alpha_heat");
    }

    #[test]
    fn test_normalize_flat_grid() {
        let mut grid = Grid::new(3, 2, BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        grid.data_mut().fill(4.2);
        normalize(&mut grid);
        assert!(grid.data().iter().all(|&v| v == 0.0));
    }
}
