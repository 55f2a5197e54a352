//! Point-density heatmap rendering.
//!
//! The pipeline turns weighted point observations into a PNG overlay:
//! - Grid accumulation (geographic coordinates to pixel cells)
//! - Gaussian smoothing
//! - Min/max normalization
//! - Colormap with alpha ramp
//! - RGBA PNG encoding

pub mod blur;
pub mod buffer_pool;
pub mod error;
pub mod gradient;
pub mod grid;
pub mod heatmap;
pub mod png;

pub use blur::MAX_BLUR_SIGMA;
pub use error::RenderError;
pub use gradient::{ColorMap, ColorMapKind, Rgba, ALPHA_HEAT};
pub use grid::Grid;
pub use heatmap::{
    render, render_with_options, RenderOptions, RenderOutput, RenderRequest, RenderStats,
    DEFAULT_BLUR_SIGMA,
};
