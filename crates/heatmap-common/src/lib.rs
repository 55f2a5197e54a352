//! Common types shared by the heatmap renderer and the WMS service.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod point;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{HeatmapError, HeatmapResult};
pub use point::Point;
