//! Weighted point observations.

use serde::{Deserialize, Serialize};

/// A single observation: position in the render CRS plus a magnitude weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Point {
    pub fn new(lon: f64, lat: f64, weight: f64) -> Self {
        Self { lon, lat, weight }
    }

    /// A point with the default weight of 1.
    pub fn unit(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, default_weight())
    }
}
