//! Application state shared across requests.

use std::sync::Arc;

use anyhow::Result;
use heatmap_common::Point;

use crate::config::ServiceConfig;
use crate::dataset::Dataset;

/// Shared application state.
pub struct AppState {
    /// WGS84 points, loaded once and never modified.
    pub points: Arc<Vec<Point>>,
    pub config: ServiceConfig,
}

impl AppState {
    /// Load the dataset named in `config`.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let dataset = Dataset::load_from_file(&config.data_file, &config.weight_property)?;
        Ok(Self::with_points(dataset.points, config))
    }

    /// Build state around points that are already in memory.
    pub fn with_points(points: Vec<Point>, config: ServiceConfig) -> Self {
        Self {
            points: Arc::new(points),
            config,
        }
    }
}
