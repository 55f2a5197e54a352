//! Errors raised by the rendering pipeline.

use heatmap_common::HeatmapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions {width}x{height}: both must be positive and their pixel count must fit in memory")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("blur sigma must be between 0 and {max} pixels, got {0}", max = crate::blur::MAX_BLUR_SIGMA)]
    InvalidSigma(f64),

    #[error("PNG encoding failed: {0}")]
    EncodingFailure(String),
}

impl From<RenderError> for HeatmapError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidDimensions { .. } => HeatmapError::InvalidDimensions(err.to_string()),
            RenderError::InvalidBoundingBox(_) => HeatmapError::InvalidBbox(err.to_string()),
            RenderError::InvalidSigma(_) | RenderError::EncodingFailure(_) => {
                HeatmapError::RenderError(err.to_string())
            }
        }
    }
}
