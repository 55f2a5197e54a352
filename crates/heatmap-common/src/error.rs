//! Error types for the heatmap service.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heatmap WMS operations.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === WMS Protocol Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Invalid image dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Style not found: {0}")]
    StyleNotFound(String),

    #[error("Projection error: {0}")]
    ProjectionError(String),

    // === Data Errors ===
    #[error("Failed to read data: {0}")]
    DataReadError(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Request timeout")]
    Timeout,
}

impl HeatmapError {
    /// Get the OGC WMS exception code for this error.
    pub fn exception_code(&self) -> &'static str {
        match self {
            HeatmapError::InvalidParameter { .. } | HeatmapError::InvalidDimensions(_) => {
                "InvalidParameterValue"
            }
            HeatmapError::InvalidCrs(_) | HeatmapError::ProjectionError(_) => "InvalidCRS",
            HeatmapError::InvalidBbox(_) => "InvalidBBox",
            HeatmapError::StyleNotFound(_) => "StyleNotDefined",
            _ => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            HeatmapError::InvalidParameter { .. }
            | HeatmapError::InvalidCrs(_)
            | HeatmapError::InvalidBbox(_)
            | HeatmapError::InvalidDimensions(_)
            | HeatmapError::StyleNotFound(_)
            | HeatmapError::ProjectionError(_) => 400,

            HeatmapError::Timeout => 504,

            _ => 500,
        }
    }
}

impl From<crate::bbox::BboxParseError> for HeatmapError {
    fn from(err: crate::bbox::BboxParseError) -> Self {
        HeatmapError::InvalidBbox(err.to_string())
    }
}

impl From<crate::crs::CrsParseError> for HeatmapError {
    fn from(err: crate::crs::CrsParseError) -> Self {
        HeatmapError::InvalidCrs(err.to_string())
    }
}

impl From<crate::crs::ProjectionError> for HeatmapError {
    fn from(err: crate::crs::ProjectionError) -> Self {
        HeatmapError::ProjectionError(err.to_string())
    }
}

// Conversion from common error types
impl From<std::io::Error> for HeatmapError {
    fn from(err: std::io::Error) -> Self {
        HeatmapError::DataReadError(err.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::DataReadError(format!("JSON error: {}", err))
    }
}
