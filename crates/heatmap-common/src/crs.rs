//! Coordinate Reference System codes and point reprojection.
//!
//! Points in the dataset are always WGS84 lon/lat. When a map is requested in
//! a projected CRS the points are projected forward into that CRS before they
//! are binned, so the bounding box and the points share units.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Half the circumference of the Web Mercator sphere, in meters.
pub const WEB_MERCATOR_EXTENT: f64 = 20037508.342789244;

/// CRS codes accepted by the heatmap service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
}

impl CrsCode {
    /// Parse a CRS string from a WMS request (SRS or CRS parameter).
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:4326"
    /// - "CRS:84" (equivalent to EPSG:4326 with lon/lat axis order)
    /// - "EPSG:3857" / "EPSG:900913"
    pub fn from_wms_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }

    /// Project a WGS84 lon/lat pair into this CRS.
    ///
    /// Identity for geographic CRS. Latitudes at or beyond the poles cannot be
    /// represented in Web Mercator and fail.
    pub fn project(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::NonFinite { lon, lat });
        }

        match self {
            CrsCode::Epsg4326 => Ok((lon, lat)),
            CrsCode::Epsg3857 => {
                if lat.abs() >= 90.0 {
                    return Err(ProjectionError::OutOfDomain { crs: *self, lon, lat });
                }
                let x = lon * WEB_MERCATOR_EXTENT / 180.0;
                let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
                let y = y * WEB_MERCATOR_EXTENT / 180.0;
                Ok((x, y))
            }
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Epsg3857 => "EPSG:3857",
        };
        write!(f, "{}", code)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("Non-finite coordinate ({lon}, {lat})")]
    NonFinite { lon: f64, lat: f64 },

    #[error("Coordinate ({lon}, {lat}) is outside the domain of {crs}")]
    OutOfDomain { crs: CrsCode, lon: f64, lat: f64 },
}
