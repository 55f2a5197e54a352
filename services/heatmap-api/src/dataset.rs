//! Loading the point dataset from GeoJSON.
//!
//! Only `Point` features are used. The first two coordinates are lon/lat in
//! WGS84; any further coordinate (depth, elevation) is ignored.

use std::path::Path;

use heatmap_common::{HeatmapError, HeatmapResult, Point};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Points read from a dataset, plus how many features were unusable.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub points: Vec<Point>,
    pub skipped: usize,
}

impl Dataset {
    /// Parse a GeoJSON `FeatureCollection`.
    ///
    /// `weight_property` names the feature property used as the weight. A
    /// missing or null property weighs 1. Features without a point geometry,
    /// with non-numeric coordinates, or with a non-numeric weight are skipped.
    pub fn from_geojson(text: &str, weight_property: &str) -> HeatmapResult<Self> {
        let collection: FeatureCollection = serde_json::from_str(text)?;

        let mut dataset = Dataset::default();
        for feature in &collection.features {
            match feature_point(feature, weight_property) {
                Some(point) => dataset.points.push(point),
                None => dataset.skipped += 1,
            }
        }

        if dataset.skipped > 0 {
            warn!(
                skipped = dataset.skipped,
                total = collection.features.len(),
                "Skipped features without a usable point"
            );
        }
        Ok(dataset)
    }

    /// Read and parse a GeoJSON file.
    pub fn load_from_file(path: &Path, weight_property: &str) -> HeatmapResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            HeatmapError::DataReadError(format!("{}: {}", path.display(), e))
        })?;
        let dataset = Self::from_geojson(&text, weight_property)?;
        info!(
            path = %path.display(),
            points = dataset.points.len(),
            weight_property,
            "Loaded point dataset"
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn feature_point(feature: &Feature, weight_property: &str) -> Option<Point> {
    let geometry = feature.geometry.as_ref()?;
    if geometry.kind != "Point" {
        return None;
    }

    let coords = geometry.coordinates.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;

    let weight = match feature
        .properties
        .as_ref()
        .and_then(|props| props.get(weight_property))
    {
        None | Some(Value::Null) => 1.0,
        Some(value) => value.as_f64()?,
    };

    Some(Point::new(lon, lat, weight))
}
