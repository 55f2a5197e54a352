//! GeoJSON fixtures shaped like the earthquake dataset the service serves.

use std::io::Write;

use tempfile::NamedTempFile;

/// A small earthquake-style FeatureCollection around Berlin.
///
/// - three point features with a `mag` property
/// - one point feature whose `mag` is null (weight defaults to 1)
/// - one point feature with a third (depth) coordinate
/// - one feature without geometry and one line string, both skipped
pub const SAMPLE_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"mag": 2.5}, "geometry": {"type": "Point", "coordinates": [13.40, 52.52]}},
    {"type": "Feature", "properties": {"mag": 1.2}, "geometry": {"type": "Point", "coordinates": [13.38, 52.50]}},
    {"type": "Feature", "properties": {"mag": 4.0}, "geometry": {"type": "Point", "coordinates": [13.45, 52.48]}},
    {"type": "Feature", "properties": {"mag": null}, "geometry": {"type": "Point", "coordinates": [13.30, 52.55]}},
    {"type": "Feature", "properties": {"mag": 3.1}, "geometry": {"type": "Point", "coordinates": [13.50, 52.45, 10.0]}},
    {"type": "Feature", "properties": {"mag": 5.0}, "geometry": null},
    {"type": "Feature", "properties": {"mag": 5.0}, "geometry": {"type": "LineString", "coordinates": [[13.3, 52.4], [13.4, 52.5]]}}
  ]
}"#;

/// Number of features in [`SAMPLE_GEOJSON`] that carry a usable point.
pub const SAMPLE_POINT_COUNT: usize = 5;

/// Bounding box that contains every point of [`SAMPLE_GEOJSON`].
pub const SAMPLE_BBOX: &str = "13.25638,52.43927,13.53790,52.58177";

/// Write [`SAMPLE_GEOJSON`] to a temporary file.
///
/// The file is removed when the returned handle is dropped.
pub fn sample_geojson_file() -> std::io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(SAMPLE_GEOJSON.as_bytes())?;
    file.flush()?;
    Ok(file)
}
