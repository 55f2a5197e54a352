//! HTTP handlers.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use heatmap_common::{BoundingBox, CrsCode, HeatmapError, HeatmapResult, Point};
use metrics_exporter_prometheus::PrometheusHandle;
use renderer::{render_with_options, ColorMapKind, RenderOptions, RenderOutput, RenderRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::metrics::{record_render_failure, record_render_success};
use crate::state::AppState;

pub const DEFAULT_WIDTH: usize = 400;
pub const DEFAULT_HEIGHT: usize = 300;
/// Central Berlin.
pub const DEFAULT_BBOX: &str = "13.25638,52.43927,13.53790,52.58177";
pub const DEFAULT_SRS: &str = "EPSG:4326";

// ============================================================================
// WMS GetMap
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct WmsParams {
    #[serde(rename = "WIDTH", alias = "width")]
    pub width: Option<String>,
    #[serde(rename = "HEIGHT", alias = "height")]
    pub height: Option<String>,
    #[serde(rename = "BBOX", alias = "bbox")]
    pub bbox: Option<String>,
    #[serde(rename = "SRS", alias = "srs", alias = "CRS", alias = "crs")]
    pub srs: Option<String>,
    #[serde(rename = "LAYERS", alias = "layers")]
    pub layers: Option<String>,
    #[serde(rename = "STYLES", alias = "styles")]
    pub styles: Option<String>,
}

/// A validated GetMap request.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMapRequest {
    pub width: usize,
    pub height: usize,
    pub bbox: BoundingBox,
    pub crs: CrsCode,
    pub colormap: ColorMapKind,
}

impl GetMapRequest {
    /// Apply defaults and validate the query parameters.
    ///
    /// Width and height above `max_image_size` are rejected. Zero dimensions
    /// pass through here and are rejected by the renderer.
    pub fn from_params(params: &WmsParams, max_image_size: usize) -> HeatmapResult<Self> {
        let width = parse_dimension("width", params.width.as_deref(), DEFAULT_WIDTH, max_image_size)?;
        let height =
            parse_dimension("height", params.height.as_deref(), DEFAULT_HEIGHT, max_image_size)?;

        let bbox = BoundingBox::from_wms_string(non_empty(params.bbox.as_deref()).unwrap_or(DEFAULT_BBOX))?;
        if !bbox.is_valid() {
            return Err(HeatmapError::InvalidBbox(format!(
                "west must be below east and south below north, got {}",
                bbox
            )));
        }

        let crs = CrsCode::from_wms_string(non_empty(params.srs.as_deref()).unwrap_or(DEFAULT_SRS))?;

        let colormap = match non_empty(params.styles.as_deref()) {
            None => ColorMapKind::default(),
            Some(style) => style
                .parse()
                .map_err(|_| HeatmapError::StyleNotFound(style.to_string()))?,
        };

        Ok(Self {
            width,
            height,
            bbox,
            crs,
            colormap,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_dimension(
    param: &str,
    value: Option<&str>,
    default: usize,
    max: usize,
) -> HeatmapResult<usize> {
    let Some(v) = non_empty(value) else {
        return Ok(default);
    };

    let size: usize = v.parse().map_err(|_| HeatmapError::InvalidParameter {
        param: param.to_string(),
        message: format!("expected a non-negative integer, got '{}'", v),
    })?;
    if size > max {
        return Err(HeatmapError::InvalidParameter {
            param: param.to_string(),
            message: format!("{} exceeds the maximum of {} pixels", size, max),
        });
    }
    Ok(size)
}

#[instrument(skip(state))]
pub async fn wms_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<WmsParams>,
) -> Response {
    let start = Instant::now();

    match get_map(&state, &params).await {
        Ok(output) => {
            record_render_success(start.elapsed(), &output.stats);
            debug!(
                points_drawn = output.stats.points_drawn,
                points_dropped = output.stats.points_dropped,
                bytes = output.png.len(),
                "GetMap complete"
            );
            ([(header::CONTENT_TYPE, "image/png")], output.png).into_response()
        }
        Err(err) => {
            let status = err.http_status_code();
            record_render_failure(start.elapsed(), status);
            if status >= 500 {
                error!(error = %err, "GetMap failed");
            } else {
                warn!(error = %err, "Rejected GetMap request");
            }
            wms_exception(&err)
        }
    }
}

async fn get_map(state: &AppState, params: &WmsParams) -> HeatmapResult<RenderOutput> {
    let request = GetMapRequest::from_params(params, state.config.max_image_size)?;
    let options = RenderOptions {
        colormap: request.colormap,
        ..state.config.render_options
    };
    let points = Arc::clone(&state.points);

    let task = tokio::task::spawn_blocking(move || render_points(&request, &points, &options));

    // An expired render keeps running on its blocking thread; only the
    // response is abandoned.
    match tokio::time::timeout(state.config.render_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(HeatmapError::InternalError(format!(
            "render task failed: {}",
            join_err
        ))),
        Err(_) => Err(HeatmapError::Timeout),
    }
}

/// Project `points` into the request CRS and render them.
pub fn render_points(
    request: &GetMapRequest,
    points: &[Point],
    options: &RenderOptions,
) -> HeatmapResult<RenderOutput> {
    let projected = project_points(points, request.crs)?;
    let render_request = RenderRequest::new(
        request.width,
        request.height,
        request.bbox,
        projected.iter().copied(),
    );
    Ok(render_with_options(render_request, options)?)
}

/// Forward-project WGS84 points into `crs`.
///
/// Geographic CRSs borrow the input unchanged. Any point that cannot be
/// projected fails the whole request.
pub fn project_points(points: &[Point], crs: CrsCode) -> HeatmapResult<Cow<'_, [Point]>> {
    if crs.is_geographic() {
        return Ok(Cow::Borrowed(points));
    }

    points
        .iter()
        .map(|p| {
            let (x, y) = crs.project(p.lon, p.lat)?;
            Ok(Point::new(x, y, p.weight))
        })
        .collect::<HeatmapResult<Vec<_>>>()
        .map(Cow::Owned)
}

/// Build an OGC `ServiceExceptionReport` response for `err`.
pub fn wms_exception(err: &HeatmapError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let xml = format!(
        r#"<?xml version="1.0"?><ServiceExceptionReport><ServiceException code="{}">{}</ServiceException></ServiceExceptionReport>"#,
        err.exception_code(),
        escape_xml(&err.to_string())
    );
    (status, [(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Health and metrics
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub points: usize,
}

/// GET /health
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        points: state.points.len(),
    })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response()
}
