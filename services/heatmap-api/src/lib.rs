//! Heatmap WMS service library.
//!
//! Exposes the router and its building blocks so the server can be driven
//! in-process by tests.

pub mod config;
pub mod dataset;
pub mod handlers;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use state::AppState;

/// Build the application router.
///
/// `/wms`, `/health` and `/metrics` are handled here; every other path is
/// served from `static_dir`.
pub fn build_router(state: Arc<AppState>, prometheus: PrometheusHandle) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/wms", get(handlers::wms_handler))
        .route("/wms/", get(handlers::wms_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .fallback_service(static_files)
        .layer(Extension(state))
        .layer(Extension(prometheus))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
