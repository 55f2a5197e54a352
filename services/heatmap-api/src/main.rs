//! Heatmap WMS server
//!
//! Serves point-density heatmap overlays over a WMS-style GetMap endpoint.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use heatmap_api::build_router;
use heatmap_api::config::{
    ServiceConfig, DEFAULT_DATA_FILE, DEFAULT_MAX_IMAGE_SIZE, DEFAULT_RENDER_TIMEOUT_MS,
    DEFAULT_STATIC_DIR, DEFAULT_WEIGHT_PROPERTY,
};
use heatmap_api::state::AppState;
use renderer::{RenderOptions, DEFAULT_BLUR_SIGMA};

/// Heatmap WMS server
#[derive(Parser, Debug)]
#[command(name = "heatmap-api")]
#[command(about = "WMS server rendering point-density heatmaps")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:5000", env = "HEATMAP_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// GeoJSON FeatureCollection of points
    #[arg(long, default_value = DEFAULT_DATA_FILE, env = "HEATMAP_DATA_FILE")]
    data_file: PathBuf,

    /// Feature property used as the point weight
    #[arg(long, default_value = DEFAULT_WEIGHT_PROPERTY, env = "HEATMAP_WEIGHT_PROPERTY")]
    weight_property: String,

    /// Directory served for every path that is not an API route
    #[arg(long, default_value = DEFAULT_STATIC_DIR, env = "HEATMAP_STATIC_DIR")]
    static_dir: PathBuf,

    /// Gaussian blur standard deviation in pixels
    #[arg(long, default_value_t = DEFAULT_BLUR_SIGMA, env = "HEATMAP_BLUR_SIGMA")]
    blur_sigma: f64,

    /// Per-request render timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_RENDER_TIMEOUT_MS, env = "HEATMAP_RENDER_TIMEOUT_MS")]
    render_timeout_ms: u64,

    /// Largest accepted image width or height in pixels
    #[arg(long, default_value_t = DEFAULT_MAX_IMAGE_SIZE, env = "HEATMAP_MAX_IMAGE_SIZE")]
    max_image_size: usize,

    /// Number of worker threads
    #[arg(long, env = "HEATMAP_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

impl Args {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            data_file: self.data_file.clone(),
            weight_property: self.weight_property.clone(),
            static_dir: self.static_dir.clone(),
            render_options: RenderOptions {
                blur_sigma: self.blur_sigma,
                ..RenderOptions::default()
            },
            render_timeout: Duration::from_millis(self.render_timeout_ms),
            max_image_size: self.max_image_size,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting heatmap WMS server");

    let config = args.service_config();
    config.validate()?;

    let state = AppState::new(config).context("Failed to load point dataset")?;
    let state = Arc::new(state);

    let app = build_router(state, prometheus_handle);

    let addr: SocketAddr = args.listen.parse().context("Invalid listen address")?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
