//! Render metrics, exported through the Prometheus recorder.

use std::time::Duration;

use metrics::{counter, histogram};
use renderer::RenderStats;

/// Record a successful render.
pub fn record_render_success(duration: Duration, stats: &RenderStats) {
    counter!("heatmap_renders_total", "status" => "ok").increment(1);
    histogram!("heatmap_render_duration_seconds").record(duration.as_secs_f64());
    counter!("heatmap_points_drawn_total").increment(stats.points_drawn);
    counter!("heatmap_points_dropped_total").increment(stats.points_dropped);
}

/// Record a failed request, labelled by its HTTP status class.
pub fn record_render_failure(duration: Duration, status: u16) {
    let status = if status >= 500 { "server_error" } else { "client_error" };
    counter!("heatmap_renders_total", "status" => status).increment(1);
    histogram!("heatmap_render_duration_seconds").record(duration.as_secs_f64());
}
