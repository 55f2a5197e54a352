//! Service configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use renderer::blur::validate_sigma;
use renderer::{RenderOptions, DEFAULT_BLUR_SIGMA};

/// Default dataset path, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "earthquakes.geojson";

/// Feature property used as the point weight.
pub const DEFAULT_WEIGHT_PROPERTY: &str = "mag";

pub const DEFAULT_STATIC_DIR: &str = "static";

pub const DEFAULT_RENDER_TIMEOUT_MS: u64 = 10_000;

/// Largest accepted image width or height, in pixels.
pub const DEFAULT_MAX_IMAGE_SIZE: usize = 4096;

/// Runtime settings shared by every request.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_file: PathBuf,
    pub weight_property: String,
    pub static_dir: PathBuf,
    pub render_options: RenderOptions,
    /// Upper bound on a single render, projection included.
    pub render_timeout: Duration,
    /// Requests wider or taller than this are rejected.
    pub max_image_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            weight_property: DEFAULT_WEIGHT_PROPERTY.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            render_options: RenderOptions {
                blur_sigma: DEFAULT_BLUR_SIGMA,
                ..RenderOptions::default()
            },
            render_timeout: Duration::from_millis(DEFAULT_RENDER_TIMEOUT_MS),
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
        }
    }
}

impl ServiceConfig {
    /// Reject settings that would make every render fail or overflow.
    pub fn validate(&self) -> Result<()> {
        validate_sigma(self.render_options.blur_sigma).context("Invalid blur sigma")?;

        if self.max_image_size == 0 {
            bail!("max image size must be positive");
        }
        let max_bytes = self
            .max_image_size
            .checked_mul(self.max_image_size)
            .and_then(|n| n.checked_mul(4));
        if max_bytes.is_none() {
            bail!("max image size {} overflows the pixel buffer", self.max_image_size);
        }
        Ok(())
    }
}
