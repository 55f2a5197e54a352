//! Separable Gaussian smoothing of a density grid.
//!
//! The kernel is truncated at four standard deviations and normalized to sum
//! to one. Samples beyond the grid edge are taken from the half-sample
//! symmetric reflection of the grid (`d c b a | a b c d`), so no mass from
//! one edge ever appears at the opposite edge and the total mass of the grid
//! is preserved.

use tracing::debug;

use crate::buffer_pool::with_scratch_buffer;
use crate::error::RenderError;
use crate::grid::Grid;

/// Kernel radius in standard deviations.
const TRUNCATE: f64 = 4.0;

/// Largest accepted standard deviation, in pixels. Its kernel has 8001 taps.
pub const MAX_BLUR_SIGMA: f64 = 1000.0;

/// Accept `sigma` if it is finite and within `[0, MAX_BLUR_SIGMA]`.
pub fn validate_sigma(sigma: f64) -> Result<(), RenderError> {
    if sigma.is_finite() && (0.0..=MAX_BLUR_SIGMA).contains(&sigma) {
        Ok(())
    } else {
        Err(RenderError::InvalidSigma(sigma))
    }
}

/// Build a normalized 1-D Gaussian kernel of length `2 * radius + 1`,
/// where `radius = floor(4 * sigma + 0.5)`.
pub fn gaussian_kernel(sigma: f64) -> Result<Vec<f64>, RenderError> {
    validate_sigma(sigma)?;

    let radius = (TRUNCATE * sigma + 0.5) as usize;
    if radius == 0 {
        return Ok(vec![1.0]);
    }

    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut taps: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-(x * x) / two_sigma_sq).exp()
        })
        .collect();

    let sum: f64 = taps.iter().sum();
    for tap in &mut taps {
        *tap /= sum;
    }
    Ok(taps)
}

/// Map an out-of-range index onto the grid by repeated mirror reflection.
#[inline]
fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    if m < n {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Correlate one line with a symmetric kernel.
fn convolve_line(input: &[f64], output: &mut [f64], kernel: &[f64]) {
    let n = input.len();
    let radius = kernel.len() / 2;

    for (i, out) in output.iter_mut().enumerate() {
        let mut acc = 0.0;
        if i >= radius && i + radius < n {
            let window = &input[i - radius..=i + radius];
            for (w, v) in kernel.iter().zip(window) {
                acc += w * v;
            }
        } else {
            for (k, w) in kernel.iter().enumerate() {
                let j = reflect_index(i as isize + k as isize - radius as isize, n);
                acc += w * input[j];
            }
        }
        *out = acc;
    }
}

/// Blur the grid in place with an isotropic Gaussian of standard deviation
/// `sigma` pixels.
///
/// `sigma == 0` leaves the grid unchanged. Sigma outside
/// `[0, MAX_BLUR_SIGMA]` is `InvalidSigma`.
pub fn blur(grid: &mut Grid, sigma: f64) -> Result<(), RenderError> {
    validate_sigma(sigma)?;
    if sigma == 0.0 {
        return Ok(());
    }

    let kernel = gaussian_kernel(sigma)?;
    let width = grid.width();
    let height = grid.height();
    debug!(sigma, taps = kernel.len(), width, height, "Blurring density grid");

    with_scratch_buffer(width * height, |scratch| {
        let data = grid.data_mut();

        // Horizontal pass: data -> scratch
        for (src, dst) in data.chunks_exact(width).zip(scratch.chunks_exact_mut(width)) {
            convolve_line(src, dst, &kernel);
        }

        // Vertical pass: scratch -> data
        let mut column = vec![0.0; height];
        let mut blurred = vec![0.0; height];
        for col in 0..width {
            for (row, value) in column.iter_mut().enumerate() {
                *value = scratch[row * width + col];
            }
            convolve_line(&column, &mut blurred, &kernel);
            for (row, value) in blurred.iter().enumerate() {
                data[row * width + col] = *value;
            }
        }
    });

    Ok(())
}
