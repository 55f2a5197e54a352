//! Thread-local buffer pools for reducing allocation overhead.
//!
//! Every render needs an RGBA pixel buffer, an `f64` scratch grid for the
//! blur's intermediate pass, and a scanline buffer for PNG encoding. Instead
//! of allocating them per request, they are cached per thread and reused.
//!
//! ## Design
//!
//! - **Thread-local storage**: Each thread has its own buffer cache, so
//!   concurrent renders on different threads never share a buffer.
//! - **Tiered sizing**: Capacity grows to the next common image size to
//!   minimize resizing.
//! - **Automatic clearing**: Buffers are zeroed before reuse, so a pixel
//!   buffer always starts fully transparent.
//! - **Bounded retention**: A buffer that grew past the 1024x1024 tier is
//!   released once the render that needed it returns.
//!
//! ## Usage
//!
//! ```ignore
//! use renderer::buffer_pool::with_pixel_buffer;
//!
//! let png = with_pixel_buffer(400, 300, |pixels| {
//!     // Fill pixels...
//!     create_png(pixels, 400, 300)
//! })?;
//! ```

use std::cell::RefCell;

/// Common image sizes (in pixels) used as capacity tiers
const IMAGE_256: usize = 256 * 256;
const IMAGE_512: usize = 512 * 512;
const IMAGE_1024: usize = 1024 * 1024;

// Thread-local pixel buffer (RGBA, 4 bytes per pixel)
thread_local! {
    static PIXEL_BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(IMAGE_256 * 4));
}

// Thread-local scratch grid for separable filters (f64 per pixel)
thread_local! {
    static SCRATCH_BUFFER: RefCell<Vec<f64>> = RefCell::new(Vec::with_capacity(IMAGE_256));
}

// Thread-local scanline buffer for PNG encoding
thread_local! {
    static SCANLINE_BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(IMAGE_256 * 4 + 256)); // +filter bytes
}

/// Get a reusable RGBA pixel buffer.
///
/// The buffer is resized to `width * height * 4` and filled with zeros (transparent).
/// The closure receives a mutable slice of the exact required size.
///
/// # Arguments
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `f` - Closure that uses the buffer and returns a result
#[inline]
pub fn with_pixel_buffer<F, R>(width: usize, height: usize, f: F) -> R
where
    F: FnOnce(&mut [u8]) -> R,
{
    PIXEL_BUFFER.with(|buf| {
        let mut buf = buf.borrow_mut();
        let size = width * height * 4;

        grow_to(&mut buf, size, 0);
        buf[..size].fill(0);

        let result = f(&mut buf[..size]);
        release_oversized(&mut buf, IMAGE_1024 * 4, IMAGE_256 * 4);
        result
    })
}

/// Get a reusable `f64` scratch buffer of `len` elements, zero-filled.
#[inline]
pub fn with_scratch_buffer<F, R>(len: usize, f: F) -> R
where
    F: FnOnce(&mut [f64]) -> R,
{
    SCRATCH_BUFFER.with(|buf| {
        let mut buf = buf.borrow_mut();

        grow_to(&mut buf, len, 0.0);
        buf[..len].fill(0.0);

        let result = f(&mut buf[..len]);
        release_oversized(&mut buf, IMAGE_1024, IMAGE_256);
        result
    })
}

/// Get a reusable scanline buffer for PNG encoding.
///
/// The buffer is empty on entry with room for every scanline plus its
/// filter byte.
#[inline]
pub fn with_scanline_buffer<F, R>(width: usize, height: usize, bytes_per_pixel: usize, f: F) -> R
where
    F: FnOnce(&mut Vec<u8>) -> R,
{
    SCANLINE_BUFFER.with(|buf| {
        let mut buf = buf.borrow_mut();
        buf.clear();

        // Each scanline: 1 filter byte + width * bytes_per_pixel
        let size = height * (1 + width * bytes_per_pixel);
        if buf.capacity() < size {
            buf.reserve(size);
        }

        let result = f(&mut buf);
        release_oversized(&mut buf, IMAGE_1024 * 4 + 1024, IMAGE_256 * 4 + 256);
        result
    })
}

/// Make sure `buf` holds at least `size` elements, growing capacity by tier.
fn grow_to<T: Clone>(buf: &mut Vec<T>, size: usize, fill: T) {
    if buf.len() >= size {
        return;
    }
    let target = optimal_capacity(size);
    if buf.capacity() < target {
        buf.reserve(target - buf.len());
    }
    buf.resize(size, fill);
}

/// Drop a buffer whose capacity exceeds `max_retained`, keeping a fresh one
/// with `initial` capacity in its place.
fn release_oversized<T>(buf: &mut Vec<T>, max_retained: usize, initial: usize) {
    if buf.capacity() > max_retained {
        *buf = Vec::with_capacity(initial);
    }
}

/// Return an optimal pre-allocation capacity for the given size.
/// Rounds up to common image sizes to reduce future reallocations.
#[inline]
fn optimal_capacity(size: usize) -> usize {
    if size <= IMAGE_256 {
        IMAGE_256
    } else if size <= IMAGE_512 {
        IMAGE_512
    } else if size <= IMAGE_1024 {
        IMAGE_1024
    } else {
        // Round up to next power of 2 for very large buffers
        size.next_power_of_two()
    }
}
