//! PNG encoding for RGBA image data.
//!
//! Heatmap overlays carry a per-pixel alpha ramp, so they are always written
//! as 8-bit RGBA (color type 6) with an explicit alpha channel. The encoder
//! writes IHDR, a single zlib-compressed IDAT and IEND.

use std::io::Write;

use crate::buffer_pool::with_scanline_buffer;
use crate::error::RenderError;

/// PNG file signature
const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Bytes per RGBA pixel
const BYTES_PER_PIXEL: usize = 4;

/// Create a PNG image from RGBA pixel data (color type 6).
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel), row-major, top row first
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
///
/// # Errors
/// `EncodingFailure` if the buffer length does not match the dimensions, a
/// dimension is zero or too large for PNG, or compression fails.
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::EncodingFailure(format!(
            "cannot encode an empty {}x{} image",
            width, height
        )));
    }
    let png_width = u32::try_from(width)
        .map_err(|_| RenderError::EncodingFailure(format!("width {} exceeds PNG limits", width)))?;
    let png_height = u32::try_from(height)
        .map_err(|_| RenderError::EncodingFailure(format!("height {} exceeds PNG limits", height)))?;

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| {
            RenderError::EncodingFailure(format!("{}x{} RGBA image is too large", width, height))
        })?;
    if pixels.len() != expected {
        return Err(RenderError::EncodingFailure(format!(
            "buffer holds {} bytes, expected {} for {}x{} RGBA",
            pixels.len(),
            expected,
            width,
            height
        )));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&png_width.to_be_bytes());
    ihdr_data.extend_from_slice(&png_height.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // IDAT chunk (image data)
    let idat_data = deflate_idat_rgba(pixels, width, height)
        .map_err(|e| RenderError::EncodingFailure(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    // Write length
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());

    // Write chunk type
    png.extend_from_slice(chunk_type);

    // Write data
    png.extend_from_slice(data);

    // CRC covers the chunk type and data, not the length
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGBA image data for IDAT chunk.
fn deflate_idat_rgba(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let row_bytes = width * BYTES_PER_PIXEL;

    with_scanline_buffer(width, height, BYTES_PER_PIXEL, |uncompressed| {
        // Add filter byte (0 = no filter) to each scanline
        for row in pixels.chunks_exact(row_bytes) {
            uncompressed.push(0);
            uncompressed.extend_from_slice(row);
        }

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(&uncompressed[..])?;
        encoder.finish()
    })
}
