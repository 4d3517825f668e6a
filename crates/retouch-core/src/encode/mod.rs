//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding RGBA pixel data to PNG (lossless, alpha kept)
//! - Encoding RGBA pixel data to JPEG (alpha flattened over black)
//! - Naming and packaging the exported file
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::encode::{export_image, ExportFormat};
//!
//! let file = export_image(&rendered, ExportFormat::Png, "image", 92).unwrap();
//! assert_eq!(file.file_name, "image.png");
//! ```

mod format;
mod jpeg;
mod png;

pub use format::{export_image, ExportFormat, ExportedFile};
pub use jpeg::encode_jpeg;
pub use png::encode_png;

use thiserror::Error;

use crate::decode::CHANNELS;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Shared input validation for the RGBA encoders.
fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * CHANNELS;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
