//! JPEG encoding for export.
//!
//! Uses the `image` crate's JPEG encoder. JPEG has no alpha channel, so
//! transparent pixels are composited over black first, which is what a
//! canvas does when asked for `image/jpeg`.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate, EncodeError};

/// Encode RGBA pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);
    let rgb = flatten_over_black(pixels);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Drop the alpha channel, premultiplying colour by it.
fn flatten_over_black(pixels: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
    for px in pixels.chunks_exact(4) {
        let alpha = u16::from(px[3]);
        for &c in &px[..3] {
            rgb.push(((u16::from(c) * alpha + 127) / 255) as u8);
        }
    }
    rgb
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: valid input always produces a framed JPEG.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 1u8..=100,
            value in any::<u8>(),
        ) {
            let pixels = vec![value; (width * height * 4) as usize];
            let jpeg = encode_jpeg(&pixels, width, height, quality).unwrap();

            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            let len = jpeg.len();
            prop_assert_eq!(&jpeg[len - 2..], &[0xFF, 0xD9]);
        }

        /// Property: same input always produces same output.
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in 1u8..=100,
        ) {
            let pixels = vec![100u8; (width * height * 4) as usize];
            let a = encode_jpeg(&pixels, width, height, quality).unwrap();
            let b = encode_jpeg(&pixels, width, height, quality).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
