//! Image file decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode an image file from bytes, applying EXIF orientation correction.
///
/// The container format is sniffed from the leading bytes; the file name or
/// MIME type reported by the browser is not trusted.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a supported image.
/// Returns `DecodeError::CorruptedFile` if the image is truncated or corrupted.
/// Returns `DecodeError::Empty` if the image has no pixels.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    to_decoded(apply_orientation(img, orientation))
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn to_decoded(img: DynamicImage) -> Result<DecodedImage, DecodeError> {
    let decoded = DecodedImage::from_rgba_image(img.into_rgba8());
    if decoded.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(decoded)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn encode_as(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut out, format)
            .unwrap();
        out.into_inner()
    }

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, 128, 255])
        })
    }

    #[test]
    fn test_decode_png() {
        let src = gradient(12, 7);
        let bytes = encode_as(&src, ImageFormat::Png);

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (12, 7));
        assert_eq!(decoded.pixels, src.into_raw());
    }

    #[test]
    fn test_decode_jpeg_dimensions() {
        let src = gradient(16, 8);
        let rgb = DynamicImage::ImageRgba8(src).into_rgb8();
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut out, ImageFormat::Jpeg)
            .unwrap();

        let decoded = decode_image(out.get_ref()).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));
        // JPEG has no alpha channel; every pixel decodes opaque
        assert!(decoded.pixels.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_decode_png_keeps_alpha() {
        let src = RgbaImage::from_pixel(3, 3, Rgba([200, 100, 50, 64]));
        let bytes = encode_as(&src, ImageFormat::Png);

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.pixel(1, 1), Some([200, 100, 50, 64]));
    }

    #[test]
    fn test_decode_garbage_is_invalid_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = encode_as(&gradient(20, 20), ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];

        let result = decode_image(truncated);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_no_exif_is_normal_orientation() {
        let bytes = encode_as(&gradient(4, 4), ImageFormat::Png);
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
        assert_eq!(extract_orientation(b"not an image"), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate_swaps_dimensions() {
        let img = DynamicImage::ImageRgba8(gradient(6, 2));
        let rotated = apply_orientation(img.clone(), Orientation::Rotate90CW);
        assert_eq!((rotated.width(), rotated.height()), (2, 6));

        let flipped = apply_orientation(img, Orientation::FlipHorizontal);
        assert_eq!((flipped.width(), flipped.height()), (6, 2));
    }
}
