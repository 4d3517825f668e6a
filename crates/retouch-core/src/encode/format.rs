//! Export formats and the packaged download.

use serde::{Deserialize, Serialize};

use super::{encode_jpeg, encode_png, EncodeError};
use crate::decode::DecodedImage;

/// File formats the editor can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Parse a MIME type. `image/jpg` is accepted as an alias.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ExportFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// Download name for this format, e.g. `image.jpg`.
    pub fn file_name(self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension())
    }
}

/// An encoded image ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub format: ExportFormat,
    /// Encoded bytes; empty when there was nothing to export
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// A named file with no content.
    pub fn empty(format: ExportFormat, stem: &str) -> Self {
        Self {
            file_name: format.file_name(stem),
            format,
            bytes: Vec::new(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode a rendered image in `format`.
pub fn export_image(
    image: &DecodedImage,
    format: ExportFormat,
    stem: &str,
    jpeg_quality: u8,
) -> Result<ExportedFile, EncodeError> {
    let bytes = match format {
        ExportFormat::Png => encode_png(&image.pixels, image.width, image.height)?,
        ExportFormat::Jpeg => encode_jpeg(&image.pixels, image.width, image.height, jpeg_quality)?,
    };

    Ok(ExportedFile {
        file_name: format.file_name(stem),
        format,
        bytes,
    })
}
