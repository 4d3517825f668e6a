//! Editor configuration.
//!
//! Every field has a default, so hosts only need to supply what they want
//! to change. The browser crate deserializes this from a plain JS object.

use serde::{Deserialize, Serialize};

/// Default JPEG quality, matching what browsers use for `toDataURL`.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Largest canvas side browsers reliably allocate.
pub const DEFAULT_MAX_DIMENSION: u32 = 16384;

/// Tunable editor behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// JPEG export quality (1-100)
    pub jpeg_quality: u8,
    /// File name used for downloads, without extension
    pub file_stem: String,
    /// Upper bound for brightness/contrast/saturation percentages
    pub max_adjustment: u32,
    /// Upper bound for resize width/height in pixels
    pub max_dimension: u32,
    /// Apply a preset size as soon as it is selected instead of only
    /// filling in the width/height fields.
    pub apply_preset_immediately: bool,
    /// Crop rectangle outline style
    pub overlay: OverlayStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            file_stem: "image".to_string(),
            max_adjustment: 200,
            max_dimension: DEFAULT_MAX_DIMENSION,
            apply_preset_immediately: false,
            overlay: OverlayStyle::default(),
        }
    }
}

/// How the crop rectangle is outlined on the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Stroke colour as RGBA
    pub color: [u8; 4],
    /// Stroke width in pixels
    pub line_width: u32,
    /// Dash and gap length in pixels while dragging
    pub dash: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0, 255],
            line_width: 1,
            dash: 6,
        }
    }
}

impl OverlayStyle {
    /// CSS colour string for canvas stroke styles.
    pub fn css_color(&self) -> String {
        let [r, g, b, a] = self.color;
        format!("rgba({}, {}, {}, {})", r, g, b, f64::from(a) / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.jpeg_quality, 92);
        assert_eq!(config.file_stem, "image");
        assert_eq!(config.max_adjustment, 200);
        assert_eq!(config.max_dimension, 16384);
        assert!(!config.apply_preset_immediately);
    }

    #[test]
    fn test_overlay_css_color() {
        let style = OverlayStyle::default();
        assert_eq!(style.css_color(), "rgba(255, 0, 0, 1)");

        let style = OverlayStyle {
            color: [0, 128, 255, 0],
            ..OverlayStyle::default()
        };
        assert_eq!(style.css_color(), "rgba(0, 128, 255, 0)");
    }
}
