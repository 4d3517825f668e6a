//! Options accepted by the `Editor` constructor.
//!
//! ```typescript
//! const editor = new Editor({
//!   jpeg_quality: 85,
//!   ids: { imageCanvas: 'main', overlayCanvas: 'crop' },
//!   logLevel: 'debug',
//! });
//! ```

use retouch_core::EditorConfig;
use serde::Deserialize;

/// DOM element ids for every control the editor binds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlIds {
    pub upload: String,
    pub width_input: String,
    pub height_input: String,
    pub preset_size: String,
    pub apply_resize: String,
    pub start_crop: String,
    pub apply_crop: String,
    /// Optional; skipped if the page has no such element
    pub cancel_crop: String,
    pub rotation: String,
    pub flip_h: String,
    pub flip_v: String,
    pub brightness: String,
    pub contrast: String,
    pub saturation: String,
    pub grayscale: String,
    pub sepia: String,
    pub download_png: String,
    pub download_jpeg: String,
    pub image_canvas: String,
    pub overlay_canvas: String,
}

impl Default for ControlIds {
    fn default() -> Self {
        Self {
            upload: "upload".into(),
            width_input: "widthInput".into(),
            height_input: "heightInput".into(),
            preset_size: "presetSize".into(),
            apply_resize: "applyResize".into(),
            start_crop: "startCrop".into(),
            apply_crop: "applyCrop".into(),
            cancel_crop: "cancelCrop".into(),
            rotation: "rotation".into(),
            flip_h: "flipH".into(),
            flip_v: "flipV".into(),
            brightness: "brightness".into(),
            contrast: "contrast".into(),
            saturation: "saturation".into(),
            grayscale: "grayscale".into(),
            sepia: "sepia".into(),
            download_png: "downloadPNG".into(),
            download_jpeg: "downloadJPEG".into(),
            image_canvas: "imageCanvas".into(),
            overlay_canvas: "overlayCanvas".into(),
        }
    }
}

/// Editor settings plus host-only options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JsEditorConfig {
    #[serde(flatten)]
    pub editor: EditorConfig,
    pub ids: ControlIds,
    #[serde(rename = "logLevel")]
    pub log_level: String,
}

impl Default for JsEditorConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            ids: ControlIds::default(),
            log_level: "info".into(),
        }
    }
}
