//! The `Editor` class exported to JavaScript.
//!
//! ```typescript
//! import init, { Editor } from '@retouch/wasm';
//!
//! await init();
//! const editor = new Editor({ logLevel: 'debug' });
//! editor.bindControls();
//! ```
//!
//! Pages that build their own UI can skip `bindControls` and call the
//! command methods directly. Each returns `false` when the input was
//! rejected and nothing changed.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;
use retouch_core::{
    Adjustment, Command, CropState, EditorSession, ExportFormat, FilterChain, Outcome,
};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement};

use crate::bindings::{self, element, SharedSession};
use crate::config::{ControlIds, JsEditorConfig};
use crate::download::trigger_download;
use crate::logging;
use crate::surface::CanvasSurface;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// An editing session bound to the page's canvases.
#[wasm_bindgen]
pub struct Editor {
    session: SharedSession,
    ids: ControlIds,
    document: Document,
}

#[wasm_bindgen]
impl Editor {
    /// Create an editor over the configured canvases.
    ///
    /// `config` is optional; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Editor, JsValue> {
        let config: JsEditorConfig = if config.is_undefined() || config.is_null() {
            JsEditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))?
        };
        logging::init(logging::parse_level(&config.log_level));

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        let main: HtmlCanvasElement = element(&document, &config.ids.image_canvas)?;
        let overlay: HtmlCanvasElement = element(&document, &config.ids.overlay_canvas)?;
        let surface = CanvasSurface::new(&document, main, overlay)?;

        info!("editor ready on #{}", config.ids.image_canvas);
        Ok(Self {
            session: Rc::new(RefCell::new(EditorSession::new(surface, config.editor))),
            ids: config.ids,
            document,
        })
    }

    /// Attach listeners to the page controls named in the config.
    #[wasm_bindgen(js_name = bindControls)]
    pub fn bind_controls(&self) -> Result<(), JsValue> {
        bindings::bind_controls(&self.document, &self.session, &self.ids)
    }

    /// Decode and show an image. On failure the previous image stays.
    pub fn load(&self, bytes: &[u8]) -> Result<(), JsValue> {
        bindings::dispatch(&self.session, Command::Load(bytes.to_vec()))
            .map(|_| ())
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = applyResize)]
    pub fn apply_resize(&self, width: String, height: String) -> bool {
        self.run(Command::ApplyResize { width, height })
    }

    /// Parse a `"WxH"` preset; returns `[width, height]` for the resize fields.
    #[wasm_bindgen(js_name = selectPreset)]
    pub fn select_preset(&self, token: String) -> Option<Vec<u32>> {
        match bindings::dispatch(&self.session, Command::SelectPreset(token)) {
            Ok(Outcome::ResizeFields { width, height }) => Some(vec![width, height]),
            _ => None,
        }
    }

    /// Rotation in degrees, one of 0, 90, 180 or 270 (mod 360).
    #[wasm_bindgen(js_name = setRotation)]
    pub fn set_rotation(&self, degrees: String) -> bool {
        self.run(Command::SetRotation(degrees))
    }

    #[wasm_bindgen(js_name = flipHorizontal)]
    pub fn flip_horizontal(&self) -> bool {
        self.run(Command::FlipHorizontal)
    }

    #[wasm_bindgen(js_name = flipVertical)]
    pub fn flip_vertical(&self) -> bool {
        self.run(Command::FlipVertical)
    }

    #[wasm_bindgen(js_name = setBrightness)]
    pub fn set_brightness(&self, percent: String) -> bool {
        self.adjust(Adjustment::Brightness, percent)
    }

    #[wasm_bindgen(js_name = setContrast)]
    pub fn set_contrast(&self, percent: String) -> bool {
        self.adjust(Adjustment::Contrast, percent)
    }

    #[wasm_bindgen(js_name = setSaturation)]
    pub fn set_saturation(&self, percent: String) -> bool {
        self.adjust(Adjustment::Saturation, percent)
    }

    #[wasm_bindgen(js_name = setGrayscale)]
    pub fn set_grayscale(&self, on: bool) -> bool {
        self.run(Command::SetGrayscale(on))
    }

    #[wasm_bindgen(js_name = setSepia)]
    pub fn set_sepia(&self, on: bool) -> bool {
        self.run(Command::SetSepia(on))
    }

    #[wasm_bindgen(js_name = startCrop)]
    pub fn start_crop(&self) -> bool {
        self.run(Command::StartCrop)
    }

    #[wasm_bindgen(js_name = cancelCrop)]
    pub fn cancel_crop(&self) -> bool {
        self.run(Command::CancelCrop)
    }

    /// Replace the working image with the staged rectangle.
    #[wasm_bindgen(js_name = applyCrop)]
    pub fn apply_crop(&self) -> bool {
        self.run(Command::ApplyCrop)
    }

    /// Canvas-local coordinates, in canvas pixels.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64) -> bool {
        self.run(Command::PointerDown { x, y })
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) -> bool {
        self.run(Command::PointerMove { x, y })
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) -> bool {
        self.run(Command::PointerUp)
    }

    /// Encode the canvas as `image/png` or `image/jpeg`.
    ///
    /// Returns an empty array if there is nothing to export.
    #[wasm_bindgen(js_name = exportImage)]
    pub fn export_image(&self, mime: &str) -> Result<Vec<u8>, JsValue> {
        let file = self.session.borrow().export_mime(mime).map_err(to_js)?;
        Ok(file.bytes)
    }

    /// Export and save as `image.png` / `image.jpg`.
    pub fn download(&self, mime: &str) -> Result<(), JsValue> {
        let format = ExportFormat::from_mime(mime)
            .ok_or_else(|| JsValue::from_str(&format!("Unsupported export type: {}", mime)))?;
        let file = self.session.borrow().export(format);
        trigger_download(&self.document, &file)
    }

    /// Target width before rotation.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.session.borrow().record().width
    }

    /// Target height before rotation.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.session.borrow().record().height
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> u32 {
        self.session.borrow().record().rotation.degrees()
    }

    /// The CSS `filter` string for the current adjustments.
    #[wasm_bindgen(getter, js_name = filterCss)]
    pub fn filter_css(&self) -> String {
        FilterChain::from_record(self.session.borrow().record()).to_css()
    }

    #[wasm_bindgen(getter, js_name = isCropping)]
    pub fn is_cropping(&self) -> bool {
        self.session.borrow().crop_state() != CropState::Idle
    }
}

impl Editor {
    fn run(&self, command: Command) -> bool {
        bindings::dispatch(&self.session, command).is_ok()
    }

    fn adjust(&self, which: Adjustment, value: String) -> bool {
        self.run(Command::SetAdjustment { which, value })
    }
}
