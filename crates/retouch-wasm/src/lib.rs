//! Retouch WASM - browser bindings for the retouch editor
//!
//! Renders through two stacked canvases and wires the page's controls to
//! an [`retouch_core::EditorSession`].
//!
//! # Module Structure
//!
//! - `editor` - the `Editor` class exported to JavaScript
//! - `bindings` - DOM listeners for the standard control set
//! - `surface` - canvas-backed drawing host
//! - `download` - Blob + anchor download of exported images
//! - `config` - constructor options and control ids
//! - `logging` - `log` records forwarded to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { Editor } from '@retouch/wasm';
//!
//! await init();
//! const editor = new Editor();
//! editor.bindControls();
//! ```

use log::LevelFilter;
use wasm_bindgen::prelude::*;

mod bindings;
mod config;
mod download;
mod editor;
mod logging;
mod surface;

pub use config::{ControlIds, JsEditorConfig};
pub use editor::Editor;
pub use surface::CanvasSurface;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
