//! Saving exported bytes through a temporary `<a download>` link.

use js_sys::{Array, Uint8Array};
use log::debug;
use retouch_core::ExportedFile;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url};

/// Wrap the file's bytes in a typed `Blob`.
pub fn to_blob(file: &ExportedFile) -> Result<Blob, JsValue> {
    let bytes = Uint8Array::from(file.bytes.as_slice());
    let parts = Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(file.mime_type());
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Offer `file` to the user as a download.
///
/// An empty export still downloads, as a zero-byte file with the usual name.
pub fn trigger_download(document: &Document, file: &ExportedFile) -> Result<(), JsValue> {
    let blob = to_blob(file)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&file.file_name);
    anchor.set_attribute("style", "display:none;")?;

    // some browsers ignore clicks on detached anchors
    if let Some(body) = document.body() {
        body.append_child(&anchor)?;
    }
    anchor.click();
    anchor.remove();

    debug!("download offered: {} ({} bytes)", file.file_name, file.bytes.len());
    Url::revoke_object_url(&url)
}
