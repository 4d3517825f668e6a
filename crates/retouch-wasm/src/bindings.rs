//! DOM listeners that turn page controls into editor commands.
//!
//! Every listener borrows the shared session for exactly one dispatch.
//! Rejected commands are logged by the session and otherwise ignored.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Uint8Array;
use log::{debug, warn};
use retouch_core::{Adjustment, Command, EditorError, EditorSession, ExportFormat, Outcome};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Event, EventTarget, FileReader, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, MouseEvent,
};

use crate::config::ControlIds;
use crate::download::trigger_download;
use crate::surface::CanvasSurface;

/// The session as shared between the `Editor` handle and its listeners.
pub type SharedSession = Rc<RefCell<EditorSession<CanvasSurface>>>;

/// Run one command against the shared session.
pub fn dispatch(session: &SharedSession, command: Command) -> Result<Outcome, EditorError> {
    match session.try_borrow_mut() {
        Ok(mut session) => session.dispatch(command),
        Err(_) => {
            // only reachable if a listener fires while another is dispatching
            warn!("{} dropped: editor busy", command.name());
            Ok(Outcome::Unchanged)
        }
    }
}

/// Look up a required control by id.
pub fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{} has the wrong type", id)))
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // listeners live as long as the page
    closure.forget();
    Ok(())
}

/// Attach listeners for every control in `ids`.
///
/// Fails if a required element is missing; `cancelCrop` may be absent.
pub fn bind_controls(
    document: &Document,
    session: &SharedSession,
    ids: &ControlIds,
) -> Result<(), JsValue> {
    bind_upload(document, session, ids)?;
    bind_resize(document, session, ids)?;
    bind_crop(document, session, ids)?;
    bind_transform(document, session, ids)?;
    bind_filters(document, session, ids)?;
    bind_downloads(document, session, ids)?;
    debug!("editor controls bound");
    Ok(())
}

fn bind_upload(document: &Document, session: &SharedSession, ids: &ControlIds) -> Result<(), JsValue> {
    let input: HtmlInputElement = element(document, &ids.upload)?;
    let session = session.clone();
    let target = input.clone();

    listen(&input, "change", move |_| {
        let Some(file) = target.files().and_then(|files| files.get(0)) else {
            return;
        };
        if let Err(e) = read_file(&session, &file) {
            warn!("reading {} failed: {:?}", file.name(), e);
        }
    })
}

/// Read `file` asynchronously and load it when the bytes arrive.
fn read_file(session: &SharedSession, file: &web_sys::File) -> Result<(), JsValue> {
    let reader = FileReader::new()?;
    let onload = {
        let reader = reader.clone();
        let session = session.clone();
        Closure::once_into_js(move || match reader.result() {
            Ok(buffer) => {
                let bytes = Uint8Array::new(&buffer).to_vec();
                let _ = dispatch(&session, Command::Load(bytes));
            }
            Err(e) => warn!("file read produced no data: {:?}", e),
        })
    };
    reader.set_onload(Some(onload.unchecked_ref()));
    reader.read_as_array_buffer(file)
}

fn bind_resize(document: &Document, session: &SharedSession, ids: &ControlIds) -> Result<(), JsValue> {
    let width: HtmlInputElement = element(document, &ids.width_input)?;
    let height: HtmlInputElement = element(document, &ids.height_input)?;
    let preset: HtmlSelectElement = element(document, &ids.preset_size)?;
    let apply: HtmlElement = element(document, &ids.apply_resize)?;

    {
        let session = session.clone();
        let (width, height) = (width.clone(), height.clone());
        let select = preset.clone();
        listen(&preset, "change", move |_| {
            let command = Command::SelectPreset(select.value());
            if let Ok(Outcome::ResizeFields { width: w, height: h }) = dispatch(&session, command) {
                width.set_value(&w.to_string());
                height.set_value(&h.to_string());
            }
        })?;
    }

    let session = session.clone();
    listen(&apply, "click", move |_| {
        let _ = dispatch(
            &session,
            Command::ApplyResize {
                width: width.value(),
                height: height.value(),
            },
        );
    })
}

fn bind_crop(document: &Document, session: &SharedSession, ids: &ControlIds) -> Result<(), JsValue> {
    on_click(document, session, &ids.start_crop, || Command::StartCrop)?;
    on_click(document, session, &ids.apply_crop, || Command::ApplyCrop)?;
    if document.get_element_by_id(&ids.cancel_crop).is_some() {
        on_click(document, session, &ids.cancel_crop, || Command::CancelCrop)?;
    }

    // the overlay is expected to pass pointer events through (pointer-events: none)
    let canvas: HtmlCanvasElement = element(document, &ids.image_canvas)?;
    pointer(&canvas, session, "mousedown", |x, y| Command::PointerDown { x, y })?;
    pointer(&canvas, session, "mousemove", |x, y| Command::PointerMove { x, y })?;
    pointer(&canvas, session, "mouseup", |_, _| Command::PointerUp)
}

/// Forward a mouse event with canvas-local coordinates.
fn pointer(
    canvas: &HtmlCanvasElement,
    session: &SharedSession,
    event: &str,
    command: fn(f64, f64) -> Command,
) -> Result<(), JsValue> {
    let session = session.clone();
    let target = canvas.clone();
    listen(canvas, event, move |e| {
        let Some(mouse) = e.dyn_ref::<MouseEvent>() else {
            return;
        };
        let bounds = target.get_bounding_client_rect();
        let x = f64::from(mouse.client_x()) - bounds.left();
        let y = f64::from(mouse.client_y()) - bounds.top();
        let _ = dispatch(&session, command(x, y));
    })
}

fn on_click(
    document: &Document,
    session: &SharedSession,
    id: &str,
    command: fn() -> Command,
) -> Result<(), JsValue> {
    let button: HtmlElement = element(document, id)?;
    let session = session.clone();
    listen(&button, "click", move |_| {
        let _ = dispatch(&session, command());
    })
}

fn bind_transform(document: &Document, session: &SharedSession, ids: &ControlIds) -> Result<(), JsValue> {
    let rotation: HtmlSelectElement = element(document, &ids.rotation)?;
    {
        let session = session.clone();
        let select = rotation.clone();
        listen(&rotation, "change", move |_| {
            let _ = dispatch(&session, Command::SetRotation(select.value()));
        })?;
    }

    on_click(document, session, &ids.flip_h, || Command::FlipHorizontal)?;
    on_click(document, session, &ids.flip_v, || Command::FlipVertical)
}

fn bind_filters(document: &Document, session: &SharedSession, ids: &ControlIds) -> Result<(), JsValue> {
    for (id, which) in [
        (&ids.brightness, Adjustment::Brightness),
        (&ids.contrast, Adjustment::Contrast),
        (&ids.saturation, Adjustment::Saturation),
    ] {
        let slider: HtmlInputElement = element(document, id)?;
        let session = session.clone();
        let target = slider.clone();
        listen(&slider, "input", move |_| {
            let command = Command::SetAdjustment {
                which,
                value: target.value(),
            };
            let _ = dispatch(&session, command);
        })?;
    }

    checkbox(document, session, &ids.grayscale, Command::SetGrayscale)?;
    checkbox(document, session, &ids.sepia, Command::SetSepia)
}

fn checkbox(
    document: &Document,
    session: &SharedSession,
    id: &str,
    command: fn(bool) -> Command,
) -> Result<(), JsValue> {
    let input: HtmlInputElement = element(document, id)?;
    let session = session.clone();
    let target = input.clone();
    listen(&input, "change", move |_| {
        let _ = dispatch(&session, command(target.checked()));
    })
}

fn bind_downloads(document: &Document, session: &SharedSession, ids: &ControlIds) -> Result<(), JsValue> {
    for (id, format) in [
        (&ids.download_png, ExportFormat::Png),
        (&ids.download_jpeg, ExportFormat::Jpeg),
    ] {
        let button: HtmlElement = element(document, id)?;
        let session = session.clone();
        let document = document.clone();
        listen(&button, "click", move |_| {
            let Ok(file) = session.try_borrow().map(|s| s.export(format)) else {
                warn!("download dropped: editor busy");
                return;
            };
            if let Err(e) = trigger_download(&document, &file) {
                warn!("download of {} failed: {:?}", file.file_name, e);
            }
        })?;
    }
    Ok(())
}
