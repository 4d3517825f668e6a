//! Browser drawing host: two stacked `<canvas>` elements.
//!
//! The main canvas shows the rendered image; the overlay canvas on top of
//! it only ever shows the crop rectangle. The working image is kept in a
//! detached third canvas so every render is a single `drawImage`, with the
//! browser doing the scaling, rotation and filtering.

use js_sys::Array;
use log::warn;
use retouch_core::crop::CropRect;
use retouch_core::{DecodedImage, OverlayStyle, RenderPlan, Surface};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

/// `Surface` over a main canvas, its overlay, and an offscreen source.
pub struct CanvasSurface {
    main: HtmlCanvasElement,
    main_ctx: CanvasRenderingContext2d,
    overlay: HtmlCanvasElement,
    overlay_ctx: CanvasRenderingContext2d,
    source: HtmlCanvasElement,
    source_ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap the page's main and overlay canvases.
    pub fn new(
        document: &Document,
        main: HtmlCanvasElement,
        overlay: HtmlCanvasElement,
    ) -> Result<Self, JsValue> {
        let source: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(JsValue::from)?;

        Ok(Self {
            main_ctx: context_2d(&main)?,
            overlay_ctx: context_2d(&overlay)?,
            source_ctx: context_2d(&source)?,
            main,
            overlay,
            source,
        })
    }

    /// The visible canvas, for hit-testing pointer events.
    pub fn main_canvas(&self) -> &HtmlCanvasElement {
        &self.main
    }

    /// Match the overlay to the main canvas; resizing also clears it.
    fn reset_overlay(&self) {
        self.overlay.set_width(self.main.width());
        self.overlay.set_height(self.main.height());
        self.overlay_ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.overlay.width()),
            f64::from(self.overlay.height()),
        );
    }

    fn paint(&self, plan: &RenderPlan) -> Result<(), JsValue> {
        let ctx = &self.main_ctx;
        let (cx, cy) = plan.center();
        let (ox, oy) = plan.draw_origin();

        ctx.save();
        ctx.translate(cx, cy)?;
        ctx.rotate(plan.rotation_radians())?;
        ctx.scale(plan.scale_x, plan.scale_y)?;
        ctx.set_filter(&plan.filter.to_css());
        let drawn = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            &self.source,
            ox,
            oy,
            f64::from(plan.draw_width),
            f64::from(plan.draw_height),
        );
        ctx.restore();
        drawn
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.main.width(), self.main.height())
    }

    fn upload(&mut self, image: &DecodedImage) {
        self.source.set_width(image.width);
        self.source.set_height(image.height);
        let result = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(image.pixels.as_slice()),
            image.width,
            image.height,
        )
        .and_then(|data| self.source_ctx.put_image_data(&data, 0.0, 0.0));
        report(result, "upload");
    }

    fn draw(&mut self, plan: &RenderPlan) {
        self.main.set_width(plan.canvas_width);
        self.main.set_height(plan.canvas_height);
        self.reset_overlay();
        report(self.paint(plan), "draw");
    }

    fn clear_overlay(&mut self) {
        self.reset_overlay();
    }

    fn stroke_overlay(&mut self, rect: CropRect, style: &OverlayStyle, dashed: bool) {
        let ctx = &self.overlay_ctx;
        let dash = Array::new();
        if dashed {
            dash.push(&JsValue::from_f64(f64::from(style.dash)));
        }

        ctx.set_stroke_style_str(&style.css_color());
        ctx.set_line_width(f64::from(style.line_width));
        report(ctx.set_line_dash(&dash), "stroke");
        // strokeRect accepts negative sizes, so the rectangle is drawn as dragged
        ctx.stroke_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
    }

    fn read_pixels(&self) -> Option<DecodedImage> {
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            return None;
        }
        let data = self
            .main_ctx
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .inspect_err(|e| warn!("reading canvas pixels failed: {:?}", e))
            .ok()?;
        Some(DecodedImage::new(width, height, data.data().0))
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Surface methods cannot fail; canvas errors are logged instead.
fn report(result: Result<(), JsValue>, what: &str) {
    if let Err(e) = result {
        warn!("canvas {} failed: {:?}", what, e);
    }
}
