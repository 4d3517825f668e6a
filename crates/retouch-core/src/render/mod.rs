//! Render pipeline: plans a frame from the transform record and hands it
//! to a drawing host.
//!
//! # Drawing Order
//!
//! A plan is executed as a canvas-style affine frame:
//! 1. Resize the surface to the rotation-aware canvas size (resets overlay)
//! 2. Translate to the canvas centre
//! 3. Rotate clockwise by the record's quarter turn
//! 4. Scale by -1 on each flipped axis
//! 5. Apply the filter chain
//! 6. Draw the source scaled to the target size, centred on the origin
//!
//! Planning is pure; all side effects live behind [`Surface`].

mod filter;
mod raster;

pub use filter::FilterChain;
pub use raster::RasterSurface;

use crate::config::OverlayStyle;
use crate::crop::CropRect;
use crate::decode::DecodedImage;
use crate::{Rotation, TransformRecord};

/// A drawing host with a main surface and a crop overlay.
///
/// The browser implementation draws into two stacked canvases; the
/// software [`RasterSurface`] draws into `image` buffers.
pub trait Surface {
    /// Current main surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Make `image` the source for subsequent draws.
    fn upload(&mut self, image: &DecodedImage);

    /// Execute a plan: resize main and overlay to the canvas size, clear
    /// the overlay, and paint the source through the plan's frame.
    fn draw(&mut self, plan: &RenderPlan);

    /// Clear the overlay without touching the main surface.
    fn clear_overlay(&mut self);

    /// Outline `rect` on the overlay.
    fn stroke_overlay(&mut self, rect: CropRect, style: &OverlayStyle, dashed: bool);

    /// Read back the main surface's pixels, or `None` if nothing is drawn.
    fn read_pixels(&self) -> Option<DecodedImage>;
}

/// Everything a host needs to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    /// Surface width after rotation
    pub canvas_width: u32,
    /// Surface height after rotation
    pub canvas_height: u32,
    pub rotation: Rotation,
    /// -1.0 when flipped horizontally, else 1.0
    pub scale_x: f64,
    /// -1.0 when flipped vertically, else 1.0
    pub scale_y: f64,
    pub filter: FilterChain,
    /// Source is scaled to this width before rotation
    pub draw_width: u32,
    /// Source is scaled to this height before rotation
    pub draw_height: u32,
}

impl RenderPlan {
    /// Frame origin in canvas coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.canvas_width) / 2.0,
            f64::from(self.canvas_height) / 2.0,
        )
    }

    /// Top-left corner of the drawn image in frame coordinates.
    pub fn draw_origin(&self) -> (f64, f64) {
        (
            -f64::from(self.draw_width) / 2.0,
            -f64::from(self.draw_height) / 2.0,
        )
    }

    /// Clockwise rotation of the frame in radians.
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.radians()
    }

    pub fn flips_horizontal(&self) -> bool {
        self.scale_x < 0.0
    }

    pub fn flips_vertical(&self) -> bool {
        self.scale_y < 0.0
    }
}

/// Plan a frame for `image` under `record`.
///
/// Returns `None` when no image is loaded or the target size is empty;
/// rendering is then a no-op.
pub fn plan_render(image: Option<&DecodedImage>, record: &TransformRecord) -> Option<RenderPlan> {
    let loaded = image.is_some_and(|img| !img.is_empty());
    if !loaded || !record.has_size() {
        return None;
    }

    let (canvas_width, canvas_height) = record.canvas_size();
    Some(RenderPlan {
        canvas_width,
        canvas_height,
        rotation: record.rotation,
        scale_x: if record.flip_horizontal { -1.0 } else { 1.0 },
        scale_y: if record.flip_vertical { -1.0 } else { 1.0 },
        filter: FilterChain::from_record(record),
        draw_width: record.width,
        draw_height: record.height,
    })
}

/// Plan and draw in one step. Returns the executed plan, if any.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    image: Option<&DecodedImage>,
    record: &TransformRecord,
) -> Option<RenderPlan> {
    let plan = plan_render(image, record)?;
    surface.draw(&plan);
    Some(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> DecodedImage {
        DecodedImage::transparent(width, height)
    }

    fn record(width: u32, height: u32) -> TransformRecord {
        let mut record = TransformRecord::new();
        record.set_size(width, height);
        record
    }

    #[test]
    fn test_no_image_is_noop() {
        assert!(plan_render(None, &record(10, 10)).is_none());

        let mut surface = RasterSurface::new();
        assert!(render(&mut surface, None, &record(10, 10)).is_none());
        assert_eq!(surface.size(), (0, 0));
    }

    #[test]
    fn test_zero_size_is_noop() {
        let img = image(10, 10);
        assert!(plan_render(Some(&img), &record(0, 10)).is_none());
        assert!(plan_render(Some(&img), &record(10, 0)).is_none());
    }

    #[test]
    fn test_plan_rotation_swaps_canvas() {
        let img = image(100, 50);
        let mut rec = record(100, 50);
        rec.rotation = Rotation::Deg90;

        let plan = plan_render(Some(&img), &rec).unwrap();
        assert_eq!((plan.canvas_width, plan.canvas_height), (50, 100));
        assert_eq!((plan.draw_width, plan.draw_height), (100, 50));
        assert_eq!(plan.center(), (25.0, 50.0));
        assert_eq!(plan.draw_origin(), (-50.0, -25.0));
    }

    #[test]
    fn test_plan_flip_scales() {
        let img = image(4, 4);
        let mut rec = record(4, 4);
        rec.flip_vertical = true;

        let plan = plan_render(Some(&img), &rec).unwrap();
        assert_eq!((plan.scale_x, plan.scale_y), (1.0, -1.0));
        assert!(!plan.flips_horizontal());
        assert!(plan.flips_vertical());
    }

    #[test]
    fn test_plan_does_not_mutate_record() {
        let img = image(8, 8);
        let rec = record(8, 8);
        let before = rec.clone();
        let _ = plan_render(Some(&img), &rec);
        assert_eq!(rec, before);
    }

    #[test]
    fn test_plan_uses_target_not_source_size() {
        let img = image(100, 100);
        let plan = plan_render(Some(&img), &record(40, 30)).unwrap();
        assert_eq!((plan.canvas_width, plan.canvas_height), (40, 30));
    }
}
