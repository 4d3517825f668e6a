//! Software drawing host backed by `image` buffers.
//!
//! Executes render plans without a browser: scaling, flips and quarter
//! turns go through `image::imageops`, the filter chain through
//! [`FilterChain::apply`](super::FilterChain::apply). Used for headless
//! export and for exercising the editor in tests.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::{RenderPlan, Surface};
use crate::config::OverlayStyle;
use crate::crop::CropRect;
use crate::decode::DecodedImage;
use crate::Rotation;

/// Main + overlay surfaces held in memory.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    source: Option<RgbaImage>,
    main: RgbaImage,
    overlay: RgbaImage,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSurface {
    /// Create an empty 0x0 surface with no source image.
    pub fn new() -> Self {
        Self {
            source: None,
            main: RgbaImage::new(0, 0),
            overlay: RgbaImage::new(0, 0),
        }
    }

    /// The visible pixels.
    pub fn main(&self) -> &RgbaImage {
        &self.main
    }

    /// The crop preview layer.
    pub fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    fn plot(&mut self, x: i64, y: i64, step: usize, dash: usize, color: Rgba<u8>) {
        if dash > 0 && (step / dash) % 2 == 1 {
            return;
        }
        let (width, height) = self.overlay.dimensions();
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return;
        }
        self.overlay.put_pixel(x as u32, y as u32, color);
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.main.dimensions()
    }

    fn upload(&mut self, image: &DecodedImage) {
        self.source = image.to_rgba_image();
    }

    fn draw(&mut self, plan: &RenderPlan) {
        let Some(source) = &self.source else {
            return;
        };

        // Fast path: target size matches, skip resampling
        let mut frame = if source.dimensions() == (plan.draw_width, plan.draw_height) {
            source.clone()
        } else {
            imageops::resize(source, plan.draw_width, plan.draw_height, FilterType::Triangle)
        };

        // Flip in image space, then rotate the frame
        if plan.flips_horizontal() {
            imageops::flip_horizontal_in_place(&mut frame);
        }
        if plan.flips_vertical() {
            imageops::flip_vertical_in_place(&mut frame);
        }
        let mut frame = match plan.rotation {
            Rotation::Deg0 => frame,
            Rotation::Deg90 => imageops::rotate90(&frame),
            Rotation::Deg180 => {
                imageops::rotate180_in_place(&mut frame);
                frame
            }
            Rotation::Deg270 => imageops::rotate270(&frame),
        };

        plan.filter.apply(&mut frame);

        debug_assert_eq!(frame.dimensions(), (plan.canvas_width, plan.canvas_height));
        self.main = frame;
        self.overlay = RgbaImage::new(plan.canvas_width, plan.canvas_height);
    }

    fn clear_overlay(&mut self) {
        let (width, height) = self.main.dimensions();
        self.overlay = RgbaImage::new(width, height);
    }

    fn stroke_overlay(&mut self, rect: CropRect, style: &OverlayStyle, dashed: bool) {
        let rect = rect.normalized();
        if rect.is_empty() {
            return;
        }

        let color = Rgba(style.color);
        let dash = if dashed { style.dash.max(1) as usize } else { 0 };
        let (width, height) = self.overlay.dimensions();
        let (max_x, max_y) = (i64::from(width) - 1, i64::from(height) - 1);

        for inset in 0..i64::from(style.line_width.max(1)) {
            let x0 = i64::from(rect.x) + inset;
            let y0 = i64::from(rect.y) + inset;
            let x1 = i64::from(rect.x) + i64::from(rect.w) - 1 - inset;
            let y1 = i64::from(rect.y) + i64::from(rect.h) - 1 - inset;
            if x0 > x1 || y0 > y1 {
                break;
            }

            // Only walk the visible span; the dash phase stays anchored at x0/y0
            for x in x0.max(0)..=x1.min(max_x) {
                let step = (x - x0) as usize;
                self.plot(x, y0, step, dash, color);
                self.plot(x, y1, step, dash, color);
            }
            for y in y0.max(0)..=y1.min(max_y) {
                let step = (y - y0) as usize;
                self.plot(x0, y, step, dash, color);
                self.plot(x1, y, step, dash, color);
            }
        }
    }

    fn read_pixels(&self) -> Option<DecodedImage> {
        let (width, height) = self.main.dimensions();
        if width == 0 || height == 0 {
            return None;
        }
        Some(DecodedImage::from_rgba_image(self.main.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{plan_render, render};
    use crate::TransformRecord;

    /// 2x1 image: red on the left, blue on the right.
    fn red_blue() -> DecodedImage {
        DecodedImage::new(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255])
    }

    fn surface_with(image: &DecodedImage) -> RasterSurface {
        let mut surface = RasterSurface::new();
        surface.upload(image);
        surface
    }

    fn record_for(image: &DecodedImage) -> TransformRecord {
        let mut record = TransformRecord::new();
        record.set_size(image.width, image.height);
        record
    }

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_identity_draw_copies_source() {
        let img = red_blue();
        let mut surface = surface_with(&img);
        render(&mut surface, Some(&img), &record_for(&img)).unwrap();

        assert_eq!(surface.read_pixels(), Some(img));
    }

    #[test]
    fn test_draw_without_upload_is_noop() {
        let img = red_blue();
        let mut surface = RasterSurface::new();
        let plan = plan_render(Some(&img), &record_for(&img)).unwrap();
        surface.draw(&plan);
        assert_eq!(surface.size(), (0, 0));
        assert!(surface.read_pixels().is_none());
    }

    #[test]
    fn test_rotate_90_is_clockwise() {
        let img = red_blue();
        let mut surface = surface_with(&img);
        let mut record = record_for(&img);
        record.rotation = Rotation::Deg90;
        render(&mut surface, Some(&img), &record);

        // Left edge ends up on top after a clockwise quarter turn
        assert_eq!(surface.size(), (1, 2));
        assert_eq!(*surface.main().get_pixel(0, 0), RED);
        assert_eq!(*surface.main().get_pixel(0, 1), BLUE);
    }

    #[test]
    fn test_flip_horizontal() {
        let img = red_blue();
        let mut surface = surface_with(&img);
        let mut record = record_for(&img);
        record.flip_horizontal = true;
        render(&mut surface, Some(&img), &record);

        assert_eq!(*surface.main().get_pixel(0, 0), BLUE);
        assert_eq!(*surface.main().get_pixel(1, 0), RED);
    }

    #[test]
    fn test_flip_then_rotate_composes() {
        let img = red_blue();
        let mut surface = surface_with(&img);
        let mut record = record_for(&img);
        record.flip_horizontal = true;
        record.rotation = Rotation::Deg90;
        render(&mut surface, Some(&img), &record);

        assert_eq!(surface.size(), (1, 2));
        assert_eq!(*surface.main().get_pixel(0, 0), BLUE);
        assert_eq!(*surface.main().get_pixel(0, 1), RED);
    }

    #[test]
    fn test_draw_scales_to_target() {
        let img = DecodedImage::new(2, 2, [90, 90, 90, 255].repeat(4));
        let mut surface = surface_with(&img);
        let mut record = record_for(&img);
        record.set_size(6, 4);
        render(&mut surface, Some(&img), &record);

        assert_eq!(surface.size(), (6, 4));
        // Uniform source stays uniform, up to resampling rounding
        assert!(surface
            .main()
            .pixels()
            .all(|p| p[0].abs_diff(90) <= 1 && p[3].abs_diff(255) <= 1));
    }

    #[test]
    fn test_draw_resets_overlay() {
        let img = red_blue();
        let mut surface = surface_with(&img);
        let record = record_for(&img);
        render(&mut surface, Some(&img), &record);
        surface.stroke_overlay(CropRect::new(0, 0, 2, 1), &OverlayStyle::default(), false);
        assert!(surface.overlay().pixels().any(|p| p[3] > 0));

        render(&mut surface, Some(&img), &record);
        assert_eq!(surface.overlay().dimensions(), (2, 1));
        assert!(surface.overlay().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_stroke_overlay_outline() {
        let img = DecodedImage::transparent(20, 20);
        let mut surface = surface_with(&img);
        render(&mut surface, Some(&img), &record_for(&img));

        let style = OverlayStyle::default();
        surface.stroke_overlay(CropRect::new(12, 12, -10, -10), &style, false);

        let overlay = surface.overlay();
        assert_eq!(*overlay.get_pixel(2, 2), RED);
        assert_eq!(*overlay.get_pixel(11, 11), RED);
        assert_eq!(*overlay.get_pixel(6, 2), RED);
        // Interior untouched
        assert_eq!(overlay.get_pixel(6, 6)[3], 0);
    }

    #[test]
    fn test_stroke_overlay_dashed_has_gaps() {
        let img = DecodedImage::transparent(30, 30);
        let mut surface = surface_with(&img);
        render(&mut surface, Some(&img), &record_for(&img));

        let style = OverlayStyle::default();
        surface.stroke_overlay(CropRect::new(0, 0, 24, 24), &style, true);

        let overlay = surface.overlay();
        // dash of 6: steps 0..6 drawn, 6..12 skipped
        assert_eq!(*overlay.get_pixel(5, 0), RED);
        assert_eq!(overlay.get_pixel(6, 0)[3], 0);
        assert_eq!(*overlay.get_pixel(12, 0), RED);
    }

    #[test]
    fn test_clear_overlay() {
        let img = DecodedImage::transparent(5, 5);
        let mut surface = surface_with(&img);
        render(&mut surface, Some(&img), &record_for(&img));
        surface.stroke_overlay(CropRect::new(0, 0, 5, 5), &OverlayStyle::default(), false);

        surface.clear_overlay();
        assert!(surface.overlay().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_stroke_clips_to_overlay() {
        let img = DecodedImage::transparent(4, 4);
        let mut surface = surface_with(&img);
        render(&mut surface, Some(&img), &record_for(&img));

        // Mostly off-canvas; must not panic
        surface.stroke_overlay(CropRect::new(-10, -10, 100, 100), &OverlayStyle::default(), true);
        assert_eq!(surface.overlay().dimensions(), (4, 4));
    }

    #[test]
    fn test_stroke_huge_rect_only_draws_visible_edges() {
        let img = DecodedImage::transparent(10, 10);
        let mut surface = surface_with(&img);
        render(&mut surface, Some(&img), &record_for(&img));

        // Walking the full rectangle would take billions of steps
        let style = OverlayStyle::default();
        surface.stroke_overlay(CropRect::new(0, 0, i32::MAX, i32::MAX), &style, false);

        let overlay = surface.overlay();
        assert_eq!(*overlay.get_pixel(9, 0), RED);
        assert_eq!(*overlay.get_pixel(0, 9), RED);
        // Far edges are off-canvas
        assert_eq!(overlay.get_pixel(9, 9)[3], 0);
    }

    #[test]
    fn test_stroke_clipped_dash_keeps_phase() {
        let img = DecodedImage::transparent(10, 10);
        let mut surface = surface_with(&img);
        render(&mut surface, Some(&img), &record_for(&img));

        // Left edge at x = -4: steps 0..6 cover x -4..=1, gap covers 2..=7
        surface.stroke_overlay(CropRect::new(-4, 0, 20, 8), &OverlayStyle::default(), true);

        let overlay = surface.overlay();
        assert_eq!(*overlay.get_pixel(1, 0), RED);
        assert_eq!(overlay.get_pixel(2, 0)[3], 0);
        assert_eq!(*overlay.get_pixel(8, 0), RED);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::render::render;
    use crate::TransformRecord;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = DecodedImage> {
        (1u32..=12, 1u32..=12).prop_flat_map(|(w, h)| {
            let len = (w * h * 4) as usize;
            prop::collection::vec(any::<u8>(), len..=len)
                .prop_map(move |pixels| DecodedImage::new(w, h, pixels))
        })
    }

    fn draw(image: &DecodedImage, record: &TransformRecord) -> Option<DecodedImage> {
        let mut surface = RasterSurface::new();
        surface.upload(image);
        render(&mut surface, Some(image), record);
        surface.read_pixels()
    }

    proptest! {
        /// Property: toggling grayscale twice renders the same pixels.
        #[test]
        fn prop_grayscale_twice_is_identity(
            image in image_strategy(),
            brightness in 0u32..=200,
        ) {
            let mut record = TransformRecord::new();
            record.set_size(image.width, image.height);
            record.brightness = brightness;
            let before = draw(&image, &record);

            record.grayscale = !record.grayscale;
            record.grayscale = !record.grayscale;
            prop_assert_eq!(draw(&image, &record), before);
        }

        /// Property: the drawn surface always has the planned canvas size.
        #[test]
        fn prop_surface_matches_canvas_size(
            image in image_strategy(),
            width in 1u32..=16,
            height in 1u32..=16,
            degrees in prop_oneof![Just(0i64), Just(90), Just(180), Just(270)],
        ) {
            let mut record = TransformRecord::new();
            record.set_size(width, height);
            record.rotation = Rotation::from_degrees(degrees).unwrap();

            let pixels = draw(&image, &record).unwrap();
            prop_assert_eq!(pixels.dimensions(), record.canvas_size());
        }

        /// Property: flipping both axes equals a half turn.
        #[test]
        fn prop_double_flip_is_half_turn(image in image_strategy()) {
            let mut flipped = TransformRecord::new();
            flipped.set_size(image.width, image.height);
            let mut turned = flipped.clone();

            flipped.flip_horizontal = true;
            flipped.flip_vertical = true;
            turned.rotation = Rotation::Deg180;

            prop_assert_eq!(draw(&image, &flipped), draw(&image, &turned));
        }
    }
}
