//! Retouch Core - Image editor session library
//!
//! This crate provides the host-independent half of the Retouch editor:
//! the transform record, render planning, the crop tool, control
//! validation, and image decode/encode. A drawing host (the browser canvas
//! in `retouch-wasm`, or the software [`render::RasterSurface`]) executes
//! the render plans.

pub mod config;
pub mod controls;
pub mod crop;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod render;

pub use config::{EditorConfig, OverlayStyle};
pub use controls::{Command, ControlError};
pub use crop::{CropRect, CropState, CropTool};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use editor::{EditorError, EditorSession, Outcome};
pub use encode::{EncodeError, ExportFormat, ExportedFile};
pub use render::{plan_render, FilterChain, RasterSurface, RenderPlan, Surface};

use serde::{Deserialize, Serialize};

/// Quarter-turn rotation applied when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Map a whole number of degrees onto a quarter turn.
    ///
    /// Angles are normalized modulo 360 first, so `-90` and `450` are both
    /// accepted. Returns `None` for angles that are not a multiple of 90.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Clockwise angle in degrees.
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Clockwise angle in radians.
    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// One of the three percentage sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Adjustment {
    Brightness,
    Contrast,
    Saturation,
}

/// Neutral value for every percentage adjustment.
pub const NEUTRAL_PERCENT: u32 = 100;

/// Current geometric and photometric edit parameters.
///
/// One record lives for the whole session and is mutated in place by every
/// control. `width`/`height` are the intended display size of the current
/// image buffer, before rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRecord {
    /// Target width in pixels (0 until an image is loaded)
    pub width: u32,
    /// Target height in pixels (0 until an image is loaded)
    pub height: u32,
    pub rotation: Rotation,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Brightness percentage (100 = unchanged)
    pub brightness: u32,
    /// Contrast percentage (100 = unchanged)
    pub contrast: u32,
    /// Saturation percentage (100 = unchanged)
    pub saturation: u32,
    pub grayscale: bool,
    pub sepia: bool,
}

impl Default for TransformRecord {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            rotation: Rotation::Deg0,
            flip_horizontal: false,
            flip_vertical: false,
            brightness: NEUTRAL_PERCENT,
            contrast: NEUTRAL_PERCENT,
            saturation: NEUTRAL_PERCENT,
            grayscale: false,
            sepia: false,
        }
    }
}

impl TransformRecord {
    /// Create a record with zero size and neutral adjustments
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target size, e.g. after a load, crop or resize.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Write one of the percentage adjustments.
    pub fn set_adjustment(&mut self, which: Adjustment, percent: u32) {
        match which {
            Adjustment::Brightness => self.brightness = percent,
            Adjustment::Contrast => self.contrast = percent,
            Adjustment::Saturation => self.saturation = percent,
        }
    }

    /// Size of the drawing surface once rotation is taken into account.
    pub fn canvas_size(&self) -> (u32, u32) {
        if self.rotation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Check if both target dimensions are positive
    pub fn has_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_record_default() {
        let record = TransformRecord::new();
        assert_eq!(record.width, 0);
        assert_eq!(record.height, 0);
        assert_eq!(record.rotation, Rotation::Deg0);
        assert_eq!(record.brightness, 100);
        assert_eq!(record.contrast, 100);
        assert_eq!(record.saturation, 100);
        assert!(!record.grayscale && !record.sepia);
        assert!(!record.has_size());
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(180), Some(Rotation::Deg180));
        assert_eq!(Rotation::from_degrees(270), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(360), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(45), None);
        assert_eq!(Rotation::from_degrees(1), None);
    }

    #[test]
    fn test_rotation_radians() {
        assert_eq!(Rotation::Deg0.radians(), 0.0);
        assert_eq!(Rotation::Deg90.radians(), std::f64::consts::FRAC_PI_2);
        assert_eq!(Rotation::Deg180.radians(), std::f64::consts::PI);
    }

    #[test]
    fn test_canvas_size_swaps_for_quarter_turns() {
        let mut record = TransformRecord::new();
        record.set_size(100, 50);

        record.rotation = Rotation::Deg0;
        assert_eq!(record.canvas_size(), (100, 50));
        record.rotation = Rotation::Deg90;
        assert_eq!(record.canvas_size(), (50, 100));
        record.rotation = Rotation::Deg180;
        assert_eq!(record.canvas_size(), (100, 50));
        record.rotation = Rotation::Deg270;
        assert_eq!(record.canvas_size(), (50, 100));
    }

    #[test]
    fn test_adjustment_accessors() {
        let mut record = TransformRecord::new();
        record.set_adjustment(Adjustment::Contrast, 40);
        assert_eq!(record.contrast, 40);
        assert_eq!(record.brightness, 100);
        record.set_adjustment(Adjustment::Saturation, 0);
        assert_eq!(record.saturation, 0);
    }
}
