//! Crop tool: pointer-driven rectangle selection and the crop itself.
//!
//! # States
//!
//! ```text
//! Idle --arm--> Armed --down--> Dragging --up--> Staged --confirm--> Idle
//!                 ^                |  ^             |
//!                 |                +--+ move        +--down--> Dragging
//!                 +------------- cancel (any state) -> Idle
//! ```
//!
//! Rectangles live in canvas pixel space. While dragging, width and height
//! are signed so the selection can grow in any direction from the anchor;
//! they are normalized before the crop is applied.

use serde::{Deserialize, Serialize};

use crate::decode::{DecodedImage, CHANNELS};

/// A selection rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    /// Signed width; negative when dragged leftwards
    pub w: i32,
    /// Signed height; negative when dragged upwards
    pub h: i32,
}

impl CropRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Same area with a positive width/height and the origin at the
    /// top-left corner.
    pub fn normalized(self) -> Self {
        let (x, w) = if self.w < 0 {
            (self.x.saturating_add(self.w), self.w.saturating_neg())
        } else {
            (self.x, self.w)
        };
        let (y, h) = if self.h < 0 {
            (self.y.saturating_add(self.h), self.h.saturating_neg())
        } else {
            (self.y, self.h)
        };
        Self { x, y, w, h }
    }

    /// Absolute size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.w.unsigned_abs(), self.h.unsigned_abs())
    }

    /// Check if the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Where the crop tool is in its pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropState {
    /// Crop mode off
    #[default]
    Idle,
    /// Crop mode on, waiting for a pointer-down
    Armed,
    /// Pointer held; the rectangle follows the pointer
    Dragging { anchor: (i32, i32), rect: CropRect },
    /// Pointer released; the rectangle waits for confirmation
    Staged(CropRect),
}

/// Pointer state machine building a [`CropRect`].
#[derive(Debug, Clone, Default)]
pub struct CropTool {
    state: CropState,
    /// Canvas size seen by the last pointer-down
    bounds: (u32, u32),
}

impl CropTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CropState {
        self.state
    }

    /// Check if crop mode is on
    pub fn is_active(&self) -> bool {
        self.state != CropState::Idle
    }

    /// The rectangle being dragged or waiting for confirmation.
    pub fn current_rect(&self) -> Option<CropRect> {
        match self.state {
            CropState::Dragging { rect, .. } | CropState::Staged(rect) => Some(rect),
            CropState::Idle | CropState::Armed => None,
        }
    }

    /// Turn crop mode on. A staged rectangle is discarded.
    pub fn arm(&mut self) {
        self.state = CropState::Armed;
    }

    /// Leave crop mode from any state.
    pub fn cancel(&mut self) {
        self.state = CropState::Idle;
    }

    /// Start a new rectangle at `(x, y)` if crop mode is on and the point
    /// lies on a `bounds`-sized canvas. Returns the new, zero-size rectangle.
    pub fn pointer_down(&mut self, x: f64, y: f64, bounds: (u32, u32)) -> Option<CropRect> {
        if !self.is_active() {
            return None;
        }
        let (px, py) = (to_pixel(x), to_pixel(y));
        let inside = px >= 0
            && py >= 0
            && i64::from(px) < i64::from(bounds.0)
            && i64::from(py) < i64::from(bounds.1);
        if !inside {
            return None;
        }

        let rect = CropRect::new(px, py, 0, 0);
        self.bounds = bounds;
        self.state = CropState::Dragging {
            anchor: (px, py),
            rect,
        };
        Some(rect)
    }

    /// Stretch the rectangle to `(x, y)` while dragging.
    ///
    /// The point is clamped to the canvas the drag started on, so the
    /// rectangle never extends past its edges.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<CropRect> {
        let CropState::Dragging { anchor, .. } = self.state else {
            return None;
        };
        let px = clamp_to_edge(to_pixel(x), self.bounds.0);
        let py = clamp_to_edge(to_pixel(y), self.bounds.1);
        let rect = CropRect::new(anchor.0, anchor.1, px - anchor.0, py - anchor.1);
        self.state = CropState::Dragging { anchor, rect };
        Some(rect)
    }

    /// Stop dragging. The rectangle stays staged until confirmed.
    pub fn pointer_up(&mut self) -> Option<CropRect> {
        let CropState::Dragging { rect, .. } = self.state else {
            return None;
        };
        self.state = CropState::Staged(rect);
        Some(rect)
    }

    /// Take the staged rectangle, normalized, and leave crop mode.
    ///
    /// Returns `None` and keeps the current state if there is nothing to
    /// crop (no rectangle, or one with zero area).
    pub fn confirm(&mut self) -> Option<CropRect> {
        let rect = self.current_rect().filter(|r| !r.is_empty())?;
        self.state = CropState::Idle;
        Some(rect.normalized())
    }
}

/// Copy the `rect` region of `image` into a new image of exactly the
/// rectangle's size.
///
/// The rectangle is normalized first. Any part of it outside the source is
/// left transparent. Returns `None` for an empty rectangle or one whose
/// buffer size does not fit in memory.
pub fn crop_image(image: &DecodedImage, rect: CropRect) -> Option<DecodedImage> {
    let rect = rect.normalized();
    if rect.is_empty() {
        return None;
    }

    let (out_width, out_height) = rect.size();
    let len = (out_width as usize)
        .checked_mul(out_height as usize)?
        .checked_mul(CHANNELS)?;
    let mut output = Vec::new();
    output.try_reserve_exact(len).ok()?;
    output.resize(len, 0u8);

    // Intersection with the source, in source coordinates
    let left = i64::from(rect.x).max(0);
    let top = i64::from(rect.y).max(0);
    let right = (i64::from(rect.x) + i64::from(rect.w)).min(i64::from(image.width));
    let bottom = (i64::from(rect.y) + i64::from(rect.h)).min(i64::from(image.height));

    if left < right && top < bottom {
        let row_len = (right - left) as usize * CHANNELS;
        let dst_x = (left - i64::from(rect.x)) as usize;

        // Copy pixel data row by row
        for src_y in top..bottom {
            let dst_y = (src_y - i64::from(rect.y)) as usize;
            let src_start = (src_y as usize * image.width as usize + left as usize) * CHANNELS;
            let dst_start = (dst_y * out_width as usize + dst_x) * CHANNELS;

            let src_row = image.pixels.get(src_start..src_start + row_len)?;
            output[dst_start..dst_start + row_len].copy_from_slice(src_row);
        }
    }

    Some(DecodedImage::new(out_width, out_height, output))
}

/// Clamp a coordinate to `0..=edge`.
#[inline]
fn clamp_to_edge(v: i32, edge: u32) -> i32 {
    v.clamp(0, i32::try_from(edge).unwrap_or(i32::MAX))
}

#[inline]
fn to_pixel(v: f64) -> i32 {
    // `as` saturates on overflow and maps NaN to 0
    v.floor() as i32
}
