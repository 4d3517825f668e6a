//! Photometric filter chain.
//!
//! The chain is applied in a fixed order:
//! 1. Brightness
//! 2. Contrast
//! 3. Saturate
//! 4. Grayscale (0% or 100%)
//! 5. Sepia (0% or 100%)
//!
//! [`FilterChain::to_css`] is the production path: browser hosts hand it
//! straight to the canvas `filter` property and the browser does the
//! colour work.
//!
//! [`FilterChain::apply`] is a reference implementation for the software
//! [`RasterSurface`](super::RasterSurface), which backs headless export and
//! tests. It follows the matrices defined by CSS Filter Effects Module
//! Level 1, clamping to [0, 1] after every function, and is not meant to
//! match any particular browser bit for bit.

use std::fmt;

use crate::TransformRecord;

/// The per-render filter settings, snapshotted from a `TransformRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterChain {
    pub brightness: u32,
    pub contrast: u32,
    pub saturation: u32,
    pub grayscale: bool,
    pub sepia: bool,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::from_record(&TransformRecord::default())
    }
}

impl FilterChain {
    /// Snapshot the photometric half of a transform record.
    pub fn from_record(record: &TransformRecord) -> Self {
        Self {
            brightness: record.brightness,
            contrast: record.contrast,
            saturation: record.saturation,
            grayscale: record.grayscale,
            sepia: record.sepia,
        }
    }

    /// Check if the chain leaves every pixel unchanged
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// CSS `filter` value, e.g.
    /// `brightness(150%) contrast(100%) saturate(100%) grayscale(100%) sepia(0%)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// Apply the chain in place to RGBA pixel data. Alpha is untouched.
    ///
    /// Software reference for hosts without a canvas `filter`.
    pub fn apply(&self, pixels: &mut [u8]) {
        if self.is_identity() {
            return;
        }

        let brightness = percent(self.brightness);
        let contrast = percent(self.contrast);
        let saturate = saturate_matrix(percent(self.saturation));

        for chunk in pixels.chunks_exact_mut(4) {
            let mut rgb = [
                chunk[0] as f32 / 255.0,
                chunk[1] as f32 / 255.0,
                chunk[2] as f32 / 255.0,
            ];

            if self.brightness != 100 {
                rgb = rgb.map(|c| clamp01(c * brightness));
            }
            if self.contrast != 100 {
                rgb = rgb.map(|c| clamp01((c - 0.5) * contrast + 0.5));
            }
            if self.saturation != 100 {
                rgb = multiply(&saturate, rgb);
            }
            if self.grayscale {
                rgb = multiply(&GRAYSCALE, rgb);
            }
            if self.sepia {
                rgb = multiply(&SEPIA, rgb);
            }

            chunk[0] = to_u8(rgb[0]);
            chunk[1] = to_u8(rgb[1]);
            chunk[2] = to_u8(rgb[2]);
        }
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "brightness({}%) contrast({}%) saturate({}%) grayscale({}%) sepia({}%)",
            self.brightness,
            self.contrast,
            self.saturation,
            if self.grayscale { 100 } else { 0 },
            if self.sepia { 100 } else { 0 },
        )
    }
}

type Matrix = [[f32; 3]; 3];

/// `grayscale(100%)`
const GRAYSCALE: Matrix = [
    [0.2126, 0.7152, 0.0722],
    [0.2126, 0.7152, 0.0722],
    [0.2126, 0.7152, 0.0722],
];

/// `sepia(100%)`
const SEPIA: Matrix = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

#[inline]
fn percent(value: u32) -> f32 {
    value as f32 / 100.0
}

fn saturate_matrix(s: f32) -> Matrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

#[inline]
fn multiply(m: &Matrix, rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    [
        clamp01(m[0][0] * r + m[0][1] * g + m[0][2] * b),
        clamp01(m[1][0] * r + m[1][1] * g + m[1][2] * b),
        clamp01(m[2][0] * r + m[2][1] * g + m[2][2] * b),
    ]
}

#[inline]
fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round() as u8
}
