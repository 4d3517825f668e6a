//! Editor commands and input validation at the control boundary.
//!
//! Every UI control maps to one [`Command`]. Raw control values arrive as
//! strings (form fields, select options, slider values) and are validated
//! here before anything touches the transform record.

use thiserror::Error;

use crate::{Adjustment, Rotation};

/// Errors raised for control input that is rejected.
///
/// Rejected input is never fatal: the session keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    /// Width/height is not a positive integer within the size limit
    #[error("Invalid dimension: {0:?}")]
    InvalidDimension(String),

    /// Preset token is not of the form `WxH`
    #[error("Malformed preset size: {0:?}")]
    MalformedPreset(String),

    /// Rotation is not a whole multiple of 90 degrees
    #[error("Invalid rotation: {0:?}")]
    InvalidRotation(String),

    /// Adjustment value is not a number
    #[error("Invalid adjustment value: {0:?}")]
    InvalidAdjustment(String),

    /// Export MIME type is not PNG or JPEG
    #[error("Unsupported export format: {0:?}")]
    UnsupportedFormat(String),
}

/// One user action, dispatched into an `EditorSession`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Decode an uploaded file and make it the working image
    Load(Vec<u8>),
    /// Resize to the values in the width/height fields
    ApplyResize { width: String, height: String },
    /// Pick a `WxH` preset
    SelectPreset(String),
    /// Rotation selector changed
    SetRotation(String),
    FlipHorizontal,
    FlipVertical,
    /// Slider moved
    SetAdjustment { which: Adjustment, value: String },
    SetGrayscale(bool),
    SetSepia(bool),
    StartCrop,
    CancelCrop,
    ApplyCrop,
    /// Pointer pressed, in canvas-local coordinates
    PointerDown { x: f64, y: f64 },
    /// Pointer moved, in canvas-local coordinates
    PointerMove { x: f64, y: f64 },
    PointerUp,
}

impl Command {
    /// Short name for log lines; never includes file contents.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Load(_) => "load",
            Command::ApplyResize { .. } => "apply-resize",
            Command::SelectPreset(_) => "select-preset",
            Command::SetRotation(_) => "set-rotation",
            Command::FlipHorizontal => "flip-horizontal",
            Command::FlipVertical => "flip-vertical",
            Command::SetAdjustment { .. } => "set-adjustment",
            Command::SetGrayscale(_) => "set-grayscale",
            Command::SetSepia(_) => "set-sepia",
            Command::StartCrop => "start-crop",
            Command::CancelCrop => "cancel-crop",
            Command::ApplyCrop => "apply-crop",
            Command::PointerDown { .. } => "pointer-down",
            Command::PointerMove { .. } => "pointer-move",
            Command::PointerUp => "pointer-up",
        }
    }
}

/// Parse a width or height field. Must be a positive integer no larger
/// than `max`.
pub fn parse_dimension(value: &str, max: u32) -> Result<u32, ControlError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|&v| v > 0 && v <= max)
        .ok_or_else(|| ControlError::InvalidDimension(value.to_string()))
}

/// Parse a `WxH` preset token such as `1920x1080`.
pub fn parse_preset(token: &str, max: u32) -> Result<(u32, u32), ControlError> {
    let malformed = || ControlError::MalformedPreset(token.to_string());
    let (w, h) = token
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(malformed)?;
    let width = parse_dimension(w, u32::MAX).map_err(|_| malformed())?;
    let height = parse_dimension(h, u32::MAX).map_err(|_| malformed())?;
    if width > max || height > max {
        return Err(ControlError::InvalidDimension(token.to_string()));
    }
    Ok((width, height))
}

/// Parse a rotation in whole degrees, normalized to a quarter turn.
pub fn parse_rotation(value: &str) -> Result<Rotation, ControlError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(Rotation::from_degrees)
        .ok_or_else(|| ControlError::InvalidRotation(value.to_string()))
}

/// Parse a slider percentage, rounded and clamped to `0..=max`.
pub fn parse_percent(value: &str, max: u32) -> Result<u32, ControlError> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ControlError::InvalidAdjustment(value.to_string()))?;
    Ok(parsed.round().clamp(0.0, f64::from(max)) as u32)
}
