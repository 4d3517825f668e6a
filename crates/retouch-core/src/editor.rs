//! The editor session: one image, one transform record, one surface.
//!
//! All state lives here and changes only through [`EditorSession::dispatch`].
//! Each command validates its input, updates the record, and re-renders
//! through the session's [`Surface`]. Rejected commands come back as
//! `Err` with the previous state untouched, so hosts can log them and move on.

use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::config::EditorConfig;
use crate::controls::{self, Command, ControlError};
use crate::crop::{crop_image, CropState, CropTool};
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{export_image, EncodeError, ExportFormat, ExportedFile};
use crate::render::{self, plan_render, RenderPlan, Surface};
use crate::TransformRecord;

/// Why a command was ignored.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Control(#[from] ControlError),

    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Export failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("No image loaded")]
    NoImage,

    #[error("Crop mode is not active")]
    NotCropping,

    #[error("Pointer is outside the canvas")]
    OutsideCanvas,

    #[error("No crop rectangle staged")]
    NothingStaged,
}

/// What a successful command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The main surface was redrawn
    Rendered,
    /// State changed but there was nothing to draw yet
    Updated,
    /// Only the overlay changed
    Overlay,
    /// Nothing changed
    Unchanged,
    /// A preset was picked; hosts should show these in the resize fields
    ResizeFields { width: u32, height: u32 },
}

/// A single-image editing session over a drawing host.
#[derive(Debug)]
pub struct EditorSession<S: Surface> {
    config: EditorConfig,
    surface: S,
    image: Option<DecodedImage>,
    record: TransformRecord,
    crop: CropTool,
}

impl<S: Surface> EditorSession<S> {
    /// Start a session with no image and a zero-size record.
    pub fn new(surface: S, config: EditorConfig) -> Self {
        Self {
            config,
            surface,
            image: None,
            record: TransformRecord::new(),
            crop: CropTool::new(),
        }
    }

    pub fn record(&self) -> &TransformRecord {
        &self.record
    }

    /// The current working image, before any transform.
    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn crop_state(&self) -> CropState {
        self.crop.state()
    }

    /// The plan the next render would execute.
    pub fn plan(&self) -> Option<RenderPlan> {
        plan_render(self.image.as_ref(), &self.record)
    }

    /// Apply one command.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, EditorError> {
        let name = command.name();
        let result = self.apply(command);
        match &result {
            Ok(outcome) => trace!("{}: {:?}", name, outcome),
            Err(e) => debug!("{} ignored: {}", name, e),
        }
        result
    }

    fn apply(&mut self, command: Command) -> Result<Outcome, EditorError> {
        match command {
            Command::Load(bytes) => self.load(&bytes),
            Command::ApplyResize { width, height } => {
                let max = self.config.max_dimension;
                let width = controls::parse_dimension(&width, max)?;
                let height = controls::parse_dimension(&height, max)?;
                self.record.set_size(width, height);
                Ok(self.render())
            }
            Command::SelectPreset(token) => self.select_preset(&token),
            Command::SetRotation(value) => {
                self.record.rotation = controls::parse_rotation(&value)?;
                Ok(self.render())
            }
            Command::FlipHorizontal => {
                self.record.flip_horizontal = !self.record.flip_horizontal;
                Ok(self.render())
            }
            Command::FlipVertical => {
                self.record.flip_vertical = !self.record.flip_vertical;
                Ok(self.render())
            }
            Command::SetAdjustment { which, value } => {
                let percent = controls::parse_percent(&value, self.config.max_adjustment)?;
                self.record.set_adjustment(which, percent);
                Ok(self.render())
            }
            Command::SetGrayscale(on) => {
                self.record.grayscale = on;
                Ok(self.render())
            }
            Command::SetSepia(on) => {
                self.record.sepia = on;
                Ok(self.render())
            }
            Command::StartCrop => {
                let had_rect = self.crop.current_rect().is_some();
                self.crop.arm();
                if had_rect {
                    self.surface.clear_overlay();
                    return Ok(Outcome::Overlay);
                }
                Ok(Outcome::Updated)
            }
            Command::CancelCrop => {
                self.crop.cancel();
                self.surface.clear_overlay();
                Ok(Outcome::Overlay)
            }
            Command::ApplyCrop => self.apply_crop(),
            Command::PointerDown { x, y } => {
                if !self.crop.is_active() {
                    return Err(EditorError::NotCropping);
                }
                self.crop
                    .pointer_down(x, y, self.surface.size())
                    .ok_or(EditorError::OutsideCanvas)?;
                self.surface.clear_overlay();
                Ok(Outcome::Overlay)
            }
            Command::PointerMove { x, y } => match self.crop.pointer_move(x, y) {
                Some(rect) => {
                    self.surface.clear_overlay();
                    self.surface.stroke_overlay(rect, &self.config.overlay, true);
                    Ok(Outcome::Overlay)
                }
                None => Ok(Outcome::Unchanged),
            },
            Command::PointerUp => match self.crop.pointer_up() {
                Some(rect) => {
                    self.surface.clear_overlay();
                    self.surface.stroke_overlay(rect, &self.config.overlay, false);
                    Ok(Outcome::Overlay)
                }
                None => Ok(Outcome::Unchanged),
            },
        }
    }

    fn load(&mut self, bytes: &[u8]) -> Result<Outcome, EditorError> {
        let image = decode_image(bytes).inspect_err(|e| warn!("upload rejected: {}", e))?;
        info!("loaded {}x{} image", image.width, image.height);
        self.replace_image(image);
        Ok(self.render())
    }

    fn select_preset(&mut self, token: &str) -> Result<Outcome, EditorError> {
        if token.trim().is_empty() {
            return Ok(Outcome::Unchanged);
        }
        let (width, height) = controls::parse_preset(token, self.config.max_dimension)?;
        if self.config.apply_preset_immediately {
            self.record.set_size(width, height);
            self.render();
        }
        Ok(Outcome::ResizeFields { width, height })
    }

    fn apply_crop(&mut self) -> Result<Outcome, EditorError> {
        if self.image.is_none() {
            return Err(EditorError::NoImage);
        }
        let rect = self.crop.confirm().ok_or(EditorError::NothingStaged)?;
        let cropped = self
            .image
            .as_ref()
            .and_then(|image| crop_image(image, rect))
            .ok_or(EditorError::NothingStaged)?;

        info!(
            "cropped to {}x{} at ({}, {})",
            cropped.width, cropped.height, rect.x, rect.y
        );
        self.replace_image(cropped);
        self.surface.clear_overlay();
        Ok(self.render())
    }

    /// Swap in a new working image and size the record to it.
    fn replace_image(&mut self, image: DecodedImage) {
        self.crop.cancel();
        self.surface.upload(&image);
        self.record.set_size(image.width, image.height);
        self.image = Some(image);
    }

    fn render(&mut self) -> Outcome {
        match render::render(&mut self.surface, self.image.as_ref(), &self.record) {
            Some(_) => Outcome::Rendered,
            None => Outcome::Updated,
        }
    }

    /// Encode the rendered surface. Failures produce an empty file.
    pub fn export(&self, format: ExportFormat) -> ExportedFile {
        match self.try_export(format) {
            Ok(file) => file,
            Err(e) => {
                warn!("export as {} produced no data: {}", format.mime_type(), e);
                ExportedFile::empty(format, &self.config.file_stem)
            }
        }
    }

    /// Encode the rendered surface, reporting why it could not be.
    pub fn try_export(&self, format: ExportFormat) -> Result<ExportedFile, EditorError> {
        let pixels = self.surface.read_pixels().ok_or(EditorError::NoImage)?;
        let file = export_image(
            &pixels,
            format,
            &self.config.file_stem,
            self.config.jpeg_quality,
        )?;
        info!("exported {} ({} bytes)", file.file_name, file.bytes.len());
        Ok(file)
    }

    /// [`export`](Self::export) by MIME type, e.g. `image/png`.
    pub fn export_mime(&self, mime: &str) -> Result<ExportedFile, EditorError> {
        let format = ExportFormat::from_mime(mime)
            .ok_or_else(|| ControlError::UnsupportedFormat(mime.to_string()))?;
        Ok(self.export(format))
    }
}
