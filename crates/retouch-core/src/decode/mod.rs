//! Image decoding for Retouch.
//!
//! This module provides functionality for:
//! - Decoding uploaded image files (PNG, JPEG, GIF, WebP, BMP)
//! - Applying EXIF orientation the way browsers do on decode
//! - The RGBA `DecodedImage` buffer shared by the rest of the crate
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod load;
mod types;

pub use load::decode_image;
pub use types::{DecodeError, DecodedImage, Orientation, CHANNELS};
