//! Image decoding for imgfit.
//!
//! This module provides functionality for:
//! - Decoding uploaded or on-disk image files (PNG, JPEG, GIF, WebP, BMP)
//! - Applying EXIF orientation so photos are upright before encoding
//! - Building source images from raw pixel buffers (chart renderers)
//! - Aspect-preserving resizing for the encoder's downscale steps
//!
//! # Examples
//!
//! ```ignore
//! use imgfit_core::decode::{decode_image, resize_to_fit, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let preview = resize_to_fit(&image, 800, FilterType::Lanczos3).unwrap();
//! println!("{}x{}", preview.width(), preview.height());
//! ```

mod container;
mod resize;
mod types;

pub use container::decode_image;
pub use resize::{halve, halved_dimensions, resize, resize_to_fit};
pub use types::{ColorMode, DecodeError, FilterType, Orientation, SourceImage};
