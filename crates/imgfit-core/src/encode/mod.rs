//! Encoding primitives for imgfit.
//!
//! This module provides functionality for:
//! - Encoding source images to PNG (lossless, keeps alpha)
//! - Encoding RGB pixels to JPEG with configurable quality
//! - Wrapping encoded bytes into base64 data URIs
//!
//! The adaptive ladder in [`crate::encoder`] is built from these pieces; they
//! are public so callers can produce a fixed-format payload directly.
//!
//! # Examples
//!
//! ```ignore
//! use imgfit_core::encode::{encode_jpeg, DataUri, PayloadFormat};
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg = encode_jpeg(&pixels, 100, 100, 70).unwrap();
//! let uri = DataUri::new(PayloadFormat::Jpeg, &jpeg);
//! println!("{} chars", uri.payload_len());
//! ```

mod data_uri;
mod error;
mod jpeg;
mod png;

pub use data_uri::{base64_len, DataUri, PayloadFormat};
pub use error::EncodeError;
pub use jpeg::encode_jpeg;
pub use png::encode_png;
