//! imgfit Core - Size-bounded image data URIs
//!
//! This crate turns raster images (uploads, files on disk, rendered charts)
//! into `data:image/<format>;base64,<payload>` strings whose payload stays
//! under a character budget imposed by the consuming chat application. It
//! degrades format, quality and resolution only as far as needed.
//!
//! # Modules
//!
//! - `decode` - Decoding, EXIF orientation, raw buffers and resizing
//! - `flatten` - Alpha compositing onto white for lossy output
//! - `encode` - PNG/JPEG encoding and data URI assembly
//! - `config` - Ladder thresholds and validation
//! - `encoder` - The adaptive fallback ladder
//!
//! # Example
//!
//! ```ignore
//! use imgfit_core::{AdaptivePayloadEncoder, EncoderConfig};
//!
//! let encoder = AdaptivePayloadEncoder::new(EncoderConfig::default())?;
//! let bytes = std::fs::read("chart.png")?;
//! match encoder.encode_bytes(&bytes) {
//!     Ok(payload) => println!("{}", payload.data_uri().to_markdown("chart")),
//!     Err(err) if err.is_budget_exceeded() => println!("please provide a smaller image"),
//!     Err(err) => println!("{err}"),
//! }
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod encoder;
pub mod flatten;

pub use config::{ConfigError, EncoderConfig, DEFAULT_BUDGET_CHARS};
pub use decode::{decode_image, ColorMode, DecodeError, SourceImage};
pub use encode::{DataUri, EncodeError, PayloadFormat};
pub use encoder::{
    encode_data_uri, AdaptivePayloadEncoder, EncodedPayload, EncodingResult, FitError,
};
pub use flatten::flatten_to_rgb;
