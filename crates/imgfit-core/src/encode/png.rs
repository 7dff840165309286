//! Lossless PNG encoding for the ladder's fast path.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::decode::{ColorMode, SourceImage};

/// Encode a source image to PNG bytes, keeping its color mode and alpha.
pub fn encode_png(image: &SourceImage) -> Result<Vec<u8>, EncodeError> {
    let color = match image.mode() {
        ColorMode::Gray => ExtendedColorType::L8,
        ColorMode::GrayAlpha => ExtendedColorType::La8,
        ColorMode::Rgb => ExtendedColorType::Rgb8,
        ColorMode::Rgba => ExtendedColorType::Rgba8,
    };

    let mut buffer = Cursor::new(Vec::new());

    PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, PngFilter::Adaptive)
        .write_image(image.pixels(), image.width(), image.height(), color)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "PNG",
            reason: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}
