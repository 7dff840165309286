//! Image resizing for the initial downscale and the halving ladder.
//!
//! All functions return new `SourceImage` instances without modifying the
//! input, keep the color mode of the source, and preserve aspect ratio.

use super::{DecodeError, FilterType, SourceImage};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target side is zero.
pub fn resize(
    image: &SourceImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<SourceImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let resized = image
        .to_dynamic()
        .resize_exact(width, height, filter.to_image_filter());

    Ok(SourceImage::from_dynamic(resized))
}

/// Resize an image so its longest edge is at most `max_edge`.
///
/// Images that already fit are returned unchanged; this never upscales.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if `max_edge` is zero.
pub fn resize_to_fit(
    image: &SourceImage,
    max_edge: u32,
    filter: FilterType,
) -> Result<SourceImage, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: max_edge,
            height: max_edge,
        });
    }

    let (src_width, src_height) = image.dimensions();
    if src_width <= max_edge && src_height <= max_edge {
        return Ok(image.clone());
    }

    let (new_width, new_height) = calculate_fit_dimensions(src_width, src_height, max_edge);
    resize(image, new_width, new_height, filter)
}

/// Halve both sides of an image (integer division, at least 1 pixel).
pub fn halve(image: &SourceImage, filter: FilterType) -> Result<SourceImage, DecodeError> {
    let (width, height) = halved_dimensions(image.width(), image.height());
    resize(image, width, height, filter)
}

/// Dimensions after one halving step.
pub fn halved_dimensions(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
