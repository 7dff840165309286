//! Core types for image decoding.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Image data is empty")]
    Empty,

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Raw pixel buffer length doesn't match the declared dimensions and mode.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Pixel layout of a [`SourceImage`]. Always 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Single luminance channel.
    Gray,
    /// Luminance plus alpha.
    GrayAlpha,
    /// Opaque red, green, blue.
    Rgb,
    /// Red, green, blue plus alpha.
    Rgba,
}

impl ColorMode {
    /// Number of interleaved bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Gray => 1,
            ColorMode::GrayAlpha => 2,
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }

    /// Returns true if the mode carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::GrayAlpha | ColorMode::Rgba)
    }
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An in-memory raster image, the input to every encode call.
///
/// Pixels are interleaved 8-bit channels in row-major order, laid out
/// according to [`ColorMode`]. Higher bit depths are reduced to 8 bits when
/// the image is built from a [`DynamicImage`].
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    mode: ColorMode,
    pixels: Vec<u8>,
}

impl SourceImage {
    /// Create a SourceImage from parts already known to be consistent.
    pub(crate) fn new(width: u32, height: u32, mode: ColorMode, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * mode.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            mode,
            pixels,
        }
    }

    /// Build a source image from a raw interleaved pixel buffer.
    ///
    /// This is the entry point for chart renderers and other producers that
    /// already hold pixels in memory.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidDimensions` for a zero width or height and
    /// `DecodeError::InvalidPixelData` if the buffer length doesn't match
    /// `width * height * mode.channels()`.
    pub fn from_raw(
        width: u32,
        height: u32,
        mode: ColorMode,
        pixels: Vec<u8>,
    ) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions { width, height });
        }

        let expected = (width as usize) * (height as usize) * mode.channels();
        if pixels.len() != expected {
            return Err(DecodeError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            mode,
            pixels,
        })
    }

    /// Build a source image from an `image` crate buffer.
    ///
    /// 16-bit and float buffers are reduced to their 8-bit equivalent,
    /// keeping alpha when present.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (mode, pixels) = match img {
            DynamicImage::ImageLuma8(buf) => (ColorMode::Gray, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (ColorMode::GrayAlpha, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (ColorMode::Rgb, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (ColorMode::Rgba, buf.into_raw()),
            other @ DynamicImage::ImageLuma16(_) => (ColorMode::Gray, other.into_luma8().into_raw()),
            other @ DynamicImage::ImageLumaA16(_) => {
                (ColorMode::GrayAlpha, other.into_luma_alpha8().into_raw())
            }
            other if other.color().has_alpha() => (ColorMode::Rgba, other.into_rgba8().into_raw()),
            other => (ColorMode::Rgb, other.into_rgb8().into_raw()),
        };

        Self {
            width,
            height,
            mode,
            pixels,
        }
    }

    /// Convert to a `DynamicImage` for resizing and encoding.
    ///
    /// Note: This clones the pixel data.
    pub fn to_dynamic(&self) -> DynamicImage {
        let (w, h, px) = (self.width, self.height, self.pixels.clone());
        // Buffer length is checked on construction, so from_raw cannot fail.
        let img = match self.mode {
            ColorMode::Gray => image::GrayImage::from_raw(w, h, px).map(DynamicImage::ImageLuma8),
            ColorMode::GrayAlpha => {
                image::GrayAlphaImage::from_raw(w, h, px).map(DynamicImage::ImageLumaA8)
            }
            ColorMode::Rgb => image::RgbImage::from_raw(w, h, px).map(DynamicImage::ImageRgb8),
            ColorMode::Rgba => image::RgbaImage::from_raw(w, h, px).map(DynamicImage::ImageRgba8),
        };
        img.unwrap_or_else(|| DynamicImage::new(w, h, image::ColorType::Rgb8))
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Length of the longest side in pixels.
    pub fn longest_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Pixel layout of the buffer.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Raw interleaved pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image and return its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_default_filter_is_lanczos() {
        assert_eq!(FilterType::default(), FilterType::Lanczos3);
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_color_mode_channels() {
        assert_eq!(ColorMode::Gray.channels(), 1);
        assert_eq!(ColorMode::GrayAlpha.channels(), 2);
        assert_eq!(ColorMode::Rgb.channels(), 3);
        assert_eq!(ColorMode::Rgba.channels(), 4);
        assert!(ColorMode::GrayAlpha.has_alpha());
        assert!(!ColorMode::Rgb.has_alpha());
    }

    #[test]
    fn test_from_raw_valid() {
        let img = SourceImage::from_raw(4, 2, ColorMode::Rgba, vec![0u8; 4 * 2 * 4]).unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.longest_edge(), 4);
        assert_eq!(img.mode(), ColorMode::Rgba);
        assert_eq!(img.pixels().len(), 32);
    }

    #[test]
    fn test_from_raw_length_mismatch() {
        let result = SourceImage::from_raw(4, 2, ColorMode::Rgb, vec![0u8; 4 * 2 * 4]);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidPixelData {
                expected: 24,
                actual: 32
            })
        ));
    }

    #[test]
    fn test_from_raw_zero_dimensions() {
        let result = SourceImage::from_raw(0, 10, ColorMode::Gray, vec![]);
        assert!(matches!(result, Err(DecodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_dynamic_round_trip_keeps_mode() {
        let img = SourceImage::from_raw(3, 3, ColorMode::GrayAlpha, vec![7u8; 18]).unwrap();
        let back = SourceImage::from_dynamic(img.to_dynamic());
        assert_eq!(back, img);
    }

    #[test]
    fn test_from_dynamic_reduces_16_bit() {
        let buf = image::ImageBuffer::<image::Rgba<u16>, Vec<u16>>::from_pixel(
            2,
            2,
            image::Rgba([65535, 0, 0, 32768]),
        );
        let img = SourceImage::from_dynamic(DynamicImage::ImageRgba16(buf));
        assert_eq!(img.mode(), ColorMode::Rgba);
        assert_eq!(&img.pixels()[0..4], &[255, 0, 0, 128]);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::CorruptedFile("bad header".to_string());
        assert_eq!(err.to_string(), "Corrupted or incomplete image file: bad header");

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
