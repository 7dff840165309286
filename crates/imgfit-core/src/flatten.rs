//! Flattening onto an opaque background.
//!
//! JPEG has no alpha channel, so before any lossy re-encode the image is
//! composited onto solid white. Each channel is blended with the pixel's
//! alpha as weight:
//!
//! ```text
//! out = (c * a + 255 * (255 - a)) / 255
//! ```
//!
//! Fully transparent pixels therefore become white, never black.

use crate::decode::{ColorMode, SourceImage};

/// Background color used for flattening.
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Convert any source image to opaque RGB, compositing alpha onto white.
///
/// Grayscale-with-alpha is expanded to RGBA first so the compositing step
/// always reads an explicit alpha channel. Opaque modes are converted
/// without blending.
pub fn flatten_to_rgb(image: &SourceImage) -> SourceImage {
    flatten_onto(image, WHITE)
}

/// Convert any source image to opaque RGB, compositing alpha onto `background`.
pub fn flatten_onto(image: &SourceImage, background: [u8; 3]) -> SourceImage {
    let (width, height) = image.dimensions();

    let pixels = match image.mode() {
        ColorMode::Rgb => image.pixels().to_vec(),
        ColorMode::Gray => image.pixels().iter().flat_map(|&l| [l, l, l]).collect(),
        ColorMode::GrayAlpha => composite_rgba(&expand_gray_alpha(image.pixels()), background),
        ColorMode::Rgba => composite_rgba(image.pixels(), background),
    };

    SourceImage::new(width, height, ColorMode::Rgb, pixels)
}

/// Blend one channel value against the background.
#[inline]
pub fn blend_channel(value: u8, alpha: u8, background: u8) -> u8 {
    let a = alpha as u32;
    let blended = value as u32 * a + background as u32 * (255 - a);
    // Round to nearest
    ((blended + 127) / 255) as u8
}

fn expand_gray_alpha(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(2)
        .flat_map(|la| [la[0], la[0], la[0], la[1]])
        .collect()
}

fn composite_rgba(pixels: &[u8], background: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() / 4 * 3);

    for px in pixels.chunks_exact(4) {
        let alpha = px[3];
        match alpha {
            255 => out.extend_from_slice(&px[0..3]),
            0 => out.extend_from_slice(&background),
            _ => out.extend(
                px[0..3]
                    .iter()
                    .zip(background)
                    .map(|(&value, bg)| blend_channel(value, alpha, bg)),
            ),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_transparent_becomes_white() {
        let img = SourceImage::from_raw(2, 1, ColorMode::Rgba, vec![0, 0, 0, 0, 10, 20, 30, 0])
            .unwrap();
        let flat = flatten_to_rgb(&img);

        assert_eq!(flat.mode(), ColorMode::Rgb);
        assert_eq!(flat.pixels(), &[255, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_opaque_pixels_unchanged() {
        let img = SourceImage::from_raw(1, 1, ColorMode::Rgba, vec![12, 34, 56, 255]).unwrap();
        assert_eq!(flatten_to_rgb(&img).pixels(), &[12, 34, 56]);
    }

    #[test]
    fn test_half_transparent_red_blends_to_pink() {
        // 255*128 + 255*127 = 255*255 -> 255; 0*128 + 255*127 = 32385 -> 127
        let img = SourceImage::from_raw(1, 1, ColorMode::Rgba, vec![255, 0, 0, 128]).unwrap();
        assert_eq!(flatten_to_rgb(&img).pixels(), &[255, 127, 127]);
    }

    #[test]
    fn test_semi_transparent_black_is_gray_not_black() {
        let img = SourceImage::from_raw(1, 1, ColorMode::Rgba, vec![0, 0, 0, 64]).unwrap();
        let flat = flatten_to_rgb(&img);
        // 255 * 191 / 255 = 191
        assert_eq!(flat.pixels(), &[191, 191, 191]);
    }

    #[test]
    fn test_gray_alpha_expanded_before_compositing() {
        let img = SourceImage::from_raw(2, 1, ColorMode::GrayAlpha, vec![0, 0, 100, 255]).unwrap();
        let flat = flatten_to_rgb(&img);
        assert_eq!(flat.pixels(), &[255, 255, 255, 100, 100, 100]);
    }

    #[test]
    fn test_gray_replicated_to_rgb() {
        let img = SourceImage::from_raw(2, 1, ColorMode::Gray, vec![7, 200]).unwrap();
        assert_eq!(flatten_to_rgb(&img).pixels(), &[7, 7, 7, 200, 200, 200]);
    }

    #[test]
    fn test_rgb_passthrough() {
        let img = SourceImage::from_raw(1, 2, ColorMode::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(flatten_to_rgb(&img), img);
    }

    #[test]
    fn test_custom_background() {
        let img = SourceImage::from_raw(1, 1, ColorMode::Rgba, vec![255, 255, 255, 0]).unwrap();
        assert_eq!(flatten_onto(&img, [0, 0, 0]).pixels(), &[0, 0, 0]);
    }

    #[test]
    fn test_blend_channel_extremes() {
        assert_eq!(blend_channel(10, 255, 255), 10);
        assert_eq!(blend_channel(10, 0, 255), 255);
        assert_eq!(blend_channel(255, 77, 255), 255);
    }
}
