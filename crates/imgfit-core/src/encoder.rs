//! Adaptive payload encoder.
//!
//! Turns a [`SourceImage`] into a data URI whose base64 portion fits a
//! character budget, giving up as little fidelity as possible.
//!
//! # Algorithm
//!
//! Each stage runs only if the previous one still exceeds the budget:
//!
//! 1. Downscale so the longest side is at most `max_dimension_px` (Lanczos3),
//!    then encode as PNG. Lossless output that fits is returned as-is.
//! 2. Flatten onto white to get opaque RGB. Images with alpha are flattened
//!    at full resolution and then downscaled again.
//! 3. Encode as JPEG from `starting_quality` down to `quality_floor`
//!    (inclusive) in steps of `quality_step`.
//! 4. Halve both sides and encode at `halving_quality`, until the longest
//!    side would drop below `size_floor_px`.
//! 5. Fail with [`FitError::BudgetExceeded`].
//!
//! The number of attempts is bounded by [`EncoderConfig::max_attempts`].

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, EncoderConfig};
use crate::decode::{
    decode_image, halved_dimensions, resize, resize_to_fit, DecodeError, FilterType, SourceImage,
};
use crate::encode::{base64_len, encode_jpeg, encode_png, DataUri, EncodeError, PayloadFormat};
use crate::flatten::flatten_to_rgb;

/// Filter used for every downscale in the ladder.
const LADDER_FILTER: FilterType = FilterType::Lanczos3;

/// Failure of an encode call.
#[derive(Debug, Error)]
pub enum FitError {
    /// The input bytes are not a decodable image.
    #[error("could not read image: {0}")]
    Decode(#[from] DecodeError),

    /// Every stage was exhausted and the payload is still too large.
    #[error(
        "could not compress image under the size limit: smallest payload was \
         {smallest} chars, budget is {budget} chars"
    )]
    BudgetExceeded {
        budget: usize,
        smallest: usize,
        attempts: usize,
    },

    /// The encoder configuration is inconsistent.
    #[error("invalid encoder configuration: {0}")]
    Config(#[from] ConfigError),

    /// The underlying codec failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl FitError {
    /// True if the input could not be decoded ("bad input").
    pub fn is_decode_error(&self) -> bool {
        matches!(self, FitError::Decode(_))
    }

    /// True if the input was valid but too large to compress ("input too large").
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, FitError::BudgetExceeded { .. })
    }
}

/// A data URI that fits the budget, plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    data_uri: DataUri,
    quality: Option<u8>,
    width: u32,
    height: u32,
    attempts: usize,
}

impl EncodedPayload {
    /// The `data:image/...;base64,...` string.
    pub fn data_uri(&self) -> &DataUri {
        &self.data_uri
    }

    /// Output format.
    pub fn format(&self) -> PayloadFormat {
        self.data_uri.format()
    }

    /// JPEG quality used, `None` for PNG.
    pub fn quality(&self) -> Option<u8> {
        self.quality
    }

    /// Final `(width, height)` of the encoded image.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Length of the base64 portion in characters.
    pub fn payload_len(&self) -> usize {
        self.data_uri.payload_len()
    }

    /// Number of encodes performed, including the successful one.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Consume and return the data URI string.
    pub fn into_string(self) -> String {
        self.data_uri.into_string()
    }
}

/// Result of one encode call.
pub type EncodingResult = Result<EncodedPayload, FitError>;

/// Stateless encoder holding a validated configuration.
///
/// Cloning is cheap and every call is independent, so one encoder can be
/// shared across request handlers.
#[derive(Debug, Clone, Default)]
pub struct AdaptivePayloadEncoder {
    config: EncoderConfig,
}

impl AdaptivePayloadEncoder {
    /// Create an encoder, rejecting inconsistent configurations.
    pub fn new(config: EncoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode with the configured budget.
    pub fn encode(&self, image: &SourceImage) -> EncodingResult {
        self.encode_with_budget(image, self.config.budget_chars)
    }

    /// Decode `bytes` and encode with the configured budget.
    ///
    /// Undecodable input yields [`FitError::Decode`], never a panic.
    pub fn encode_bytes(&self, bytes: &[u8]) -> EncodingResult {
        let image = decode_image(bytes)?;
        self.encode(&image)
    }

    /// Encode with an explicit budget for this call only.
    pub fn encode_with_budget(&self, image: &SourceImage, budget_chars: usize) -> EncodingResult {
        if budget_chars == 0 {
            return Err(ConfigError::Zero {
                field: "budget_chars",
            }
            .into());
        }

        let config = &self.config;
        let mut ladder = Ladder::new(budget_chars);

        let base = resize_to_fit(image, config.max_dimension_px, LADDER_FILTER)?;

        let png = encode_png(&base)?;
        if let Some(payload) = ladder.try_fit(PayloadFormat::Png, &png, None, &base) {
            return Ok(payload);
        }

        let rgb = lossy_base(image, &base, config.max_dimension_px)?;

        for quality in config.quality_ladder() {
            let jpeg = encode_jpeg(rgb.pixels(), rgb.width(), rgb.height(), quality)?;
            if let Some(payload) = ladder.try_fit(PayloadFormat::Jpeg, &jpeg, Some(quality), &rgb)
            {
                return Ok(payload);
            }
        }

        // Dimensions halve each step; every step resamples the full-size
        // flattened image so errors don't accumulate.
        let (mut width, mut height) = rgb.dimensions();
        loop {
            let (next_w, next_h) = halved_dimensions(width, height);
            if next_w.max(next_h) < config.size_floor_px || (next_w, next_h) == (width, height) {
                break;
            }
            (width, height) = (next_w, next_h);

            let smaller = resize(&rgb, width, height, LADDER_FILTER)?;
            let jpeg = encode_jpeg(smaller.pixels(), width, height, config.halving_quality)?;
            if let Some(payload) =
                ladder.try_fit(PayloadFormat::Jpeg, &jpeg, Some(config.halving_quality), &smaller)
            {
                return Ok(payload);
            }
        }

        warn!(
            budget = budget_chars,
            smallest = ladder.smallest,
            attempts = ladder.attempts,
            "image does not fit the payload budget"
        );

        Err(FitError::BudgetExceeded {
            budget: budget_chars,
            smallest: ladder.smallest,
            attempts: ladder.attempts,
        })
    }
}

/// Encode image file bytes into a size-bounded data URI.
pub fn encode_data_uri(bytes: &[u8], config: &EncoderConfig) -> EncodingResult {
    AdaptivePayloadEncoder::new(config.clone())?.encode_bytes(bytes)
}

/// Opaque RGB input for the JPEG stages.
///
/// Images with alpha are composited onto white before downscaling, so the
/// resampling filter never mixes in the color of transparent pixels. Opaque
/// images reuse the already downscaled `base`.
fn lossy_base(
    image: &SourceImage,
    base: &SourceImage,
    max_dimension_px: u32,
) -> Result<SourceImage, DecodeError> {
    if image.mode().has_alpha() {
        resize_to_fit(&flatten_to_rgb(image), max_dimension_px, LADDER_FILTER)
    } else {
        Ok(flatten_to_rgb(base))
    }
}

/// Bookkeeping across ladder stages.
struct Ladder {
    budget: usize,
    attempts: usize,
    smallest: usize,
}

impl Ladder {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            attempts: 0,
            smallest: usize::MAX,
        }
    }

    /// Record one attempt; build the payload only when it fits.
    fn try_fit(
        &mut self,
        format: PayloadFormat,
        bytes: &[u8],
        quality: Option<u8>,
        image: &SourceImage,
    ) -> Option<EncodedPayload> {
        self.attempts += 1;
        let len = base64_len(bytes.len());
        self.smallest = self.smallest.min(len);

        debug!(
            attempt = self.attempts,
            %format,
            quality,
            width = image.width(),
            height = image.height(),
            len,
            budget = self.budget,
            "payload attempt"
        );

        if len > self.budget {
            return None;
        }

        Some(EncodedPayload {
            data_uri: DataUri::new(format, bytes),
            quality,
            width: image.width(),
            height: image.height(),
            attempts: self.attempts,
        })
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decode::ColorMode;
    use proptest::prelude::*;

    /// Smooth pattern with a seed-dependent phase; close to what charts look like.
    fn pattern(width: u32, height: u32, seed: u8, mode: ColorMode) -> SourceImage {
        let channels = mode.channels();
        let mut pixels = Vec::with_capacity((width * height) as usize * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    let v = (x * 7 + y * 3 + c as u32 * 50 + seed as u32) % 256;
                    pixels.push(v as u8);
                }
            }
        }
        SourceImage::from_raw(width, height, mode, pixels).unwrap()
    }

    fn mode_strategy() -> impl Strategy<Value = ColorMode> {
        prop_oneof![
            Just(ColorMode::Gray),
            Just(ColorMode::GrayAlpha),
            Just(ColorMode::Rgb),
            Just(ColorMode::Rgba),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: Success always respects the budget; failure is explicit.
        #[test]
        fn prop_budget_invariant(
            (width, height) in (1u32..=96, 1u32..=96),
            seed in any::<u8>(),
            mode in mode_strategy(),
            budget in 200usize..=20_000,
        ) {
            let img = pattern(width, height, seed, mode);
            let enc = AdaptivePayloadEncoder::default();

            match enc.encode_with_budget(&img, budget) {
                Ok(payload) => {
                    prop_assert!(payload.payload_len() <= budget);
                    prop_assert!(payload.attempts() <= enc.config().max_attempts());
                    let prefix = format!("data:{};base64,", payload.format().mime_type());
                    prop_assert!(payload.data_uri().as_str().starts_with(&prefix));
                }
                Err(err) => prop_assert!(err.is_budget_exceeded()),
            }
        }

        /// Property: An image whose PNG already fits comes back as that exact PNG.
        #[test]
        fn prop_fast_path_is_identity(
            (width, height) in (1u32..=64, 1u32..=64),
            seed in any::<u8>(),
            mode in mode_strategy(),
        ) {
            let img = pattern(width, height, seed, mode);
            let png = encode_png(&img).unwrap();
            let budget = base64_len(png.len());

            let payload = AdaptivePayloadEncoder::default()
                .encode_with_budget(&img, budget)
                .unwrap();

            prop_assert_eq!(payload.format(), PayloadFormat::Png);
            prop_assert_eq!(payload.dimensions(), (width, height));
            prop_assert_eq!(payload.data_uri(), &DataUri::new(PayloadFormat::Png, &png));
        }

        /// Property: Lowering quality by one step never grows the payload.
        #[test]
        fn prop_quality_reduction_is_monotonic(
            (width, height) in (32u32..=96, 32u32..=96),
            seed in any::<u8>(),
        ) {
            let img = pattern(width, height, seed, ColorMode::Rgb);
            let config = EncoderConfig::default();

            let sizes: Vec<usize> = config
                .quality_ladder()
                .map(|q| encode_jpeg(img.pixels(), width, height, q).unwrap().len())
                .collect();

            for pair in sizes.windows(2) {
                prop_assert!(pair[0] >= pair[1], "sizes not monotonic: {:?}", sizes);
            }
        }
    }
}
