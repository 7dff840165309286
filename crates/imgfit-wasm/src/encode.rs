//! Adaptive encoding WASM bindings.
//!
//! This module exposes the imgfit-core encoder to JavaScript so the chat UI
//! can shrink uploads and canvas renders before inlining them.
//!
//! # Functions
//!
//! - [`encode_data_uri`] - Decode image file bytes and fit them into a data URI
//! - [`encode_pixels`] - Fit raw RGBA pixels (e.g. canvas `ImageData`) into a data URI
//! - [`default_options`] - The default encoder options as a plain object
//!
//! # Example
//!
//! ```typescript
//! import { encode_data_uri } from '@imgfit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! try {
//!   const payload = encode_data_uri(bytes, { budget_chars: 40000 });
//!   img.src = payload.data_uri;
//! } catch (e) {
//!   if (e.name === 'BudgetExceededError') alert('Please provide a smaller image');
//! }
//! ```

use crate::types::{config_from_js, named_error, JsEncodedPayload, CONFIG_ERROR};
use imgfit_core::{AdaptivePayloadEncoder, ColorMode, EncoderConfig, FitError, SourceImage};
use wasm_bindgen::prelude::*;

/// Decode image file bytes and encode them into a size-bounded data URI.
///
/// # Arguments
///
/// * `bytes` - PNG, JPEG, GIF, WebP or BMP file bytes as a `Uint8Array`
/// * `options` - Optional partial encoder options; missing fields use defaults
///
/// # Errors
///
/// Throws an `Error` whose `name` is `DecodeError` for unreadable input,
/// `BudgetExceededError` when nothing fits, or `ConfigError` for bad options.
#[wasm_bindgen]
pub fn encode_data_uri(bytes: &[u8], options: JsValue) -> Result<JsEncodedPayload, JsValue> {
    let encoder = encoder_from_js(options)?;
    encoder
        .encode_bytes(bytes)
        .map(JsEncodedPayload::from_payload)
        .map_err(fit_error_to_js)
}

/// Encode raw RGBA pixels into a size-bounded data URI.
///
/// `pixels` is laid out like canvas `ImageData.data`: 4 bytes per pixel,
/// row-major.
#[wasm_bindgen]
pub fn encode_pixels(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    options: JsValue,
) -> Result<JsEncodedPayload, JsValue> {
    let encoder = encoder_from_js(options)?;
    let image = SourceImage::from_raw(width, height, ColorMode::Rgba, pixels)
        .map_err(|e| fit_error_to_js(e.into()))?;

    encoder
        .encode(&image)
        .map(JsEncodedPayload::from_payload)
        .map_err(fit_error_to_js)
}

/// The default encoder options as a plain JS object.
#[wasm_bindgen]
pub fn default_options() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&EncoderConfig::default())
        .map_err(|e| named_error(CONFIG_ERROR, &e.to_string()))
}

fn encoder_from_js(options: JsValue) -> Result<AdaptivePayloadEncoder, JsValue> {
    let config = config_from_js(options)?;
    AdaptivePayloadEncoder::new(config).map_err(|e| fit_error_to_js(e.into()))
}

/// Name given to the thrown JS `Error` so callers can tell failures apart.
pub(crate) fn error_name(err: &FitError) -> &'static str {
    match err {
        FitError::Decode(_) => "DecodeError",
        FitError::BudgetExceeded { .. } => "BudgetExceededError",
        FitError::Config(_) => CONFIG_ERROR,
        FitError::Encode(_) => "EncodeError",
    }
}

fn fit_error_to_js(err: FitError) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    if err.is_budget_exceeded() {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }

    named_error(error_name(&err), &err.to_string())
}
