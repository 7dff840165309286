//! WASM-compatible wrapper types for encoder results.
//!
//! This module provides JavaScript-friendly types that wrap the core imgfit
//! types, handling the conversion between Rust and JavaScript representations.

use imgfit_core::{EncodedPayload, EncoderConfig};
use wasm_bindgen::prelude::*;

/// A size-bounded data URI and how it was produced.
#[wasm_bindgen]
pub struct JsEncodedPayload {
    data_uri: String,
    format: String,
    quality: Option<u8>,
    width: u32,
    height: u32,
    attempts: usize,
}

#[wasm_bindgen]
impl JsEncodedPayload {
    /// The full `data:image/...;base64,...` string
    #[wasm_bindgen(getter)]
    pub fn data_uri(&self) -> String {
        self.data_uri.clone()
    }

    /// "png" or "jpeg"
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.format.clone()
    }

    /// JPEG quality used, undefined for PNG
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> Option<u8> {
        self.quality
    }

    /// Final image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Final image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of encodes performed
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Length of the base64 portion in characters
    #[wasm_bindgen(getter)]
    pub fn payload_length(&self) -> usize {
        self.data_uri
            .split_once(',')
            .map(|(_, payload)| payload.len())
            .unwrap_or(0)
    }
}

impl JsEncodedPayload {
    pub(crate) fn from_payload(payload: EncodedPayload) -> Self {
        let (width, height) = payload.dimensions();
        Self {
            format: payload.format().as_str().to_string(),
            quality: payload.quality(),
            attempts: payload.attempts(),
            width,
            height,
            data_uri: payload.into_string(),
        }
    }
}

/// Read encoder options from a JS object, filling gaps with defaults.
///
/// `undefined` and `null` mean "all defaults".
pub(crate) fn config_from_js(options: JsValue) -> Result<EncoderConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(EncoderConfig::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| named_error(CONFIG_ERROR, &format!("invalid encoder options: {}", e)))
}

/// `name` of errors thrown for unusable options.
pub(crate) const CONFIG_ERROR: &str = "ConfigError";

/// Build a JS `Error` with the given `name`, so callers can branch on `e.name`.
pub(crate) fn named_error(name: &str, message: &str) -> JsValue {
    let js_err = js_sys::Error::new(message);
    js_err.set_name(name);
    js_err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgfit_core::{AdaptivePayloadEncoder, ColorMode, SourceImage};

    #[test]
    fn test_from_payload() {
        let image = SourceImage::from_raw(8, 4, ColorMode::Rgb, vec![255u8; 8 * 4 * 3]).unwrap();
        let payload = AdaptivePayloadEncoder::default().encode(&image).unwrap();
        let expected_len = payload.payload_len();

        let js = JsEncodedPayload::from_payload(payload);
        assert_eq!(js.format(), "png");
        assert_eq!(js.quality(), None);
        assert_eq!((js.width(), js.height()), (8, 4));
        assert_eq!(js.attempts(), 1);
        assert_eq!(js.payload_length(), expected_len);
        assert!(js.data_uri().starts_with("data:image/png;base64,"));
    }
}
