//! imgfit WASM - WebAssembly bindings for imgfit
//!
//! This crate exposes the imgfit-core adaptive encoder to JavaScript hosts,
//! so a browser chat UI can turn uploads and canvas renders into data URIs
//! that fit its payload budget.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types and option parsing
//! - `encode` - Encoding bindings (file bytes, raw RGBA pixels, defaults)
//!
//! # Usage
//!
//! ```typescript
//! import init, { encode_data_uri } from '@imgfit/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const payload = encode_data_uri(bytes, { max_dimension_px: 600 });
//! console.log(`${payload.format} ${payload.width}x${payload.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod encode;
mod types;

pub use encode::{default_options, encode_data_uri, encode_pixels};
pub use types::JsEncodedPayload;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
