//! Transformer WASM - WebAssembly bindings for the image transformer
//!
//! This crate exposes the transformer-core catalog and execution engine to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Upload decoding bindings (JPEG, PNG)
//! - `pipeline` - Catalog listing and pipeline execution
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, run_pipeline } from '@transformer/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const results = run_pipeline(image, [{ operator: 'negative' }]);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod pipeline;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use pipeline::{categories, list_operators, run_pipeline, JsOperatorResult};
pub use types::JsImage;

/// Initialize the WASM module (called automatically on load).
///
/// Routes `log` records to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    // A second init (e.g. hot reload) finds the logger already set
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
