//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! transformer types, handling the conversion between Rust and JavaScript
//! data representations.

use transformer_core::{Channels, Image};
use wasm_bindgen::prelude::*;

/// An image wrapper for JavaScript.
///
/// Wraps the core `Image` and exposes its dimensions, channel count and pixel
/// data. Three-channel images are interleaved; single-channel images carry
/// one byte per pixel.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it into a
/// `Uint8Array`. The `free()` method releases the WASM memory early; the
/// wasm-bindgen finalizer handles it otherwise.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsImage {
    inner: Image,
}

#[wasm_bindgen]
impl JsImage {
    /// Create an image from dimensions, channel count (1 or 3) and pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel count is unsupported or the buffer
    /// length does not match `width * height * channels`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<JsImage, JsValue> {
        Self::build(width, height, channels, pixels).map_err(|e| JsValue::from_str(&e))
    }

    /// Image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Samples per pixel: 1 (grayscale) or 3
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.inner.channels.count() as u8
    }

    /// True for single-channel images
    #[wasm_bindgen(getter)]
    pub fn is_grayscale(&self) -> bool {
        self.inner.is_grayscale()
    }

    /// Number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns the pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsImage {
    pub(crate) fn build(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Result<JsImage, String> {
        let channels = Channels::from_count(channels)
            .ok_or_else(|| format!("unsupported channel count {}", channels))?;
        Image::new(width, height, channels, pixels)
            .map(Self::from_image)
            .map_err(|e| e.to_string())
    }

    pub(crate) fn from_image(inner: Image) -> Self {
        Self { inner }
    }

    pub(crate) fn as_image(&self) -> &Image {
        &self.inner
    }
}
