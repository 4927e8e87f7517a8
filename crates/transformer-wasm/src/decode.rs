//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@transformer/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsImage;
use transformer_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an uploaded JPEG or PNG.
///
/// The format is sniffed from the bytes and EXIF orientation is applied.
/// The result is always a three-channel image.
///
/// # Errors
///
/// Returns an error string if the input is empty, not a supported format,
/// or corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImage, JsValue> {
    decode_upload(bytes).map_err(|e| JsValue::from_str(&e))
}

pub(crate) fn decode_upload(bytes: &[u8]) -> Result<JsImage, String> {
    decode::decode_image(bytes)
        .map(JsImage::from_image)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let src = RgbImage::from_fn(5, 3, |x, y| image::Rgb([x as u8 * 40, y as u8 * 80, 7]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(src.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let img = decode_upload(&bytes).unwrap();
        assert_eq!((img.width(), img.height(), img.channels()), (5, 3, 3));
        assert_eq!(img.pixels(), src.into_raw());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_upload(&[]).is_err());
        assert!(decode_upload(b"definitely not an image").is_err());
    }
}
