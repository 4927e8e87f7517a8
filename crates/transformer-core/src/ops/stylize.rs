//! Stylization effects: sepia toning and pencil sketch.

use super::blur::gaussian_blur;
use super::color::bgr_to_gray;
use super::kernel::saturate_u8;
use super::{check_input, Output};
use crate::error::OpError;
use crate::params::{ParamSpec, Params};
use crate::raster::{Channels, Image};

pub const SEPIA_PARAMS: &[ParamSpec] = &[];
pub const SKETCH_PARAMS: &[ParamSpec] = &[];

/// Row `i` gives the weights of output channel `i` over the input triple.
pub const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.272, 0.534, 0.131],
    [0.349, 0.686, 0.168],
    [0.393, 0.769, 0.189],
];

/// Kernel size of the pencil-sketch blur.
pub const SKETCH_KERNEL: i64 = 21;

/// Mix each pixel's channel triple through [`SEPIA_MATRIX`], saturating to u8.
pub fn sepia(image: &Image) -> Result<Image, OpError> {
    check_input(image, Some(Channels::Rgb))?;

    let mut pixels = Vec::with_capacity(image.pixels.len());
    for p in image.pixels.chunks_exact(3) {
        let (c0, c1, c2) = (p[0] as f32, p[1] as f32, p[2] as f32);
        for row in &SEPIA_MATRIX {
            pixels.push(saturate_u8(row[0] * c0 + row[1] * c1 + row[2] * c2));
        }
    }
    Ok(image.with_pixels(Channels::Rgb, pixels))
}

/// Grayscale pencil sketch via a color-dodge blend.
///
/// `gray → invert → 21×21 Gaussian → output = min(255, gray * 256 / (255 - blurred + 1))`
///
/// Accepts 3-channel (read as BGR) or single-channel input; the output is
/// single-channel.
pub fn pencil_sketch(image: &Image) -> Result<Image, OpError> {
    check_input(image, None)?;

    let gray: Vec<u8> = match image.channels {
        Channels::Rgb => image
            .pixels
            .chunks_exact(3)
            .map(|p| bgr_to_gray(p[0], p[1], p[2]))
            .collect(),
        Channels::Gray => image.pixels.clone(),
    };

    let inverted = image.with_pixels(Channels::Gray, gray.iter().map(|&v| 255 - v).collect());
    let blurred = gaussian_blur(&inverted, SKETCH_KERNEL)?;

    let pixels = gray
        .iter()
        .zip(&blurred.pixels)
        .map(|(&g, &b)| {
            let divisor = (255 - b as u32 + 1) as f32;
            saturate_u8((g as f32 * 256.0 / divisor).min(255.0))
        })
        .collect();
    Ok(image.with_pixels(Channels::Gray, pixels))
}

pub(crate) fn apply_sepia(image: &Image, _params: &Params) -> Result<Output, OpError> {
    sepia(image).map(Output::from)
}

pub(crate) fn apply_sketch(image: &Image, _params: &Params) -> Result<Output, OpError> {
    pencil_sketch(image).map(Output::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::noise_rgb;

    #[test]
    fn test_sepia_black_stays_black() {
        let img = Image::filled_rgb(2, 2, [0, 0, 0]).unwrap();
        assert!(sepia(&img).unwrap().pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_sepia_white_saturates() {
        let img = Image::filled_rgb(1, 1, [255, 255, 255]).unwrap();
        // Row sums: 0.937, 1.203, 1.351
        assert_eq!(sepia(&img).unwrap().pixels, vec![239, 255, 255]);
    }

    #[test]
    fn test_sepia_mid_gray() {
        let img = Image::filled_rgb(1, 1, [100, 100, 100]).unwrap();
        assert_eq!(sepia(&img).unwrap().pixels, vec![94, 120, 135]);
    }

    #[test]
    fn test_sepia_rejects_grayscale() {
        let img = Image::filled_gray(2, 2, 10).unwrap();
        assert!(matches!(
            sepia(&img),
            Err(OpError::UnsupportedChannels {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_sketch_is_single_channel() {
        let img = noise_rgb(30, 20, 2);
        let sketch = pencil_sketch(&img).unwrap();
        assert!(sketch.is_grayscale());
        assert_eq!((sketch.width, sketch.height), (30, 20));
    }

    #[test]
    fn test_sketch_flat_field() {
        // Flat gray g: blurred inverse is 255 - g, so output = g * 256 / (g + 1)
        let img = Image::filled_rgb(8, 8, [128, 128, 128]).unwrap();
        let sketch = pencil_sketch(&img).unwrap();
        assert!(sketch.pixels.iter().all(|&v| v == 254));

        let white = Image::filled_rgb(4, 4, [255, 255, 255]).unwrap();
        assert!(pencil_sketch(&white).unwrap().pixels.iter().all(|&v| v == 255));

        let black = Image::filled_rgb(4, 4, [0, 0, 0]).unwrap();
        assert!(pencil_sketch(&black).unwrap().pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_sketch_accepts_grayscale() {
        let img = Image::filled_gray(5, 5, 200).unwrap();
        let sketch = pencil_sketch(&img).unwrap();
        // 200 * 256 / 201 = 254.7 -> 255
        assert!(sketch.pixels.iter().all(|&v| v == 255));
    }
}
