//! Point-wise intensity transforms.
//!
//! - Linear: `output = clamp(round(alpha * input + beta), 0, 255)`
//! - Negative: `output = 255 - input`
//!
//! Both work on any channel layout.

use super::{check_input, Output};
use crate::error::OpError;
use crate::params::{ParamSpec, Params};
use crate::raster::Image;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::float("alpha", "Alpha (contrast):", 0.1, 3.0, 1.0),
    ParamSpec::int("beta", "Beta (brightness):", -100, 100, 0),
];

/// Scale and offset every sample, saturating to the u8 range.
///
/// Uses a 256-entry lookup table so cost is independent of `alpha`/`beta`.
pub fn linear_transform(image: &Image, alpha: f64, beta: i64) -> Result<Image, OpError> {
    check_input(image, None)?;

    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        *slot = (alpha * v as f64 + beta as f64).round().clamp(0.0, 255.0) as u8;
    }

    let pixels = image.pixels.iter().map(|&v| lut[v as usize]).collect();
    Ok(image.with_pixels(image.channels, pixels))
}

/// Invert every sample.
pub fn negative(image: &Image) -> Result<Image, OpError> {
    check_input(image, None)?;
    let pixels = image.pixels.iter().map(|&v| 255 - v).collect();
    Ok(image.with_pixels(image.channels, pixels))
}

pub(crate) fn apply_linear(image: &Image, params: &Params) -> Result<Output, OpError> {
    linear_transform(image, params.float("alpha")?, params.int("beta")?).map(Output::from)
}

pub(crate) fn apply_negative(image: &Image, _params: &Params) -> Result<Output, OpError> {
    negative(image).map(Output::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Channels;

    #[test]
    fn test_gray_128_doubled_saturates() {
        let img = Image::filled_rgb(4, 4, [128, 128, 128]).unwrap();
        let result = linear_transform(&img, 2.0, 0).unwrap();
        assert!(result.pixels.iter().all(|&v| v == 255));
        assert_eq!((result.width, result.height), (4, 4));
    }

    #[test]
    fn test_negative_black_is_white() {
        let img = Image::filled_rgb(3, 3, [0, 0, 0]).unwrap();
        let result = negative(&img).unwrap();
        assert!(result.pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_beta_offset_clamps_low() {
        let img = Image::new(3, 1, Channels::Gray, vec![10, 50, 200]).unwrap();
        let result = linear_transform(&img, 1.0, -20).unwrap();
        assert_eq!(result.pixels, vec![0, 30, 180]);
    }

    #[test]
    fn test_alpha_rounds_to_nearest() {
        let img = Image::new(2, 1, Channels::Gray, vec![3, 5]).unwrap();
        // 1.5 * 3 = 4.5 -> 5, 1.5 * 5 = 7.5 -> 8
        let result = linear_transform(&img, 1.5, 0).unwrap();
        assert_eq!(result.pixels, vec![5, 8]);
    }

    #[test]
    fn test_input_untouched() {
        let img = Image::filled_rgb(2, 2, [40, 50, 60]).unwrap();
        let copy = img.clone();
        let _ = negative(&img).unwrap();
        let _ = linear_transform(&img, 2.5, 30).unwrap();
        assert_eq!(img, copy);
    }

    #[test]
    fn test_apply_uses_resolved_params() {
        let img = Image::filled_gray(2, 2, 100).unwrap();
        let params = Params::defaults(PARAMS).with("beta", 5i64);
        let out = apply_linear(&img, &params).unwrap();
        assert!(out.image.pixels.iter().all(|&v| v == 105));
        assert!(out.warning.is_none());
    }
}
