//! Sharpening via a fixed 3×3 kernel.

use super::kernel::filter3x3;
use super::{check_input, Output};
use crate::error::OpError;
use crate::params::{ParamSpec, Params};
use crate::raster::Image;

pub const PARAMS: &[ParamSpec] = &[];

/// Center weight 5 against the four direct neighbours.
pub const SHARPEN_KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

/// Correlate each channel with an arbitrary 3×3 kernel, saturating to u8.
pub fn filter2d(image: &Image, kernel: &[[f32; 3]; 3]) -> Result<Image, OpError> {
    check_input(image, None)?;
    Ok(image.with_pixels(image.channels, filter3x3(image, kernel)))
}

/// Emphasize local contrast with [`SHARPEN_KERNEL`].
pub fn sharpen(image: &Image) -> Result<Image, OpError> {
    filter2d(image, &SHARPEN_KERNEL)
}

pub(crate) fn apply(image: &Image, _params: &Params) -> Result<Output, OpError> {
    sharpen(image).map(Output::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Channels;

    #[test]
    fn test_flat_image_unchanged() {
        // Kernel weights sum to 1
        let img = Image::filled_rgb(5, 5, [12, 128, 250]).unwrap();
        assert_eq!(sharpen(&img).unwrap(), img);
    }

    #[test]
    fn test_bright_dot_amplified_and_clamped() {
        let mut pixels = vec![100u8; 9];
        pixels[4] = 150;
        let img = Image::new(3, 3, Channels::Gray, pixels).unwrap();
        let out = sharpen(&img).unwrap();

        // 5*150 - 4*100 = 350 -> 255
        assert_eq!(out.pixels[4], 255);
        // Top-middle sees the dot twice (below, and above via reflection):
        // 5*100 - 2*150 - 2*100 = 0
        assert_eq!(out.pixels[1], 0);
        // Corner only sees direct neighbours at 100 (reflected border)
        assert_eq!(out.pixels[0], 100);
    }

    #[test]
    fn test_dark_dot_clamps_to_zero() {
        let mut pixels = vec![200u8; 9];
        pixels[4] = 10;
        let img = Image::new(3, 3, Channels::Gray, pixels).unwrap();
        // 5*10 - 4*200 < 0
        assert_eq!(sharpen(&img).unwrap().pixels[4], 0);
    }

    #[test]
    fn test_custom_kernel() {
        let img = Image::new(3, 1, Channels::Gray, vec![10, 20, 30]).unwrap();
        let shift_left = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]];
        // Rightmost pixel reflects back to x = 1
        assert_eq!(filter2d(&img, &shift_left).unwrap().pixels, vec![20, 30, 20]);
    }
}
