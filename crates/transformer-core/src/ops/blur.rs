//! Gaussian blur with a square, odd-sized kernel.
//!
//! Sigma is derived from the kernel size: small kernels (1, 3, 5, 7) use the
//! fixed binomial-style taps, larger ones use
//! `sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.

use super::kernel::separable_filter;
use super::{check_input, Output};
use crate::error::OpError;
use crate::params::{ParamSpec, Params};
use crate::raster::Image;

/// Smallest accepted kernel size.
pub const MIN_KERNEL: i64 = 1;
/// Largest accepted kernel size.
pub const MAX_KERNEL: i64 = 31;

pub const PARAMS: &[ParamSpec] = &[ParamSpec::odd_int(
    "kernel_size",
    "Kernel Size (odd number):",
    MIN_KERNEL,
    MAX_KERNEL,
    5,
)];

const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Sigma picked for a kernel size when none is given.
pub fn auto_sigma(ksize: usize) -> f64 {
    0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian taps for an odd kernel size.
///
/// A non-positive `sigma` selects the automatic value.
pub fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f32> {
    if sigma <= 0.0 && ksize % 2 == 1 && ksize <= 7 {
        return SMALL_KERNELS[ksize / 2].to_vec();
    }

    let sigma = if sigma > 0.0 { sigma } else { auto_sigma(ksize) };
    let scale = -0.5 / (sigma * sigma);
    let center = (ksize as f64 - 1.0) * 0.5;

    let weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let d = i as f64 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Blur an image with a `ksize`×`ksize` Gaussian kernel.
///
/// # Errors
///
/// Returns `OpError::InvalidKernel` if `ksize` is even or outside
/// `[MIN_KERNEL, MAX_KERNEL]`, and `OpError::InvalidImage` for a malformed
/// buffer.
pub fn gaussian_blur(image: &Image, ksize: i64) -> Result<Image, OpError> {
    check_input(image, None)?;
    if !(MIN_KERNEL..=MAX_KERNEL).contains(&ksize) || ksize % 2 == 0 {
        return Err(OpError::InvalidKernel {
            size: ksize,
            min: MIN_KERNEL,
            max: MAX_KERNEL,
        });
    }

    let ksize = ksize as usize;
    if ksize == 1 {
        return Ok(image.clone());
    }
    let taps = gaussian_kernel(ksize, 0.0);
    Ok(image.with_pixels(image.channels, separable_filter(image, &taps)))
}

pub(crate) fn apply(image: &Image, params: &Params) -> Result<Output, OpError> {
    gaussian_blur(image, params.int("kernel_size")?).map(Output::from)
}

/// Variance of the 4-neighbour Laplacian over interior pixels of every
/// channel. Higher means more high-frequency detail.
#[cfg(test)]
pub(crate) fn laplacian_variance(image: &Image) -> f64 {
    let w = image.width as usize;
    let h = image.height as usize;
    let cn = image.channels.count();
    let at = |x: usize, y: usize, c: usize| image.pixels[(y * w + x) * cn + c] as f64;

    let mut values = Vec::new();
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            for c in 0..cn {
                values.push(
                    at(x - 1, y, c) + at(x + 1, y, c) + at(x, y - 1, c) + at(x, y + 1, c)
                        - 4.0 * at(x, y, c),
                );
            }
        }
    }
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::{noise_rgb, step_edge};
    use crate::raster::Channels;

    #[test]
    fn test_kernel_normalized() {
        for ksize in (1..=31).step_by(2) {
            let taps = gaussian_kernel(ksize, 0.0);
            assert_eq!(taps.len(), ksize);
            let sum: f32 = taps.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "ksize {} sums to {}", ksize, sum);
        }
    }

    #[test]
    fn test_kernel_symmetric_and_peaked() {
        let taps = gaussian_kernel(21, 0.0);
        for i in 0..10 {
            assert!((taps[i] - taps[20 - i]).abs() < 1e-7);
            assert!(taps[i] < taps[i + 1]);
        }
    }

    #[test]
    fn test_auto_sigma() {
        assert!((auto_sigma(21) - 3.5).abs() < 1e-12);
        assert!((auto_sigma(9) - 1.7).abs() < 1e-12);
    }

    #[test]
    fn test_small_kernel_table() {
        assert_eq!(gaussian_kernel(3, 0.0), vec![0.25, 0.5, 0.25]);
        // An explicit sigma bypasses the table
        assert_ne!(gaussian_kernel(3, 2.0), vec![0.25, 0.5, 0.25]);
    }

    #[test]
    fn test_even_kernel_rejected() {
        let img = Image::filled_rgb(4, 4, [1, 2, 3]).unwrap();
        assert_eq!(
            gaussian_blur(&img, 4),
            Err(OpError::InvalidKernel {
                size: 4,
                min: 1,
                max: 31
            })
        );
        assert!(gaussian_blur(&img, 33).is_err());
        assert!(gaussian_blur(&img, -1).is_err());
    }

    #[test]
    fn test_kernel_one_is_identity() {
        let img = noise_rgb(8, 8, 3);
        assert_eq!(gaussian_blur(&img, 1).unwrap(), img);
    }

    #[test]
    fn test_flat_image_unchanged() {
        let img = Image::filled_rgb(6, 5, [77, 140, 3]).unwrap();
        assert_eq!(gaussian_blur(&img, 9).unwrap(), img);
    }

    #[test]
    fn test_blur_softens_step_edge() {
        let img = step_edge(16, 4);
        let blurred = gaussian_blur(&img, 5).unwrap();
        // Pixel just left of the edge picks up some white
        let idx = (7 * 3) as usize;
        assert!(blurred.pixels[idx] > 0 && blurred.pixels[idx] < 255);
        // Far columns stay saturated
        assert_eq!(blurred.pixels[0], 0);
        assert_eq!(blurred.pixels[15 * 3], 255);
    }

    #[test]
    fn test_blur_on_gray_image() {
        let img = Image::new(5, 1, Channels::Gray, vec![0, 0, 255, 0, 0]).unwrap();
        let blurred = gaussian_blur(&img, 3).unwrap();
        assert!(blurred.is_grayscale());
        // 0.25*0 + 0.5*255 + 0.25*0 = 127.5 -> 128
        assert_eq!(blurred.pixels[2], 128);
        assert_eq!(blurred.pixels[1], 64);
    }

    #[test]
    fn test_larger_kernel_smooths_more() {
        let img = noise_rgb(48, 48, 11);
        let mut previous = laplacian_variance(&img);
        for ksize in [3, 5, 7, 9, 11, 15, 21] {
            let current = laplacian_variance(&gaussian_blur(&img, ksize).unwrap());
            assert!(
                current <= previous,
                "ksize {} raised laplacian variance {} -> {}",
                ksize,
                previous,
                current
            );
            previous = current;
        }
    }
}
