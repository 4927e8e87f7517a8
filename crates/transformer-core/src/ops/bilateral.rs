//! Edge-preserving bilateral filter.
//!
//! Each output pixel is a weighted mean over a disc of radius `diameter / 2`.
//! The weight of a neighbour is the product of
//! - a spatial term `exp(-r² / (2 σ_space²))` and
//! - a range term `exp(-d² / (2 σ_color²))`, where `d` is the L1 color
//!   distance to the centre pixel summed over channels.
//!
//! Larger sigmas widen the set of neighbours that contribute; the diameter
//! bounds the neighbourhood.

use super::kernel::{reflect101, saturate_u8};
use super::{check_input, Output};
use crate::error::OpError;
use crate::params::{ParamSpec, Params};
use crate::raster::Image;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::int("diameter", "Diameter of pixel neighborhood:", 1, 15, 9),
    ParamSpec::int("sigma_color", "Sigma Color:", 1, 200, 75),
    ParamSpec::int("sigma_space", "Sigma Space:", 1, 200, 75),
];

/// Apply the bilateral filter to a 1- or 3-channel image.
///
/// Non-positive sigmas are treated as 1. The neighbourhood radius is at
/// least 1 pixel.
pub fn bilateral_filter(
    image: &Image,
    diameter: i64,
    sigma_color: f64,
    sigma_space: f64,
) -> Result<Image, OpError> {
    check_input(image, None)?;

    let sigma_color = if sigma_color > 0.0 { sigma_color } else { 1.0 };
    let sigma_space = if sigma_space > 0.0 { sigma_space } else { 1.0 };
    let radius = if diameter <= 0 {
        (sigma_space * 1.5).round() as i64
    } else {
        diameter / 2
    }
    .max(1) as isize;

    let w = image.width as usize;
    let h = image.height as usize;
    let cn = image.channels.count();

    // Spatial offsets inside the disc with their weights
    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let mut taps: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r = ((dx * dx + dy * dy) as f64).sqrt();
            if r > radius as f64 {
                continue;
            }
            taps.push((dx, dy, (r * r * space_coeff).exp() as f32));
        }
    }

    // Range weights indexed by summed absolute channel difference
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let color_weight: Vec<f32> = (0..cn * 256)
        .map(|d| ((d * d) as f64 * color_coeff).exp() as f32)
        .collect();

    let mut output = vec![0u8; w * h * cn];
    let mut sums = [0.0f32; 3];
    for y in 0..h {
        for x in 0..w {
            let center = &image.pixels[(y * w + x) * cn..(y * w + x + 1) * cn];
            sums[..cn].fill(0.0);
            let mut weight_sum = 0.0f32;

            for &(dx, dy, space_w) in &taps {
                let sx = reflect101(x as isize + dx, w);
                let sy = reflect101(y as isize + dy, h);
                let neighbour = &image.pixels[(sy * w + sx) * cn..(sy * w + sx + 1) * cn];

                let distance: usize = center
                    .iter()
                    .zip(neighbour)
                    .map(|(&a, &b)| a.abs_diff(b) as usize)
                    .sum();
                let weight = space_w * color_weight[distance];

                for (acc, &v) in sums.iter_mut().zip(neighbour) {
                    *acc += weight * v as f32;
                }
                weight_sum += weight;
            }

            let out = &mut output[(y * w + x) * cn..(y * w + x + 1) * cn];
            for (dst, acc) in out.iter_mut().zip(&sums) {
                *dst = saturate_u8(acc / weight_sum);
            }
        }
    }

    Ok(image.with_pixels(image.channels, output))
}

pub(crate) fn apply(image: &Image, params: &Params) -> Result<Output, OpError> {
    bilateral_filter(
        image,
        params.int("diameter")?,
        params.float("sigma_color")?,
        params.float("sigma_space")?,
    )
    .map(Output::from)
}
