//! Canny edge detection.
//!
//! 1. 3×3 Sobel gradients with replicated borders. For multi-channel input the
//!    channel with the strongest L1 magnitude `|dx| + |dy|` wins per pixel.
//! 2. Non-maximum suppression along the gradient direction quantized to four
//!    bins (0°, 45°, 90°, 135°).
//! 3. Hysteresis: pixels above the high threshold seed edges; 8-connected
//!    pixels above the low threshold extend them.
//!
//! The output is always single-channel with values 0 or 255.

use super::kernel::replicate;
use super::{check_input, Output};
use crate::error::OpError;
use crate::params::{ParamSpec, Params};
use crate::raster::{Channels, Image};

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::int("threshold1", "Threshold1:", 0, 255, 50),
    ParamSpec::int("threshold2", "Threshold2:", 0, 255, 150),
];

const TAN_22_5_DEG: f32 = 0.414_213_56;
const TAN_67_5_DEG: f32 = 2.414_213_6;

/// Sobel responses and L1 magnitude for every pixel.
struct Gradients {
    dx: Vec<i32>,
    dy: Vec<i32>,
    mag: Vec<i32>,
}

/// Detect edges. Thresholds may come in either order; the smaller one is
/// used as the low threshold.
pub fn canny(image: &Image, threshold1: f64, threshold2: f64) -> Result<Image, OpError> {
    check_input(image, None)?;

    let (low, high) = if threshold1 <= threshold2 {
        (threshold1, threshold2)
    } else {
        (threshold2, threshold1)
    };
    let low = low.floor() as i32;
    let high = high.floor() as i32;

    let w = image.width as usize;
    let h = image.height as usize;
    let grad = sobel(image);
    let states = suppress_non_maxima(&grad, w, h, low, high);
    let pixels = hysteresis(states, w, h);

    Ok(image.with_pixels(Channels::Gray, pixels))
}

pub(crate) fn apply(image: &Image, params: &Params) -> Result<Output, OpError> {
    canny(
        image,
        params.float("threshold1")?,
        params.float("threshold2")?,
    )
    .map(Output::from)
}

fn sobel(image: &Image) -> Gradients {
    let w = image.width as usize;
    let h = image.height as usize;
    let cn = image.channels.count();
    let at = |x: isize, y: isize, c: usize| -> i32 {
        image.pixels[(replicate(y, h) * w + replicate(x, w)) * cn + c] as i32
    };

    let mut grad = Gradients {
        dx: vec![0; w * h],
        dy: vec![0; w * h],
        mag: vec![0; w * h],
    };

    for y in 0..h as isize {
        for x in 0..w as isize {
            let idx = y as usize * w + x as usize;
            for c in 0..cn {
                let dx = (at(x + 1, y - 1, c) + 2 * at(x + 1, y, c) + at(x + 1, y + 1, c))
                    - (at(x - 1, y - 1, c) + 2 * at(x - 1, y, c) + at(x - 1, y + 1, c));
                let dy = (at(x - 1, y + 1, c) + 2 * at(x, y + 1, c) + at(x + 1, y + 1, c))
                    - (at(x - 1, y - 1, c) + 2 * at(x, y - 1, c) + at(x + 1, y - 1, c));
                let mag = dx.abs() + dy.abs();
                if c == 0 || mag > grad.mag[idx] {
                    grad.dx[idx] = dx;
                    grad.dy[idx] = dy;
                    grad.mag[idx] = mag;
                }
            }
        }
    }
    grad
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EdgeState {
    Suppressed,
    Weak,
    Strong,
}

fn suppress_non_maxima(grad: &Gradients, w: usize, h: usize, low: i32, high: i32) -> Vec<EdgeState> {
    // Magnitudes outside the image count as zero
    let mag_at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            grad.mag[y as usize * w + x as usize]
        }
    };

    let mut states = vec![EdgeState::Suppressed; w * h];
    for y in 0..h as isize {
        for x in 0..w as isize {
            let idx = y as usize * w + x as usize;
            let m = grad.mag[idx];
            if m <= low {
                continue;
            }

            let dx = grad.dx[idx];
            let dy = grad.dy[idx];
            let xs = dx.abs() as f32;
            let ys = dy.abs() as f32;

            let is_max = if ys < xs * TAN_22_5_DEG {
                m > mag_at(x - 1, y) && m >= mag_at(x + 1, y)
            } else if ys > xs * TAN_67_5_DEG {
                m > mag_at(x, y - 1) && m >= mag_at(x, y + 1)
            } else {
                let s = if (dx ^ dy) < 0 { -1 } else { 1 };
                m > mag_at(x - s, y - 1) && m > mag_at(x + s, y + 1)
            };

            if is_max {
                states[idx] = if m > high {
                    EdgeState::Strong
                } else {
                    EdgeState::Weak
                };
            }
        }
    }
    states
}

fn hysteresis(mut states: Vec<EdgeState>, w: usize, h: usize) -> Vec<u8> {
    let mut stack: Vec<usize> = states
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == EdgeState::Strong)
        .map(|(i, _)| i)
        .collect();

    while let Some(idx) = stack.pop() {
        let x = (idx % w) as isize;
        let y = (idx / w) as isize;
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if states[n] == EdgeState::Weak {
                    states[n] = EdgeState::Strong;
                    stack.push(n);
                }
            }
        }
    }

    states
        .into_iter()
        .map(|s| if s == EdgeState::Strong { 255 } else { 0 })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = Image> {
        (1u32..=20, 1u32..=20, prop::bool::ANY).prop_flat_map(|(w, h, rgb)| {
            let channels = if rgb { Channels::Rgb } else { Channels::Gray };
            let len = (w * h) as usize * channels.count();
            prop::collection::vec(any::<u8>(), len..=len)
                .prop_map(move |pixels| Image::new(w, h, channels, pixels).unwrap())
        })
    }

    proptest! {
        /// Property: output is single-channel and binary for any input and thresholds.
        #[test]
        fn prop_binary_single_channel(
            img in image_strategy(),
            t1 in 0.0f64..=255.0,
            t2 in 0.0f64..=255.0,
        ) {
            let edges = canny(&img, t1, t2).unwrap();
            prop_assert_eq!(edges.channels, Channels::Gray);
            prop_assert_eq!(edges.pixels.len(), (img.width * img.height) as usize);
            prop_assert!(edges.pixels.iter().all(|&v| v == 0 || v == 255));
        }

        /// Property: same input, same output.
        #[test]
        fn prop_deterministic(img in image_strategy()) {
            prop_assert_eq!(canny(&img, 50.0, 150.0).unwrap(), canny(&img, 50.0, 150.0).unwrap());
        }
    }
}
