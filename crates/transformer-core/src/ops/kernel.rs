//! Shared convolution helpers for the neighborhood operators.
//!
//! All borders use reflect-101 addressing (`gfedcb|abcdefgh|gfedcba`), the
//! default border mode of the common computer-vision toolkits.

use crate::raster::Image;

/// Map a possibly out-of-range coordinate back into `[0, len)` using
/// reflect-101 addressing.
#[inline]
pub(crate) fn reflect101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    // Kernels wider than the image need more than one bounce
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}

/// Clamp a coordinate into `[0, len)` (replicate border).
#[inline]
pub(crate) fn replicate(index: isize, len: usize) -> usize {
    index.clamp(0, len as isize - 1) as usize
}

/// Round and saturate a filtered value to u8.
#[inline]
pub(crate) fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Apply a symmetric separable kernel horizontally then vertically.
///
/// `taps` must have odd length. Returns a buffer with the same shape as the
/// input.
pub(crate) fn separable_filter(image: &Image, taps: &[f32]) -> Vec<u8> {
    debug_assert!(taps.len() % 2 == 1, "kernel must have odd length");
    let w = image.width as usize;
    let h = image.height as usize;
    let cn = image.channels.count();
    let radius = (taps.len() / 2) as isize;

    let mut horizontal = vec![0.0f32; w * h * cn];
    for y in 0..h {
        let row = &image.pixels[y * w * cn..(y + 1) * w * cn];
        let out = &mut horizontal[y * w * cn..(y + 1) * w * cn];
        for x in 0..w {
            for c in 0..cn {
                let mut acc = 0.0f32;
                for (k, &tap) in taps.iter().enumerate() {
                    let sx = reflect101(x as isize + k as isize - radius, w);
                    acc += tap * row[sx * cn + c] as f32;
                }
                out[x * cn + c] = acc;
            }
        }
    }

    let mut output = vec![0u8; w * h * cn];
    for y in 0..h {
        for x in 0..w {
            for c in 0..cn {
                let mut acc = 0.0f32;
                for (k, &tap) in taps.iter().enumerate() {
                    let sy = reflect101(y as isize + k as isize - radius, h);
                    acc += tap * horizontal[(sy * w + x) * cn + c];
                }
                output[(y * w + x) * cn + c] = saturate_u8(acc);
            }
        }
    }
    output
}

/// Correlate every channel with a 3×3 kernel.
pub(crate) fn filter3x3(image: &Image, kernel: &[[f32; 3]; 3]) -> Vec<u8> {
    let w = image.width as usize;
    let h = image.height as usize;
    let cn = image.channels.count();
    let mut output = vec![0u8; w * h * cn];

    for y in 0..h {
        for x in 0..w {
            for c in 0..cn {
                let mut acc = 0.0f32;
                for (ky, kernel_row) in kernel.iter().enumerate() {
                    let sy = reflect101(y as isize + ky as isize - 1, h);
                    for (kx, &weight) in kernel_row.iter().enumerate() {
                        if weight == 0.0 {
                            continue;
                        }
                        let sx = reflect101(x as isize + kx as isize - 1, w);
                        acc += weight * image.pixels[(sy * w + sx) * cn + c] as f32;
                    }
                }
                output[(y * w + x) * cn + c] = saturate_u8(acc);
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Channels;

    #[test]
    fn test_reflect101_inside() {
        for i in 0..5 {
            assert_eq!(reflect101(i, 5), i as usize);
        }
    }

    #[test]
    fn test_reflect101_edges() {
        // gfedcb|abcdefgh|gfedcba
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
    }

    #[test]
    fn test_reflect101_wide_kernel_on_tiny_image() {
        assert_eq!(reflect101(-15, 1), 0);
        assert!(reflect101(-15, 2) < 2);
        assert!(reflect101(15, 3) < 3);
    }

    #[test]
    fn test_replicate() {
        assert_eq!(replicate(-3, 4), 0);
        assert_eq!(replicate(7, 4), 3);
        assert_eq!(replicate(2, 4), 2);
    }

    #[test]
    fn test_saturate_u8() {
        assert_eq!(saturate_u8(-4.0), 0);
        assert_eq!(saturate_u8(254.6), 255);
        assert_eq!(saturate_u8(300.0), 255);
        assert_eq!(saturate_u8(12.4), 12);
    }

    #[test]
    fn test_identity_taps_preserve_image() {
        let img = Image::new(3, 2, Channels::Gray, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(separable_filter(&img, &[1.0]), img.pixels);
        assert_eq!(separable_filter(&img, &[0.0, 1.0, 0.0]), img.pixels);
    }

    #[test]
    fn test_filter3x3_identity() {
        let img = Image::filled_rgb(4, 4, [9, 99, 199]).unwrap();
        let identity = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(filter3x3(&img, &identity), img.pixels);
    }

    #[test]
    fn test_box_filter_flat_image_is_flat() {
        let img = Image::filled_gray(5, 5, 80).unwrap();
        let taps = [1.0 / 3.0; 3];
        assert!(separable_filter(&img, &taps).iter().all(|&v| v == 80));
    }
}
