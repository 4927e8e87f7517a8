//! Color-space conversion.
//!
//! The conversion identifiers follow the `BGR2*` naming: channel 0 is read as
//! blue, channel 1 as green and channel 2 as red. All conversions use the
//! standard 8-bit formulas:
//!
//! - `BGR2GRAY`: `Y = 0.299 R + 0.587 G + 0.114 B` in 14-bit fixed point
//! - `BGR2RGB`: swap channels 0 and 2
//! - `BGR2HSV`: `H` in `[0, 180)`, `S` and `V` in `[0, 255]`
//! - `BGR2LAB`: sRGB → linear → XYZ (D65) → CIE L*a*b*, packed as
//!   `L * 255 / 100`, `a + 128`, `b + 128`
//!
//! An unknown identifier is not an error: the input comes back unchanged with
//! an "Unsupported" warning.

use super::{check_input, Output};
use crate::error::OpError;
use crate::params::{ParamSpec, Params};
use crate::raster::{Channels, Image};

/// Identifiers offered to the presentation layer.
pub const CONVERSIONS: &[&str] = &["BGR2GRAY", "BGR2RGB", "BGR2HSV", "BGR2LAB"];

pub const PARAMS: &[ParamSpec] = &[ParamSpec::choice(
    "conversion",
    "Choose a color space:",
    CONVERSIONS,
    "BGR2GRAY",
)];

/// Supported conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorConversion {
    BgrToGray,
    BgrToRgb,
    BgrToHsv,
    BgrToLab,
}

impl ColorConversion {
    /// Parse a conversion identifier. Returns `None` for unsupported names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "BGR2GRAY" => Some(ColorConversion::BgrToGray),
            "BGR2RGB" => Some(ColorConversion::BgrToRgb),
            "BGR2HSV" => Some(ColorConversion::BgrToHsv),
            "BGR2LAB" => Some(ColorConversion::BgrToLab),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorConversion::BgrToGray => "BGR2GRAY",
            ColorConversion::BgrToRgb => "BGR2RGB",
            ColorConversion::BgrToHsv => "BGR2HSV",
            ColorConversion::BgrToLab => "BGR2LAB",
        }
    }
}

/// Convert a 3-channel image.
///
/// # Errors
///
/// Returns `OpError::UnsupportedChannels` for single-channel input.
pub fn convert_color(image: &Image, conversion: ColorConversion) -> Result<Image, OpError> {
    check_input(image, Some(Channels::Rgb))?;

    let image = match conversion {
        ColorConversion::BgrToGray => {
            let pixels = image
                .pixels
                .chunks_exact(3)
                .map(|p| bgr_to_gray(p[0], p[1], p[2]))
                .collect();
            image.with_pixels(Channels::Gray, pixels)
        }
        ColorConversion::BgrToRgb => map_triples(image, |b, g, r| [r, g, b]),
        ColorConversion::BgrToHsv => map_triples(image, bgr_to_hsv),
        ColorConversion::BgrToLab => map_triples(image, bgr_to_lab),
    };
    Ok(image)
}

pub(crate) fn apply(image: &Image, params: &Params) -> Result<Output, OpError> {
    let name = params.text("conversion")?;
    match ColorConversion::from_name(name) {
        Some(conversion) => convert_color(image, conversion).map(Output::from),
        None => {
            log::warn!("color space '{}' not supported; passing image through", name);
            Ok(Output::with_warning(
                image.clone(),
                format!("Unsupported: color space '{}' not supported.", name),
            ))
        }
    }
}

fn map_triples(image: &Image, f: impl Fn(u8, u8, u8) -> [u8; 3]) -> Image {
    let mut pixels = Vec::with_capacity(image.pixels.len());
    for p in image.pixels.chunks_exact(3) {
        pixels.extend_from_slice(&f(p[0], p[1], p[2]));
    }
    image.with_pixels(Channels::Rgb, pixels)
}

const GRAY_SHIFT: u32 = 14;
const GRAY_B: u32 = 1868;
const GRAY_G: u32 = 9617;
const GRAY_R: u32 = 4899;

/// Luma of a BGR triple.
#[inline]
pub(crate) fn bgr_to_gray(b: u8, g: u8, r: u8) -> u8 {
    let y = b as u32 * GRAY_B + g as u32 * GRAY_G + r as u32 * GRAY_R + (1 << (GRAY_SHIFT - 1));
    (y >> GRAY_SHIFT) as u8
}

const HSV_SHIFT: i32 = 12;
const HUE_RANGE: i32 = 180;

fn bgr_to_hsv(b: u8, g: u8, r: u8) -> [u8; 3] {
    let (b, g, r) = (b as i32, g as i32, r as i32);
    let v = b.max(g).max(r);
    let vmin = b.min(g).min(r);
    let diff = v - vmin;
    let round = 1 << (HSV_SHIFT - 1);

    let s = if v == 0 {
        0
    } else {
        let sdiv = ((255 << HSV_SHIFT) as f64 / v as f64).round() as i32;
        (diff * sdiv + round) >> HSV_SHIFT
    };

    let mut h = if diff == 0 {
        0
    } else {
        let hue = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let hdiv = ((HUE_RANGE << HSV_SHIFT) as f64 / (6.0 * diff as f64)).round() as i32;
        (hue * hdiv + round) >> HSV_SHIFT
    };
    if h < 0 {
        h += HUE_RANGE;
    }

    [h as u8, s as u8, v as u8]
}

// sRGB D65 RGB -> XYZ, with X and Z pre-divided by the white point
const XYZ_WHITE_X: f32 = 0.950456;
const XYZ_WHITE_Z: f32 = 1.088754;
const LAB_EPSILON: f32 = 0.008856;
const LAB_KAPPA: f32 = 903.3;

#[inline]
fn srgb_to_linear(v: u8) -> f32 {
    let c = v as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn bgr_to_lab(b: u8, g: u8, r: u8) -> [u8; 3] {
    let (r, g, b) = (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));

    let x = (0.412453 * r + 0.357580 * g + 0.180423 * b) / XYZ_WHITE_X;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = (0.019334 * r + 0.119193 * g + 0.950227 * b) / XYZ_WHITE_Z;

    let l = if y > LAB_EPSILON {
        116.0 * y.cbrt() - 16.0
    } else {
        LAB_KAPPA * y
    };
    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
    let a = 500.0 * (fx - fy) + 128.0;
    let bb = 200.0 * (fy - fz) + 128.0;

    [
        (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8,
        a.round().clamp(0.0, 255.0) as u8,
        bb.round().clamp(0.0, 255.0) as u8,
    ]
}
