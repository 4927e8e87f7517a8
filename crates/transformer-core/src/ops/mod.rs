//! The operator catalog.
//!
//! Every operator is a pure function from an image and resolved parameters to
//! a new image. Inputs are borrowed immutably; the base image handed to the
//! engine is never modified.
//!
//! Each submodule exposes a typed function (e.g. [`gaussian_blur`]) for direct
//! use, plus a `PARAMS` schema and an `apply` adapter the registry wires up.
//!
//! ## Catalog
//! - `color` - color-space conversion (BGR2GRAY, BGR2RGB, BGR2HSV, BGR2LAB)
//! - `linear` - linear scaling and the negative transform
//! - `blur` - Gaussian blur
//! - `bilateral` - edge-preserving bilateral filter
//! - `sharpen` - 3×3 sharpening kernel
//! - `edges` - Canny edge detection
//! - `stylize` - sepia and pencil sketch

pub mod bilateral;
pub mod blur;
pub mod color;
pub mod edges;
pub(crate) mod kernel;
pub mod linear;
pub mod sharpen;
pub mod stylize;

pub use bilateral::bilateral_filter;
pub use blur::{gaussian_blur, gaussian_kernel};
pub use color::{convert_color, ColorConversion};
pub use edges::canny;
pub use linear::{linear_transform, negative};
pub use sharpen::{filter2d, sharpen, SHARPEN_KERNEL};
pub use stylize::{pencil_sketch, sepia, SEPIA_MATRIX};

use crate::error::OpError;
use crate::params::Params;
use crate::raster::{Channels, Image};

/// Signature shared by every registered operator.
pub type OperatorFn = fn(&Image, &Params) -> Result<Output, OpError>;

/// What an operator hands back on success.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub image: Image,
    /// Non-fatal notice to show next to the result.
    pub warning: Option<String>,
}

impl From<Image> for Output {
    fn from(image: Image) -> Self {
        Self {
            image,
            warning: None,
        }
    }
}

impl Output {
    pub fn with_warning(image: Image, warning: impl Into<String>) -> Self {
        Self {
            image,
            warning: Some(warning.into()),
        }
    }
}

/// Validate the input shape and, optionally, its channel layout.
pub(crate) fn check_input(image: &Image, channels: Option<Channels>) -> Result<(), OpError> {
    image.validate()?;
    match channels {
        Some(expected) if expected != image.channels => Err(OpError::UnsupportedChannels {
            expected: expected.count(),
            actual: image.channels.count(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::raster::{Channels, Image};

    /// Deterministic pseudo-random RGB image (LCG).
    pub fn noise_rgb(width: u32, height: u32, seed: u32) -> Image {
        let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
        let len = (width * height * 3) as usize;
        let pixels = (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            })
            .collect();
        Image::new(width, height, Channels::Rgb, pixels).unwrap()
    }

    /// RGB image whose left half is black and right half is white.
    pub fn step_edge(width: u32, height: u32) -> Image {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0 } else { 255 };
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        Image::new(width, height, Channels::Rgb, pixels).unwrap()
    }
}
