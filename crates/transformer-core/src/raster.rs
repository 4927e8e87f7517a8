//! In-memory image representation shared by every operator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of interleaved samples per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channels {
    /// Single-channel (grayscale) samples.
    Gray,
    /// Three interleaved samples per pixel. The channel order is whatever the
    /// producer stored; decoded uploads are RGB.
    Rgb,
}

impl Channels {
    /// Samples per pixel.
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }

    /// Map a sample count back to a channel layout.
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(Channels::Gray),
            3 => Some(Channels::Rgb),
            _ => None,
        }
    }
}

/// Error raised when an image buffer does not match its declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// Pixel buffer length doesn't match width * height * channels
    #[error("Invalid pixel data: expected {expected} bytes for a {width}x{height} image, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    EmptyDimensions { width: u32, height: u32 },

    /// width * height * channels does not fit in memory on this target
    #[error("Invalid dimensions: a {width}x{height} image with {channels} channel(s) is too large")]
    TooLarge {
        width: u32,
        height: u32,
        channels: usize,
    },
}

/// An 8-bit image with 1 or 3 interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel layout of `pixels`.
    pub channels: Channels,
    /// Pixel data in row-major order.
    /// Length should be width * height * channels.
    pub pixels: Vec<u8>,
}

impl Image {
    /// Create an image, validating that the buffer matches the dimensions.
    pub fn new(
        width: u32,
        height: u32,
        channels: Channels,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let image = Self {
            width,
            height,
            channels,
            pixels,
        };
        image.validate()?;
        Ok(image)
    }

    /// Create an RGB image filled with a single color.
    pub fn filled_rgb(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, ImageError> {
        let len = checked_len(width, height, Channels::Rgb)?;
        let pixels = rgb.iter().copied().cycle().take(len).collect();
        Self::new(width, height, Channels::Rgb, pixels)
    }

    /// Create a grayscale image filled with a single value.
    pub fn filled_gray(width: u32, height: u32, value: u8) -> Result<Self, ImageError> {
        let len = checked_len(width, height, Channels::Gray)?;
        Self::new(width, height, Channels::Gray, vec![value; len])
    }

    /// Create an image from an `image::RgbImage`.
    pub fn from_rgb_image(img: ::image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgb,
            pixels: img.into_raw(),
        }
    }

    /// Check that the pixel buffer matches the declared shape.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::EmptyDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = checked_len(self.width, self.height, self.channels)?;
        if self.pixels.len() != expected {
            return Err(ImageError::BufferSize {
                width: self.width,
                height: self.height,
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Build a new image of the same size from a replacement buffer.
    pub(crate) fn with_pixels(&self, channels: Channels, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            Ok(pixels.len()),
            checked_len(self.width, self.height, channels),
            "Pixel buffer size mismatch"
        );
        Self {
            width: self.width,
            height: self.height,
            channels,
            pixels,
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the image has a single channel.
    pub fn is_grayscale(&self) -> bool {
        self.channels == Channels::Gray
    }
}

/// Buffer length for the given shape, or `TooLarge` if it overflows `usize`.
fn checked_len(width: u32, height: u32, channels: Channels) -> Result<usize, ImageError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels.count()))
        .ok_or(ImageError::TooLarge {
            width,
            height,
            channels: channels.count(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_creation() {
        let img = Image::new(100, 50, Channels::Rgb, vec![0u8; 100 * 50 * 3]).unwrap();
        assert_eq!(img.width, 100);
        assert_eq!(img.height, 50);
        assert_eq!(img.pixel_count(), 5000);
        assert!(!img.is_grayscale());
    }

    #[test]
    fn test_image_buffer_mismatch() {
        let err = Image::new(10, 10, Channels::Gray, vec![0u8; 99]).unwrap_err();
        assert_eq!(
            err,
            ImageError::BufferSize {
                width: 10,
                height: 10,
                expected: 100,
                actual: 99
            }
        );
    }

    #[test]
    fn test_image_empty_dimensions() {
        let err = Image::new(0, 10, Channels::Rgb, vec![]).unwrap_err();
        assert!(matches!(err, ImageError::EmptyDimensions { .. }));
    }

    #[test]
    fn test_validate_catches_hand_built_image() {
        let img = Image {
            width: 4,
            height: 4,
            channels: Channels::Rgb,
            pixels: vec![0u8; 16],
        };
        assert!(img.validate().is_err());
    }

    #[test]
    fn test_filled_constructors() {
        let rgb = Image::filled_rgb(2, 3, [1, 2, 3]).unwrap();
        assert_eq!(rgb.pixels.len(), 18);
        assert_eq!(&rgb.pixels[15..18], &[1, 2, 3]);

        let gray = Image::filled_gray(2, 3, 7).unwrap();
        assert!(gray.is_grayscale());
        assert!(gray.pixels.iter().all(|&v| v == 7));
    }

    #[test]
    fn test_rgb_image_conversion() {
        let src = ::image::RgbImage::from_pixel(3, 2, ::image::Rgb([10, 20, 30]));
        assert_eq!(Image::from_rgb_image(src), Image::filled_rgb(3, 2, [10, 20, 30]).unwrap());
    }

    #[test]
    fn test_oversized_hand_built_image_is_error() {
        let img = Image {
            width: u32::MAX,
            height: u32::MAX,
            channels: Channels::Rgb,
            pixels: vec![],
        };
        assert!(matches!(img.validate(), Err(ImageError::TooLarge { .. })));
    }

    #[test]
    fn test_checked_len_overflow() {
        assert_eq!(
            checked_len(u32::MAX, u32::MAX, Channels::Rgb),
            Err(ImageError::TooLarge {
                width: u32::MAX,
                height: u32::MAX,
                channels: 3
            })
        );
        assert_eq!(checked_len(4, 2, Channels::Rgb), Ok(24));
    }

    #[test]
    fn test_filled_rejects_empty_dimensions() {
        assert!(matches!(
            Image::filled_gray(0, 3, 1),
            Err(ImageError::EmptyDimensions { .. })
        ));
    }

    #[test]
    fn test_channels_from_count() {
        assert_eq!(Channels::from_count(1), Some(Channels::Gray));
        assert_eq!(Channels::from_count(3), Some(Channels::Rgb));
        assert_eq!(Channels::from_count(4), None);
    }
}
