//! Upload decoding for the transformer pipeline.
//!
//! Turns the bytes of an uploaded JPEG or PNG file into an RGB [`Image`]
//! before anything reaches the operator catalog. A decode failure is an
//! input error: it is reported once and the pipeline is never entered.
//!
//! # Examples
//!
//! ```ignore
//! use transformer_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```
//!
//! [`Image`]: crate::Image

mod types;
mod upload;

pub use types::{DecodeError, SourceFormat};
pub(crate) use types::Orientation;
pub use upload::{decode_image, sniff_format};
