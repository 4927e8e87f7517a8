//! Transformer Core - Image transformation library
//!
//! This crate provides a catalog of classic image operators (color-space
//! conversion, linear transforms, filters, edge detection and stylization),
//! a registry describing them, and an engine that applies a list of
//! invocations to one base image.
//!
//! # Module Structure
//!
//! - `raster` - the in-memory [`Image`] type
//! - `decode` - JPEG/PNG decoding with EXIF orientation
//! - `params` - parameter schemas and value resolution
//! - `ops` - the operators themselves
//! - `registry` - operator catalog grouped by [`Category`]
//! - `engine` - evaluates [`Invocation`]s into per-operator results
//! - `error` - error types shared by the above
//!
//! Pixels are interleaved 8-bit samples. Three-channel images are treated as
//! BGR by the color operators, matching the conventions of the classic
//! computer-vision toolkits these operators reproduce.

pub mod decode;
pub mod engine;
pub mod error;
pub mod ops;
pub mod params;
pub mod raster;
pub mod registry;

pub use engine::{run, Engine, Invocation, OperatorResult, Rendered};
pub use error::{OpError, PipelineError, RegistryError};
pub use params::{ParamKind, ParamSpec, ParamValue, Params};
pub use raster::{Channels, Image, ImageError};
pub use registry::{registry, Category, Registry, RegistryBuilder, RegistryEntry};

/// Crate version, for display alongside the WASM module version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
