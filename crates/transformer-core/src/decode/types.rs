//! Types shared by the upload decoder.

use thiserror::Error;

/// Why an upload could not be turned into an image.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("upload is empty")]
    EmptyInput,

    #[error("unsupported image format: expected JPEG or PNG")]
    InvalidFormat,

    /// The format was recognized but the data did not decode.
    #[error("corrupted image data: {0}")]
    CorruptedFile(String),
}

/// Upload formats accepted by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            SourceFormat::Jpeg => image::ImageFormat::Jpeg,
            SourceFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Correction needed to show a photo upright, read from the EXIF
/// `Orientation` tag. Tag values 1 through 8 map to the variants in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Upright,
    Mirror,
    HalfTurn,
    MirrorHalfTurn,
    /// Mirror, then a quarter turn counter-clockwise.
    MirrorQuarterLeft,
    QuarterRight,
    /// Mirror, then a quarter turn clockwise.
    MirrorQuarterRight,
    QuarterLeft,
}

impl Orientation {
    /// Map an EXIF tag value. Out-of-range values read as upright.
    pub fn from_exif(tag: u32) -> Self {
        match tag {
            2 => Orientation::Mirror,
            3 => Orientation::HalfTurn,
            4 => Orientation::MirrorHalfTurn,
            5 => Orientation::MirrorQuarterLeft,
            6 => Orientation::QuarterRight,
            7 => Orientation::MirrorQuarterRight,
            8 => Orientation::QuarterLeft,
            _ => Orientation::Upright,
        }
    }
}
