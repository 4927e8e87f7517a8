//! JPEG/PNG upload decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;

use super::{DecodeError, Orientation, SourceFormat};
use crate::Image;

/// Detect whether the bytes hold a JPEG or PNG file.
///
/// Returns `DecodeError::InvalidFormat` for any other (or unrecognizable)
/// format.
pub fn sniff_format(bytes: &[u8]) -> Result<SourceFormat, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
        Ok(image::ImageFormat::Png) => Ok(SourceFormat::Png),
        _ => Err(DecodeError::InvalidFormat),
    }
}

/// Decode an uploaded image, applying EXIF orientation correction.
///
/// # Arguments
///
/// * `bytes` - Raw JPEG or PNG file bytes
///
/// # Returns
///
/// An RGB [`Image`] with the correct orientation applied. Grayscale and
/// alpha sources are converted to RGB.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` for an empty buffer,
/// `DecodeError::InvalidFormat` if the bytes are not JPEG or PNG, and
/// `DecodeError::CorruptedFile` if decoding fails part way.
pub fn decode_image(bytes: &[u8]) -> Result<Image, DecodeError> {
    let img = decode_dynamic(bytes)?;
    let orientation = extract_orientation(bytes);
    if orientation != Orientation::Upright {
        log::debug!("applying EXIF orientation {:?}", orientation);
    }
    Ok(Image::from_rgb_image(
        apply_orientation(img, orientation).into_rgb8(),
    ))
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let format = sniff_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format.to_image_format())
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    log::debug!(
        "decoded {:?} upload: {}x{}",
        format,
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Falls back to upright when there is no readable EXIF block.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Upright;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from_exif)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Upright => img,
        Orientation::Mirror => img.fliph(),
        Orientation::HalfTurn => img.rotate180(),
        Orientation::MirrorHalfTurn => img.flipv(),
        Orientation::MirrorQuarterLeft => img.fliph().rotate270(),
        Orientation::QuarterRight => img.rotate90(),
        Orientation::MirrorQuarterRight => img.fliph().rotate90(),
        Orientation::QuarterLeft => img.rotate270(),
    }
}
