use crate::resize::config::ResizeConfig;
use crate::resize::errors::ResizeError;
use crate::resize::extractors::{ResizeForm, UploadedImage};
use crate::resize::requests::ResizeRequest;

/// Turns raw form fields into a [`ResizeRequest`].
///
/// Checks run in a fixed order and the first failure wins: required fields, dimensions,
/// content type, size. A field lost to a truncated body counts as too large, not as missing.
pub fn validate(form: ResizeForm, config: &ResizeConfig) -> Result<ResizeRequest, ResizeError> {
    let too_large = ResizeError::PayloadTooLarge {
        max_upload_bytes: config.max_upload_bytes,
    };
    let (image, width, height) = match form {
        ResizeForm {
            image: Some(image),
            width: Some(width),
            height: Some(height),
            ..
        } => (image, width, height),
        ResizeForm { truncated: true, .. } => return Err(too_large),
        _ => return Err(ResizeError::MissingField),
    };

    let width = parse_dimension(&width, config.max_output_dimension)?;
    let height = parse_dimension(&height, config.max_output_dimension)?;

    let UploadedImage {
        bytes,
        content_type,
        file_name,
        oversized,
    } = image;
    let mime_type = content_type
        .as_deref()
        .map(normalize_mime_type)
        .filter(|mime_type| config.allows_mime_type(mime_type))
        .ok_or(ResizeError::UnsupportedType)?;

    if oversized || bytes.len() > config.max_upload_bytes {
        return Err(too_large);
    }

    Ok(ResizeRequest {
        image_bytes: bytes,
        mime_type,
        original_file_name: file_name.unwrap_or_default(),
        width,
        height,
    })
}

/// Accepts a base 10 integer in `1..=max`, surrounding whitespace ignored.
pub fn parse_dimension(value: &str, max: u32) -> Result<u32, ResizeError> {
    let value: i64 = value
        .trim()
        .parse()
        .map_err(|_| ResizeError::InvalidDimensions)?;
    if value <= 0 || value > i64::from(max) {
        return Err(ResizeError::InvalidDimensions);
    }
    u32::try_from(value).map_err(|_| ResizeError::InvalidDimensions)
}

/// `Image/PNG; charset=binary` -> `image/png`.
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
