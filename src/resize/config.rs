use crate::cli::Args;
use crate::resize::consts::{
    ALLOWED_MIME_TYPES, BACKGROUND_COLOR, JPEG_QUALITY, MAX_OUTPUT_DIMENSION, MAX_UPLOAD_BYTES,
    MULTIPART_OVERHEAD_BYTES, TRANSFORM_TIMEOUT,
};
use image::Rgb;
use std::time::Duration;

/// Limits and output settings of the resize endpoint.
///
/// Built once at startup and shared by every request; tests build their own to tighten limits.
#[derive(Debug, Clone)]
pub struct ResizeConfig {
    pub max_upload_bytes: usize,
    pub allowed_mime_types: &'static [&'static str],
    pub jpeg_quality: u8,
    pub background: Rgb<u8>,
    pub max_output_dimension: u32,
    pub transform_timeout: Duration,
}

impl ResizeConfig {
    pub fn from_args(args: &Args) -> Self {
        let jpeg_quality = args.jpeg_quality.clamp(1, 100);
        if jpeg_quality != args.jpeg_quality {
            tracing::warn!(
                "JPEG quality {} is out of range, using {} instead.",
                args.jpeg_quality,
                jpeg_quality
            );
        }
        Self {
            max_upload_bytes: args.max_upload_bytes,
            jpeg_quality,
            max_output_dimension: args.max_output_dimension.max(1),
            transform_timeout: Duration::from_secs(args.transform_timeout_secs),
            ..Self::default()
        }
    }

    /// Body limit for the whole multipart request. Larger than the image ceiling so that an
    /// oversized image still reaches validation and gets a proper error.
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.contains(&mime_type)
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            allowed_mime_types: ALLOWED_MIME_TYPES,
            jpeg_quality: JPEG_QUALITY,
            background: BACKGROUND_COLOR,
            max_output_dimension: MAX_OUTPUT_DIMENSION,
            transform_timeout: TRANSFORM_TIMEOUT,
        }
    }
}
