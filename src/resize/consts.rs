use image::Rgb;
use std::time::Duration;

pub const IMAGE_FIELD: &str = "image";
pub const WIDTH_FIELD: &str = "width";
pub const HEIGHT_FIELD: &str = "height";

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];
pub const JPEG_QUALITY: u8 = 90;
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const MAX_OUTPUT_DIMENSION: u32 = 8192;
pub const TRANSFORM_TIMEOUT: Duration = Duration::from_secs(30);

/// Room for multipart boundaries and the text fields on top of the image itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";
pub const FALLBACK_FILE_NAME: &str = "image";
