use crate::resize::config::ResizeConfig;
use crate::resize::errors::TransformError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage, Rgba};
use std::io::Cursor;

/// What a single transform produces: exact output size, JPEG quality and the color that
/// transparent pixels are flattened onto.
#[derive(Debug, Clone, Copy)]
pub struct TransformParams {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub background: Rgb<u8>,
}

impl TransformParams {
    pub fn new(width: u32, height: u32, config: &ResizeConfig) -> Self {
        Self {
            width,
            height,
            quality: config.jpeg_quality,
            background: config.background,
        }
    }
}

/// Decodes `image_bytes`, stretches it to exactly `params.width` x `params.height` and encodes
/// the result as JPEG.
///
/// The format is sniffed from the bytes; `declared_mime_type` is only used when sniffing fails.
/// Every raster allocated here is dropped before returning.
pub fn resize(
    image_bytes: &[u8],
    declared_mime_type: &str,
    params: &TransformParams,
) -> Result<Vec<u8>, TransformError> {
    let image = decode(image_bytes, declared_mime_type)?;
    let resized_image = image.resize_exact(params.width, params.height, FilterType::Lanczos3);
    drop(image);
    let flattened_image = flatten(&resized_image, params.background);
    drop(resized_image);

    let mut resized_image_bytes_buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut resized_image_bytes_buffer, params.quality);
    flattened_image
        .write_with_encoder(encoder)
        .map_err(TransformError::Encode)?;

    Ok(resized_image_bytes_buffer.into_inner())
}

fn decode(image_bytes: &[u8], declared_mime_type: &str) -> Result<DynamicImage, TransformError> {
    let mut reader = ImageReader::new(Cursor::new(image_bytes))
        .with_guessed_format()
        .map_err(TransformError::FormatDetection)?;
    if reader.format().is_none() {
        if let Some(format) = declared_format(declared_mime_type) {
            reader.set_format(format);
        }
    }
    reader.decode().map_err(TransformError::Decode)
}

fn declared_format(mime_type: &str) -> Option<ImageFormat> {
    match mime_type {
        "image/jpg" => Some(ImageFormat::Jpeg),
        mime_type => ImageFormat::from_mime_type(mime_type),
    }
}

/// Composites the image over an opaque background, JPEG has no alpha channel.
fn flatten(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba_image = image.to_rgba8();
    RgbImage::from_fn(rgba_image.width(), rgba_image.height(), |x, y| {
        let Rgba([r, g, b, alpha]) = *rgba_image.get_pixel(x, y);
        let Rgb([bg_r, bg_g, bg_b]) = background;
        Rgb([
            blend(r, bg_r, alpha),
            blend(g, bg_g, alpha),
            blend(b, bg_b, alpha),
        ])
    })
}

fn blend(foreground: u8, background: u8, alpha: u8) -> u8 {
    let alpha = u16::from(alpha);
    let value = u16::from(foreground) * alpha + u16::from(background) * (255 - alpha) + 127;
    (value / 255) as u8
}
