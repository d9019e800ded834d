//! Responsive WebP variants of uploaded images.

use std::io::Cursor;

use image::imageops::FilterType;
use image::ImageReader;
use webp::Encoder;

use crate::error::CoreError;

/// A target width and the WebP quality (0-100) it is encoded at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSpec {
    pub width: u32,
    pub quality: f32,
}

/// Variants generated for every decodable image, ascending by width.
pub const VARIANT_SPECS: &[VariantSpec] = &[
    VariantSpec { width: 480, quality: 60.0 },
    VariantSpec { width: 768, quality: 75.0 },
    VariantSpec { width: 1280, quality: 85.0 },
];

/// One encoded variant.
#[derive(Debug, Clone)]
pub struct EncodedVariant {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Decode `data` and encode one WebP per [`VARIANT_SPECS`] entry that is not
/// wider than the source. Aspect ratio is preserved.
///
/// CPU bound: call from a blocking context.
pub fn encode_variants(data: &[u8]) -> Result<Vec<EncodedVariant>, CoreError> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CoreError::Validation(format!("Failed to read image: {e}")))?
        .decode()
        .map_err(|e| CoreError::Validation(format!("Failed to decode image: {e}")))?;

    let source_width = img.width();

    let variants = VARIANT_SPECS
        .iter()
        .filter(|spec| spec.width <= source_width)
        .map(|spec| {
            let resized = img.resize(spec.width, u32::MAX, FilterType::Lanczos3);
            let rgba = resized.to_rgba8();
            let encoded = Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                .encode(spec.quality);
            EncodedVariant {
                width: rgba.width(),
                height: rgba.height(),
                data: encoded.to_vec(),
            }
        })
        .collect();

    Ok(variants)
}
