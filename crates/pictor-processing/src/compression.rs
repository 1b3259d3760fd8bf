use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::DynamicImage;
use pictor_core::AppError;

use crate::image::FormatTag;

/// Encoders for persisted derivatives, one per [`FormatTag`].
///
/// Encode failures are reported as `AppError::Io`.
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode a derivative for the given source format.
    pub fn compress(img: &DynamicImage, format: FormatTag, jpeg_quality: u8) -> Result<Bytes, AppError> {
        match format {
            FormatTag::Jpeg => Self::compress_jpeg(img, jpeg_quality),
            FormatTag::Png => Self::compress_png(img),
            // WebP and anything else the decoder accepted is stored as JPEG
            FormatTag::Other => Self::compress_jpeg(img, jpeg_quality),
        }
    }

    /// Compress to JPEG, flattening any alpha channel.
    fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, AppError> {
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let mut buffer = Vec::new();

        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)
            .map_err(|e| AppError::Io(format!("JPEG encoding failed: {}", e)))?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to PNG at the strongest lossless setting
    fn compress_png(img: &DynamicImage) -> Result<Bytes, AppError> {
        let mut buffer = Vec::new();

        let encoder =
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);
        img.write_with_encoder(encoder)
            .map_err(|e| AppError::Io(format!("PNG encoding failed: {}", e)))?;

        Ok(Bytes::from(buffer))
    }
}

/// MIME type of the bytes [`ImageCompressor::compress`] produces for `format`.
pub fn output_mime_type(format: FormatTag) -> &'static str {
    match format {
        FormatTag::Png => "image/png",
        FormatTag::Jpeg | FormatTag::Other => "image/jpeg",
    }
}
