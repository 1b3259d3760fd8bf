//! Image processor - header probing and full decoding

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use pictor_core::AppError;
use std::io::{BufReader, Read, Seek};

/// Encoder family chosen for a decoded image.
///
/// Anything that is neither JPEG nor PNG is re-encoded as JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    Jpeg,
    Png,
    Other,
}

impl From<ImageFormat> for FormatTag {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => FormatTag::Jpeg,
            ImageFormat::Png => FormatTag::Png,
            _ => FormatTag::Other,
        }
    }
}

/// A fully decoded raster and the format it was read from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: FormatTag,
}

impl DecodedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Container formats accepted for ingestion. Animated and legacy formats are not.
pub const ACCEPTED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

fn detected_format(format: Option<ImageFormat>) -> Result<ImageFormat, String> {
    match format {
        Some(format) if ACCEPTED_FORMATS.contains(&format) => Ok(format),
        Some(format) => Err(format!("Unsupported image format: {:?}", format)),
        None => Err("Unrecognized image format".to_string()),
    }
}

pub struct ImageProcessor;

impl ImageProcessor {
    /// Read only as much of the stream as needed to learn the dimensions.
    ///
    /// The sniffed container must be one of [`ACCEPTED_FORMATS`], whatever
    /// content type the client declared.
    ///
    /// Leaves the stream position wherever the header parser stopped.
    pub fn probe_dimensions<R: Read + Seek>(stream: R) -> Result<(u32, u32), AppError> {
        let reader = ImageReader::new(BufReader::new(stream))
            .with_guessed_format()
            .map_err(|e| AppError::InvalidImage(e.to_string()))?;

        detected_format(reader.format()).map_err(AppError::InvalidImage)?;

        reader
            .into_dimensions()
            .map_err(|e| AppError::InvalidImage(e.to_string()))
    }

    /// Fully decode the stream into a raster.
    pub fn decode<R: Read + Seek>(stream: R) -> Result<DecodedImage, AppError> {
        let reader = ImageReader::new(BufReader::new(stream))
            .with_guessed_format()
            .map_err(|e| AppError::DecodeFailed(e.to_string()))?;

        let format = detected_format(reader.format())
            .map(FormatTag::from)
            .map_err(AppError::DecodeFailed)?;

        let image = reader
            .decode()
            .map_err(|e| AppError::DecodeFailed(e.to_string()))?;

        Ok(DecodedImage { image, format })
    }
}
