use pictor_core::{AppError, PipelineConfig};
use std::io::{Read, Seek, SeekFrom};

use crate::image::ImageProcessor;

/// Validation errors for uploaded images
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,

    #[error("Unreadable image header: {0}")]
    InvalidHeader(String),

    #[error("Failed to rewind upload stream: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { size, max } => AppError::TooLarge { size, max },
            ValidationError::InvalidContentType { content_type, .. } => {
                AppError::UnsupportedType(content_type)
            }
            ValidationError::EmptyFile => AppError::InvalidImage("Empty file".to_string()),
            ValidationError::InvalidHeader(msg) => AppError::InvalidImage(msg),
            ValidationError::Io(e) => AppError::Io(e.to_string()),
        }
    }
}

/// Upload validator
///
/// Runs before any name is allocated or byte written.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_content_types.clone(),
        )
    }

    /// Validate declared file size. A size equal to the limit is accepted.
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate declared content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_content_type(content_type);

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Probe the image header and rewind the stream to byte zero.
    ///
    /// The stream is rewound whether or not the probe succeeds.
    pub fn validate_header<R: Read + Seek>(&self, stream: &mut R) -> Result<(u32, u32), ValidationError> {
        let probed = probe(stream);
        stream.seek(SeekFrom::Start(0))?;
        probed
    }

    /// Validate all aspects of an upload
    pub fn validate_all<R: Read + Seek>(
        &self,
        stream: &mut R,
        declared_size: u64,
        content_type: &str,
    ) -> Result<(u32, u32), ValidationError> {
        self.validate_file_size(declared_size)?;
        self.validate_content_type(content_type)?;
        self.validate_header(stream)
    }
}

/// Lower-case a content type and drop any `;` parameters.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

fn probe<R: Read + Seek>(stream: &mut R) -> Result<(u32, u32), ValidationError> {
    let len = stream.seek(SeekFrom::End(0))?;
    if len == 0 {
        return Err(ValidationError::EmptyFile);
    }
    stream.seek(SeekFrom::Start(0))?;

    ImageProcessor::probe_dimensions(&mut *stream)
        .map_err(|e| ValidationError::InvalidHeader(e.to_string()))
}
