//! Upload handling: file metadata, type/size validation and previews.

mod preview;

pub use preview::{PreviewRegistry, PreviewUrl};

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UploadError;
use crate::models::config::UploadConfig;

/// Metadata of a file offered for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFile {
    /// File name including extension.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type (empty when unknown).
    pub mime: String,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }

    /// Build from a file on disk, inferring the MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
            .unwrap_or_default()
            .to_string();

        Ok(Self { name, size, mime })
    }

    /// Name without extension (text before the first `.`).
    pub fn stem(&self) -> &str {
        self.name.split('.').next().unwrap_or_default()
    }

    /// Whether this is a PDF document.
    pub fn is_pdf(&self) -> bool {
        self.mime == "application/pdf"
    }
}

/// MIME type for a known file extension.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        "bmp" => Some("image/bmp"),
        "pdf" => Some("application/pdf"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// Check the file type first, then its size.
pub fn validate_upload(file: &UploadFile, limits: &UploadConfig) -> Result<(), UploadError> {
    if !limits.accepted_types.iter().any(|t| *t == file.mime) {
        debug!("Rejected {}: type {:?}", file.name, file.mime);
        return Err(UploadError::InvalidType {
            mime: file.mime.clone(),
        });
    }

    if file.size > limits.max_file_size {
        debug!("Rejected {}: {} bytes", file.name, file.size);
        return Err(UploadError::TooLarge {
            size: file.size,
            limit: limits.max_file_size,
        });
    }

    Ok(())
}

/// Pixel dimensions of an image upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    /// Read the image header. `None` for PDFs and undecodable files.
    pub fn from_path(path: &Path) -> Option<Self> {
        match image::image_dimensions(path) {
            Ok((width, height)) => Some(Self { width, height }),
            Err(e) => {
                debug!("No image dimensions for {}: {}", path.display(), e);
                None
            }
        }
    }
}
