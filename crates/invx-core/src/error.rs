//! Error types for the invx-core library.

use thiserror::Error;

/// Main error type for the invx library.
#[derive(Error, Debug)]
pub enum InvxError {
    /// Upload validation error.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Mock extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Spreadsheet export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while validating an uploaded file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The MIME type is not one of the accepted invoice formats.
    #[error("invalid file type: {mime}")]
    InvalidType { mime: String },

    /// The file exceeds the configured size cap.
    #[error("file too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
}

impl UploadError {
    /// Short title shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            UploadError::InvalidType { .. } => "Invalid file type",
            UploadError::TooLarge { .. } => "File too large",
        }
    }

    /// Longer description shown to the user.
    pub fn description(&self) -> String {
        match self {
            UploadError::InvalidType { .. } => {
                "Please upload an image (JPEG, PNG, WebP) or PDF file".to_string()
            }
            UploadError::TooLarge { limit, .. } => {
                format!("Maximum file size is {}", size_label(*limit))
            }
        }
    }
}

/// `10MB`, `1.5MB`, `512KB` or `100 bytes`.
fn size_label(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    let (unit, suffix) = match bytes {
        b if b >= MB => (MB, "MB"),
        b if b >= KB => (KB, "KB"),
        b => return format!("{} bytes", b),
    };
    if bytes % unit == 0 {
        format!("{}{}", bytes / unit, suffix)
    } else {
        format!("{:.1}{}", bytes as f64 / unit as f64, suffix)
    }
}

/// Errors related to the (mock) extraction pipeline.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// `process` was called before any file was selected.
    #[error("no file selected")]
    NoFileSelected,

    /// An image upload could not be decoded.
    #[error("could not read image file: {0}")]
    UnreadableImage(String),

    /// A JSON invoice file could not be read.
    #[error("failed to read invoice data from {path}: {reason}")]
    InvalidData { path: String, reason: String },
}

/// Errors related to spreadsheet generation.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export (null input or an empty array).
    #[error("no data to export")]
    NoData,

    /// Unknown template name.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// The XLSX writer failed.
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The CSV writer failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Delimited output was not valid UTF-8.
    #[error("delimited output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type for the invx library.
pub type Result<T> = std::result::Result<T, InvxError>;
