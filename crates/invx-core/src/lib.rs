//! Core library for the invx invoice extraction demo.
//!
//! This crate provides:
//! - Upload validation (type and size caps) and preview handles
//! - A simulated OCR/extraction pipeline returning canned data
//! - Normalization of loosely-typed invoice records into spreadsheet rows
//! - Construction, manufacturing and services invoice templates
//! - XLSX, CSV and TSV writers

pub mod error;
pub mod export;
pub mod extraction;
pub mod models;
pub mod notice;
pub mod session;
pub mod upload;

pub use error::{ExportError, ExtractionError, InvxError, Result, UploadError};
pub use export::{ExportedFile, InvoiceExporter, InvoiceTemplate, Normalizer, Sheet};
#[cfg(feature = "native")]
pub use extraction::MockPipeline;
pub use extraction::{ProcessingResult, ProcessingStage};
pub use models::config::InvxConfig;
pub use models::grid::{Grid, HighlightArea, ResultsTable};
pub use models::invoice::{ExportInput, Invoice, LineItem, Scalar};
pub use notice::{Notice, NoticeVariant};
pub use session::{Session, Tab};
pub use upload::{validate_upload, PreviewRegistry, PreviewUrl, UploadFile};
