//! User-facing notifications.

use serde::Serialize;

use crate::error::{ExportError, ExtractionError, InvxError, UploadError};

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// A short message for the user, shown as a toast or a CLI status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }

    pub fn generating_excel() -> Self {
        Self::info("Generating Excel file", "Creating invoice export...")
    }

    pub fn no_data() -> Self {
        Self::destructive("No data to export", "There is no invoice data available to export")
    }

    pub fn export_successful() -> Self {
        Self::info("Export successful", "Invoice data has been exported to Excel")
    }

    pub fn export_failed() -> Self {
        Self::destructive("Export failed", "There was an error generating the Excel file")
    }

    pub fn csv_exported() -> Self {
        Self::info("Export successful", "Your data has been exported to CSV")
    }

    pub fn copied() -> Self {
        Self::info("Copied to clipboard", "Your data has been copied to the clipboard")
    }

    pub fn copy_failed() -> Self {
        Self::destructive("Copy failed", "Could not copy data to clipboard")
    }

    pub fn processing_complete() -> Self {
        Self::info("Processing complete", "Successfully extracted data from your invoice")
    }

    pub fn processing_error() -> Self {
        Self::destructive(
            "Processing error",
            "Failed to process the invoice. Please try again.",
        )
    }

    pub fn no_file_selected() -> Self {
        Self::destructive("No file selected", "Please upload an invoice image first")
    }
}

impl From<&UploadError> for Notice {
    fn from(err: &UploadError) -> Self {
        Notice::destructive(err.title(), err.description())
    }
}

impl From<&ExportError> for Notice {
    fn from(err: &ExportError) -> Self {
        match err {
            ExportError::NoData => Notice::no_data(),
            _ => Notice::export_failed(),
        }
    }
}

impl From<&ExtractionError> for Notice {
    fn from(err: &ExtractionError) -> Self {
        match err {
            ExtractionError::NoFileSelected => Notice::no_file_selected(),
            _ => Notice::processing_error(),
        }
    }
}

impl From<&InvxError> for Notice {
    fn from(err: &InvxError) -> Self {
        match err {
            InvxError::Upload(e) => e.into(),
            InvxError::Extraction(e) => e.into(),
            InvxError::Export(e) => e.into(),
            other => Notice::destructive("Error", other.to_string()),
        }
    }
}
