//! Export entry points tying normalization, layout and writers together.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use super::delimited::grid_to_csv;
use super::filename::{csv_filename, export_filename, timestamped_filename};
use super::laser::{laser_cutting_sample, MANUFACTURING_SHEET};
use super::normalize::{aggregate, Normalizer};
use super::sheet::Sheet;
use super::templates::InvoiceTemplate;
use super::xlsx::write_xlsx;
use crate::error::ExportError;
use crate::extraction::extract_table_from_text;
use crate::models::config::ExportConfig;
use crate::models::grid::Grid;
use crate::models::invoice::{ExportInput, Invoice};
use crate::notice::Notice;

/// Sheet name of the summary export.
pub const SUMMARY_SHEET: &str = "Invoice Data";

/// Sheet name of table exports from OCR text.
pub const EXTRACTED_SHEET: &str = "Extracted Data";

/// A generated file, ready to be downloaded or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write the file into `dir`, creating it if needed.
    pub fn save_in(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!("Saved {}", path.display());
        Ok(path)
    }
}

/// Outcome of a summary export: the notices shown along the way and the
/// generated workbook.
#[derive(Debug)]
pub struct SummaryExport {
    pub notices: Vec<Notice>,
    pub result: Result<ExportedFile, ExportError>,
}

impl SummaryExport {
    pub fn file(&self) -> Option<&ExportedFile> {
        self.result.as_ref().ok()
    }

    /// The final notice (success or failure).
    pub fn outcome(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

/// Spreadsheet exporter.
#[derive(Debug, Clone)]
pub struct InvoiceExporter {
    config: ExportConfig,
    normalizer: Normalizer,
}

impl InvoiceExporter {
    pub fn new(config: ExportConfig, normalizer: Normalizer) -> Self {
        let normalizer = normalizer.with_config(&config);
        Self { config, normalizer }
    }

    /// Exporter with a randomly seeded normalizer.
    #[cfg(feature = "native")]
    pub fn with_config(config: ExportConfig) -> Self {
        Self::new(config, Normalizer::new())
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Normalized manufacturing layout of `input`.
    pub fn summary_sheet(&mut self, input: &ExportInput) -> Sheet {
        let normalized = self.normalizer.normalize(input);
        Sheet::manufacturing(SUMMARY_SHEET, &normalized)
    }

    /// Export any invoice-like data as one "Invoice Data" workbook.
    ///
    /// Missing data and an empty list are rejected; writer failures are
    /// reported as a failed export.
    pub fn export_summary(&mut self, input: Option<&ExportInput>, today: NaiveDate) -> SummaryExport {
        let mut notices = vec![Notice::generating_excel()];

        let input = match input {
            Some(input) if !input.is_empty() => input,
            _ => {
                warn!("Nothing to export");
                notices.push(Notice::no_data());
                return SummaryExport {
                    notices,
                    result: Err(ExportError::NoData),
                };
            }
        };

        let sheet = self.summary_sheet(input);
        debug!("Summary sheet has {} item rows", sheet.rows.len().saturating_sub(3));

        let result = write_xlsx(&[sheet]).map(|bytes| ExportedFile {
            file_name: export_filename(input, today),
            bytes,
        });

        match &result {
            Ok(file) => {
                info!("Exported {}", file.file_name);
                notices.push(Notice::export_successful());
            }
            Err(e) => {
                warn!("Excel generation error: {}", e);
                notices.push(Notice::export_failed());
            }
        }

        SummaryExport { notices, result }
    }

    /// Export one invoice (or the template's sample) through a template.
    pub fn export_template(
        &self,
        template: InvoiceTemplate,
        invoice: Option<&Invoice>,
        today: NaiveDate,
    ) -> Result<ExportedFile, ExportError> {
        let source = invoice.unwrap_or_else(|| template.sample());
        let file_name = export_filename(&ExportInput::One(source.clone()), today);
        let sheet = template.render(invoice);

        info!("Rendering {} template as {}", template, file_name);
        Ok(ExportedFile {
            file_name,
            bytes: write_xlsx(&[sheet])?,
        })
    }

    /// Combine extracted records into one manufacturing workbook named
    /// after the configured export prefix.
    pub fn export_aggregate(
        &self,
        invoices: &[Invoice],
        now: NaiveDateTime,
    ) -> Result<ExportedFile, ExportError> {
        if invoices.is_empty() {
            return Err(ExportError::NoData);
        }

        let sheet = Sheet::manufacturing(MANUFACTURING_SHEET, &aggregate(invoices));
        Ok(ExportedFile {
            file_name: timestamped_filename(&self.config.export_name, now),
            bytes: write_xlsx(&[sheet])?,
        })
    }

    /// The built-in laser cutting invoice.
    pub fn export_laser_sample(
        &self,
        prefix: &str,
        now: NaiveDateTime,
    ) -> Result<ExportedFile, ExportError> {
        let sheet = Sheet::manufacturing(MANUFACTURING_SHEET, &laser_cutting_sample());
        Ok(ExportedFile {
            file_name: timestamped_filename(prefix, now),
            bytes: write_xlsx(&[sheet])?,
        })
    }

    /// Write an extracted table to an "Extracted Data" workbook named
    /// after the source file.
    pub fn export_extracted_grid(
        &self,
        grid: &Grid,
        source_name: &str,
    ) -> Result<ExportedFile, ExportError> {
        if grid.is_empty() {
            return Err(ExportError::NoData);
        }

        let base = source_name.split('.').next().unwrap_or_default();
        Ok(ExportedFile {
            file_name: format!("{}_processed.xlsx", base),
            bytes: write_xlsx(&[Sheet::new(EXTRACTED_SHEET, grid.clone())])?,
        })
    }

    /// Split OCR text into a table and export it.
    pub fn export_extracted_text(
        &self,
        text: &str,
        source_name: &str,
    ) -> Result<ExportedFile, ExportError> {
        self.export_extracted_grid(&extract_table_from_text(text), source_name)
    }

    /// CSV download of an extracted table.
    pub fn export_csv(&self, grid: &Grid, today: NaiveDate) -> Result<ExportedFile, ExportError> {
        if grid.is_empty() {
            return Err(ExportError::NoData);
        }

        Ok(ExportedFile {
            file_name: csv_filename(today),
            bytes: grid_to_csv(grid)?.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::xlsx::tests::read_sheet;
    use crate::extraction::mock;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn exporter() -> InvoiceExporter {
        InvoiceExporter::new(ExportConfig::default(), Normalizer::with_seed(3))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(8, 15, 0).unwrap()
    }

    #[test]
    fn test_summary_export_success() {
        let input = ExportInput::from_value(json!([
            {"invoiceNumber": "INV-1", "items": [{"description": "Widget", "quantity": 5, "total": "50.00"}]},
            {"invoiceNumber": "INV-2", "total": "75.00", "stateName": "Goa"}
        ]))
        .unwrap()
        .unwrap();

        let export = exporter().export_summary(Some(&input), today());

        let titles: Vec<&str> = export.notices.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Generating Excel file", "Export successful"]);

        let file = export.file().unwrap();
        assert_eq!(file.file_name, "Invoice_INV-1_and_1_others.xlsx");

        let grid = read_sheet(&file.bytes, SUMMARY_SHEET);
        assert_eq!(grid[0][2], "Goa");
        assert_eq!(grid[0][7], "Standard");
        assert_eq!(grid[2][0], "SI No.");
        assert_eq!(grid[3][..6].to_vec(), vec!["1", "INV-1", "Widget", "", "5 Nos.", "0.00"]);
        assert_eq!(grid[4][1], "INV-2");
        assert_eq!(grid[4][2], "Invoice total");
        assert_eq!(grid[4][8], "75.00");
    }

    #[test]
    fn test_summary_export_without_data() {
        let mut exporter = exporter();

        let export = exporter.export_summary(None, today());
        assert!(matches!(export.result, Err(ExportError::NoData)));
        assert_eq!(export.outcome(), Some(&Notice::no_data()));

        let empty = ExportInput::Many(Vec::new());
        let export = exporter.export_summary(Some(&empty), today());
        assert_eq!(export.notices.len(), 2);
        assert!(export.outcome().unwrap().is_destructive());
    }

    #[test]
    fn test_single_invoice_summary_name() {
        let input = ExportInput::from_value(json!({"fileName": "scan.png"})).unwrap().unwrap();
        let export = exporter().export_summary(Some(&input), today());

        let file = export.file().unwrap();
        assert_eq!(file.file_name, "scan_processed.xlsx");
        let grid = read_sheet(&file.bytes, SUMMARY_SHEET);
        assert_eq!(grid[4][2], "Source: scan.png");
    }

    #[test]
    fn test_template_export() {
        let file = exporter()
            .export_template(InvoiceTemplate::Construction, None, today())
            .unwrap();
        assert_eq!(file.file_name, "Invoice_INV-2023-001.xlsx");

        let grid = read_sheet(&file.bytes, "Construction Invoice");
        assert_eq!(grid[1][1], "INV-2023-001");
    }

    #[test]
    fn test_aggregate_export() {
        let invoices: Vec<Invoice> = serde_json::from_value(json!([
            {"invoiceNumber": "INV-a", "total": "$1,234.56"},
            {"invoiceNumber": "INV-b", "items": [{"description": "Laser Cut Item", "quantity": 10}]}
        ]))
        .unwrap();

        let file = exporter().export_aggregate(&invoices, now()).unwrap();
        assert_eq!(file.file_name, "Invoice_Export_20240630_081500.xlsx");

        let grid = read_sheet(&file.bytes, MANUFACTURING_SHEET);
        assert_eq!(grid[0][2], "Aggregated Invoices");
        assert_eq!(grid[3][2], "Invoice Total");
        assert_eq!(grid[3][8], "$1,234.56");
        assert_eq!(grid[4][4], "10");

        assert!(matches!(
            exporter().export_aggregate(&[], now()),
            Err(ExportError::NoData)
        ));
    }

    #[test]
    fn test_laser_sample_export() {
        let file = exporter()
            .export_laser_sample("Laser_Cutting_Invoice", now())
            .unwrap();
        assert_eq!(file.file_name, "Laser_Cutting_Invoice_20240630_081500.xlsx");

        let grid = read_sheet(&file.bytes, MANUFACTURING_SHEET);
        assert_eq!(grid.len(), 14);
        assert_eq!(grid[0][2], "Karnataka, Code : 29");
        assert_eq!(grid[0][7], "As per terms");
        assert_eq!(grid[13][1], "Laser Cutting-MIT-EA214C825-01LS2");
    }

    #[test]
    fn test_extracted_text_and_csv() {
        let exporter = exporter();

        let file = exporter
            .export_extracted_text(mock::MOCK_OCR_TEXT, "invoice.scan.png")
            .unwrap();
        assert_eq!(file.file_name, "invoice_processed.xlsx");
        let grid = read_sheet(&file.bytes, EXTRACTED_SHEET);
        assert_eq!(grid[0][0], "Invoice #: 1234567");

        let csv = exporter.export_csv(&mock::structured_items(), today()).unwrap();
        assert_eq!(csv.file_name, "invoice_data_2024-06-30.csv");
        assert!(String::from_utf8(csv.bytes).unwrap().starts_with("Item Description,Quantity"));

        assert!(exporter.export_csv(&Vec::new(), today()).is_err());
    }

    #[test]
    fn test_save_in_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = ExportedFile {
            file_name: "a.csv".into(),
            bytes: b"x\n".to_vec(),
        };

        let path = file.save_in(&dir.path().join("nested")).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"x\n");
    }
}
