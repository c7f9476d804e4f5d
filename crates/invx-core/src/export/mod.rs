//! Spreadsheet export: normalization, templates, layouts and writers.

mod delimited;
mod exporter;
pub mod filename;
mod laser;
pub mod normalize;
mod sheet;
pub mod templates;
mod xlsx;

pub use delimited::{grid_to_csv, grid_to_tsv};
pub use exporter::{ExportedFile, InvoiceExporter, SummaryExport, EXTRACTED_SHEET, SUMMARY_SHEET};
pub use filename::{csv_filename, export_filename, timestamped_filename};
pub use laser::{laser_cutting_sample, MANUFACTURING_SHEET};
pub use normalize::{aggregate, ExportRow, NormalizedSheet, Normalizer};
pub use sheet::{Sheet, MANUFACTURING_HEADERS, MANUFACTURING_WIDTHS};
pub use templates::{parse_amount, InvoiceTemplate};
pub use xlsx::write_xlsx;
