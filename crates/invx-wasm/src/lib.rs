//! WASM bindings for in-browser invoice export.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use invx_core::export::{self, Normalizer};
use invx_core::extraction::{self, mock};
use invx_core::models::config::{ExportConfig, UploadConfig};
use invx_core::{
    ExportInput, ExportedFile, Grid, Invoice, InvoiceExporter, InvoiceTemplate, Notice,
    ProcessingResult, ProcessingStage, UploadFile,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn grid_from_js(grid: JsValue) -> Result<Grid, JsValue> {
    serde_wasm_bindgen::from_value(grid).map_err(js_error)
}

fn input_from_js(data: JsValue) -> Result<Option<ExportInput>, JsValue> {
    if data.is_undefined() || data.is_null() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_wasm_bindgen::from_value(data).map_err(js_error)?;
    ExportInput::from_value(value).map_err(js_error)
}

/// Local time from the JS clock.
fn js_now() -> NaiveDateTime {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .and_then(|d| d.and_hms_opt(now.get_hours(), now.get_minutes(), now.get_seconds()))
        .unwrap_or_default()
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Validate a file picked by the user.
///
/// Returns `null` when the file is accepted, otherwise the notice to show.
#[wasm_bindgen]
pub fn validate_upload(name: &str, size: f64, mime: &str) -> Result<JsValue, JsValue> {
    let file = UploadFile::new(name, size as u64, mime);
    match invx_core::validate_upload(&file, &UploadConfig::default()) {
        Ok(()) => Ok(JsValue::NULL),
        Err(e) => to_js(&Notice::from(&e)),
    }
}

/// Stages of the simulated pipeline with their start offsets.
#[wasm_bindgen]
pub fn processing_stages() -> Result<JsValue, JsValue> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Stage {
        stage: ProcessingStage,
        message: &'static str,
        offset_ms: u64,
    }

    let stages: Vec<Stage> = ProcessingStage::ALL
        .iter()
        .map(|s| Stage {
            stage: *s,
            message: s.message(),
            offset_ms: s.offset_ms(),
        })
        .collect();

    to_js(&stages)
}

/// The canned result of the simulated pipeline (`{data, highlightAreas}`).
#[wasm_bindgen]
pub fn mock_processing_result() -> Result<JsValue, JsValue> {
    to_js(&ProcessingResult {
        data: mock::invoice_table(),
        highlight_areas: mock::INVOICE_HIGHLIGHTS.to_vec(),
    })
}

/// Highlight rectangles of the canned result in pixels, `[x, y, width, height]`
/// each, for an image of the given size.
#[wasm_bindgen]
pub fn highlight_pixels(image_width: u32, image_height: u32) -> Result<JsValue, JsValue> {
    let rects: Vec<[u32; 4]> = mock::INVOICE_HIGHLIGHTS
        .iter()
        .map(|area| {
            let (x, y, w, h) = area.to_pixels(image_width, image_height);
            [x, y, w, h]
        })
        .collect();
    to_js(&rects)
}

/// Split OCR text into table rows.
#[wasm_bindgen]
pub fn extract_table_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&extraction::extract_table_from_text(text))
}

/// Material ID embedded in a part number, if any.
#[wasm_bindgen]
pub fn extract_material_id(part_no: &str) -> Option<String> {
    extraction::extract_material_id(part_no)
}

/// Serialize a table as CSV.
#[wasm_bindgen]
pub fn grid_to_csv(grid: JsValue) -> Result<String, JsValue> {
    export::grid_to_csv(&grid_from_js(grid)?).map_err(js_error)
}

/// Serialize a table as tab-separated text for the clipboard.
#[wasm_bindgen]
pub fn grid_to_tsv(grid: JsValue) -> Result<String, JsValue> {
    Ok(export::grid_to_tsv(&grid_from_js(grid)?))
}

/// Download name for exporting `data`.
#[wasm_bindgen]
pub fn export_filename(data: JsValue) -> Result<String, JsValue> {
    let input = input_from_js(data)?.unwrap_or(ExportInput::Many(Vec::new()));
    Ok(export::export_filename(&input, js_now().date()))
}

/// A generated download.
#[wasm_bindgen]
pub struct ExportedFileJs {
    file: ExportedFile,
}

#[wasm_bindgen]
impl ExportedFileJs {
    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file.file_name.clone()
    }

    /// File contents.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.file.bytes.clone()
    }
}

impl From<ExportedFile> for ExportedFileJs {
    fn from(file: ExportedFile) -> Self {
        Self { file }
    }
}

/// Result of a summary export: the notices to show and the file, if any.
#[wasm_bindgen]
pub struct SummaryExportJs {
    notices: Vec<Notice>,
    file: Option<ExportedFile>,
}

#[wasm_bindgen]
impl SummaryExportJs {
    #[wasm_bindgen(getter)]
    pub fn notices(&self) -> Result<JsValue, JsValue> {
        to_js(&self.notices)
    }

    #[wasm_bindgen(getter)]
    pub fn file(&self) -> Option<ExportedFileJs> {
        self.file.clone().map(ExportedFileJs::from)
    }
}

/// Spreadsheet exporter for browser use.
#[wasm_bindgen]
pub struct InvoiceExporterJs {
    exporter: InvoiceExporter,
}

#[wasm_bindgen]
impl InvoiceExporterJs {
    /// Create an exporter with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_seed(random_seed())
    }

    /// Exporter with reproducible placeholder IDs.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            exporter: InvoiceExporter::new(ExportConfig::default(), Normalizer::with_seed(seed)),
        }
    }

    /// Export one invoice or an array of invoices as an "Invoice Data" workbook.
    #[wasm_bindgen(js_name = exportSummary)]
    pub fn export_summary(&mut self, data: JsValue) -> Result<SummaryExportJs, JsValue> {
        let input = input_from_js(data)?;
        let export = self.exporter.export_summary(input.as_ref(), js_now().date());

        Ok(SummaryExportJs {
            file: export.result.ok(),
            notices: export.notices,
        })
    }

    /// Normalized rows as they appear in the summary workbook.
    #[wasm_bindgen(js_name = summaryRows)]
    pub fn summary_rows(&mut self, data: JsValue) -> Result<JsValue, JsValue> {
        let Some(input) = input_from_js(data)? else {
            return to_js(&Grid::new());
        };
        to_js(&self.exporter.summary_sheet(&input).rows)
    }

    /// Render `data` (or the template's sample) through a named template.
    #[wasm_bindgen(js_name = exportTemplate)]
    pub fn export_template(&self, template: &str, data: JsValue) -> Result<ExportedFileJs, JsValue> {
        let template: InvoiceTemplate = template.parse().map_err(js_error)?;
        let invoice: Option<Invoice> = input_from_js(data)?
            .and_then(|input| input.invoices().next().cloned());

        self.exporter
            .export_template(template, invoice.as_ref(), js_now().date())
            .map(ExportedFileJs::from)
            .map_err(js_error)
    }

    /// The built-in laser cutting invoice.
    #[wasm_bindgen(js_name = exportLaserSample)]
    pub fn export_laser_sample(&self) -> Result<ExportedFileJs, JsValue> {
        self.exporter
            .export_laser_sample("Laser_Cutting_Invoice", js_now())
            .map(ExportedFileJs::from)
            .map_err(js_error)
    }

    /// Extracted table as an "Extracted Data" workbook.
    #[wasm_bindgen(js_name = exportExtracted)]
    pub fn export_extracted(&self, grid: JsValue, source_name: &str) -> Result<ExportedFileJs, JsValue> {
        self.exporter
            .export_extracted_grid(&grid_from_js(grid)?, source_name)
            .map(ExportedFileJs::from)
            .map_err(js_error)
    }

    /// Extracted table as a CSV download.
    #[wasm_bindgen(js_name = exportCsv)]
    pub fn export_csv(&self, grid: JsValue) -> Result<ExportedFileJs, JsValue> {
        self.exporter
            .export_csv(&grid_from_js(grid)?, js_now().date())
            .map(ExportedFileJs::from)
            .map_err(js_error)
    }
}

impl Default for InvoiceExporterJs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validate_upload() {
        assert!(validate_upload("scan.png", 1024.0, "image/png").unwrap().is_null());
        assert!(!validate_upload("notes.txt", 10.0, "text/plain").unwrap().is_null());
    }

    #[wasm_bindgen_test]
    fn test_highlight_pixels() {
        let rects: Vec<[u32; 4]> =
            serde_wasm_bindgen::from_value(highlight_pixels(1000, 1000).unwrap()).unwrap();
        assert_eq!(rects.len(), mock::INVOICE_HIGHLIGHTS.len());
        assert_eq!(rects[0], [50, 50, 900, 150]);
    }

    #[wasm_bindgen_test]
    fn test_material_id() {
        assert_eq!(
            extract_material_id("Laser Cutting-MIT-EA214C825-01LS2").as_deref(),
            Some("EA214C825-01LS2")
        );
    }

    #[wasm_bindgen_test]
    fn test_summary_export() {
        let mut exporter = InvoiceExporterJs::with_seed(1);
        let data = to_js(&serde_json::json!({"invoiceNumber": "42"})).unwrap();

        let export = exporter.export_summary(data).unwrap();
        let file = export.file().unwrap();
        assert_eq!(file.file_name(), "Invoice_42.xlsx");
        assert!(!file.bytes().is_empty());
    }

    #[wasm_bindgen_test]
    fn test_nothing_to_export() {
        let mut exporter = InvoiceExporterJs::with_seed(1);
        assert!(exporter.export_summary(JsValue::NULL).unwrap().file().is_none());
    }

    #[wasm_bindgen_test]
    fn test_unknown_template() {
        let exporter = InvoiceExporterJs::with_seed(1);
        assert!(exporter.export_template("retail", JsValue::UNDEFINED).is_err());
    }
}
