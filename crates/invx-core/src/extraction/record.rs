//! Per-file extraction used by batch export.

use std::path::Path;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ExtractionError, Result};
use crate::models::invoice::{Invoice, LineItem, Scalar};
use crate::upload::ImageInfo;

/// How a file is handled by [`extract_invoice_record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Json,
    Unsupported,
}

impl FileKind {
    /// Classify by extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "tiff" | "bmp" | "webp" => FileKind::Image,
            "pdf" => FileKind::Pdf,
            "json" => FileKind::Json,
            _ => FileKind::Unsupported,
        }
    }
}

/// Extract invoice records from one file.
///
/// Images and PDFs yield a single placeholder record; JSON files are parsed
/// as-is (an array yields several records, empty objects are dropped).
/// Unsupported files yield nothing.
pub fn extract_invoice_record(path: &Path, now: NaiveDateTime) -> Result<Vec<Invoice>> {
    let stem = file_stem(path);
    let date = now.format("%Y-%m-%d").to_string();

    match FileKind::from_path(path) {
        FileKind::Image => {
            let info = ImageInfo::from_path(path)
                .ok_or_else(|| ExtractionError::UnreadableImage(path.display().to_string()))?;
            info!("Processing image: {} ({}x{})", path.display(), info.width, info.height);

            Ok(vec![Invoice {
                invoice_number: Some(Scalar::from(format!("INV-{}", stem))),
                date: Some(Scalar::from(date)),
                material_id: Some(Scalar::from(format!("MAT-{}", now.format("%d%H%M")))),
                items: Some(vec![Some(LineItem {
                    description: Some(Scalar::from("Laser Cut Item")),
                    quantity: Some(Scalar::from(10i64)),
                    unit_price: Some(Scalar::from("100.00")),
                    total: Some(Scalar::from("1000.00")),
                    ..Default::default()
                })]),
                ..Default::default()
            }])
        }
        FileKind::Pdf => {
            info!("PDF content is not parsed, using placeholder data for {}", path.display());
            Ok(vec![Invoice {
                invoice_number: Some(Scalar::from(format!("INV-{}", stem))),
                date: Some(Scalar::from(date)),
                total: Some(Scalar::from("$1,234.56")),
                ..Default::default()
            }])
        }
        FileKind::Json => read_json_records(path),
        FileKind::Unsupported => {
            warn!("Unsupported file type: {}", path.display());
            Ok(Vec::new())
        }
    }
}

fn read_json_records(path: &Path) -> Result<Vec<Invoice>> {
    let invalid = |reason: String| ExtractionError::InvalidData {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => vec![other],
    };

    let mut invoices = Vec::new();
    for entry in entries {
        match entry {
            Value::Object(ref map) if map.is_empty() => continue,
            Value::Object(_) => {
                invoices.push(serde_json::from_value(entry).map_err(|e| invalid(e.to_string()))?)
            }
            Value::Null => continue,
            other => return Err(invalid(format!("expected an object, found {}", other)).into()),
        }
    }

    Ok(invoices)
}

/// Text before the first `.` of the file name.
fn file_stem(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 30)
            .unwrap()
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_path(Path::new("a.PNG")), FileKind::Image);
        assert_eq!(FileKind::from_path(Path::new("a.tiff")), FileKind::Image);
        assert_eq!(FileKind::from_path(Path::new("a.pdf")), FileKind::Pdf);
        assert_eq!(FileKind::from_path(Path::new("a.json")), FileKind::Json);
        assert_eq!(FileKind::from_path(Path::new("a.txt")), FileKind::Unsupported);
        assert_eq!(FileKind::from_path(Path::new("noext")), FileKind::Unsupported);
    }

    #[test]
    fn test_image_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.v2.png");
        image::RgbImage::new(4, 3).save(&path).unwrap();

        let records = extract_invoice_record(&path, now()).unwrap();
        assert_eq!(records.len(), 1);
        let invoice = &records[0];
        assert_eq!(invoice.invoice_number, Some(Scalar::from("INV-scan")));
        assert_eq!(invoice.date, Some(Scalar::from("2024-03-07")));
        assert_eq!(invoice.material_id, Some(Scalar::from("MAT-070905")));

        let item = invoice.items.as_ref().unwrap()[0].as_ref().unwrap();
        assert_eq!(item.description, Some(Scalar::from("Laser Cut Item")));
        assert_eq!(item.quantity, Some(Scalar::from(10i64)));
        assert_eq!(item.total, Some(Scalar::from("1000.00")));
    }

    #[test]
    fn test_unreadable_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let err = extract_invoice_record(&path, now()).unwrap_err();
        assert!(err.to_string().contains("could not read image file"));
    }

    #[test]
    fn test_pdf_record() {
        let records = extract_invoice_record(Path::new("march.pdf"), now()).unwrap();
        assert_eq!(records[0].invoice_number, Some(Scalar::from("INV-march")));
        assert_eq!(records[0].total, Some(Scalar::from("$1,234.56")));
        assert!(records[0].items.is_none());
    }

    #[test]
    fn test_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let single = dir.path().join("one.json");
        std::fs::write(&single, r#"{"invoiceNumber": "A-1", "total": 50}"#).unwrap();
        let many = dir.path().join("many.json");
        std::fs::write(&many, r#"[{"invoiceNumber": "B-1"}, {}, null, {"invoiceNumber": "B-2"}]"#)
            .unwrap();

        let one = extract_invoice_record(&single, now()).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].total, Some(Scalar::from(50i64)));

        let records = extract_invoice_record(&many, now()).unwrap();
        let numbers: Vec<String> = records
            .iter()
            .filter_map(|r| r.invoice_number.as_ref().map(Scalar::text))
            .collect();
        assert_eq!(numbers, vec!["B-1", "B-2"]);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(extract_invoice_record(&path, now()).is_err());

        std::fs::write(&path, "{").unwrap();
        assert!(extract_invoice_record(&path, now()).is_err());
    }

    #[test]
    fn test_unsupported_yields_nothing() {
        let records = extract_invoice_record(Path::new("notes.txt"), now()).unwrap();
        assert!(records.is_empty());
    }
}
