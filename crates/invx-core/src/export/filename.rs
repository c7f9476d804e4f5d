//! Download file names.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::invoice::{ExportInput, Invoice, Scalar};

fn truthy_text(value: Option<&Scalar>) -> Option<String> {
    value.filter(|v| v.is_truthy()).map(Scalar::text)
}

fn processed_name(invoice: &Invoice) -> Option<String> {
    truthy_text(invoice.file_name.as_ref()).map(|name| {
        let base = name.split('.').next().unwrap_or_default();
        format!("{}_processed.xlsx", base)
    })
}

/// Name of the summary workbook for `input`.
///
/// Lists are named after their first entry, single invoices after
/// themselves; anything else gets a dated default. A null first entry
/// names nothing, so the list falls back to the dated default.
pub fn export_filename(input: &ExportInput, today: NaiveDate) -> String {
    let named = match input {
        ExportInput::Many(entries) => entries.first().and_then(|first| {
            let first = first.as_ref()?;
            truthy_text(first.invoice_number.as_ref())
                .map(|n| format!("Invoice_{}_and_{}_others.xlsx", n, entries.len() - 1))
                .or_else(|| processed_name(first))
        }),
        ExportInput::One(invoice) => truthy_text(invoice.invoice_number.as_ref())
            .map(|n| format!("Invoice_{}.xlsx", n))
            .or_else(|| processed_name(invoice)),
    };

    named.unwrap_or_else(|| format!("Invoice_Export_{}.xlsx", today.format("%Y-%m-%d")))
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.xlsx`
pub fn timestamped_filename(prefix: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.xlsx", prefix, now.format("%Y%m%d_%H%M%S"))
}

/// `invoice_data_<YYYY-MM-DD>.csv`
pub fn csv_filename(today: NaiveDate) -> String {
    format!("invoice_data_{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn name_for(value: serde_json::Value) -> String {
        let input = ExportInput::from_value(value).unwrap().unwrap();
        export_filename(&input, today())
    }

    #[test]
    fn test_list_names() {
        assert_eq!(
            name_for(json!([{"invoiceNumber": "INV-1"}, {}, {}])),
            "Invoice_INV-1_and_2_others.xlsx"
        );
        assert_eq!(
            name_for(json!([{"fileName": "scan.final.png"}, {"invoiceNumber": "X"}])),
            "scan_processed.xlsx"
        );
        assert_eq!(name_for(json!([{"total": 5}])), "Invoice_Export_2024-05-01.xlsx");
    }

    #[test]
    fn test_unnamed_first_entry_gets_dated_default() {
        assert_eq!(name_for(json!([null, {"invoiceNumber": "X"}])), "Invoice_Export_2024-05-01.xlsx");
        assert_eq!(name_for(json!([[1], {"invoiceNumber": "X"}])), "Invoice_Export_2024-05-01.xlsx");
    }

    #[test]
    fn test_single_names() {
        assert_eq!(name_for(json!({"invoiceNumber": 14})), "Invoice_14.xlsx");
        assert_eq!(name_for(json!({"fileName": "march.pdf"})), "march_processed.xlsx");
        assert_eq!(name_for(json!({"invoiceNumber": ""})), "Invoice_Export_2024-05-01.xlsx");
    }

    #[test]
    fn test_timestamped_names() {
        let now = today().and_hms_opt(13, 4, 5).unwrap();
        assert_eq!(
            timestamped_filename("Invoice_Export", now),
            "Invoice_Export_20240501_130405.xlsx"
        );
        assert_eq!(csv_filename(today()), "invoice_data_2024-05-01.csv");
    }
}
