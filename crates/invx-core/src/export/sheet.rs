//! Sheet layouts shared by the XLSX and delimited writers.

use serde::Serialize;

use super::normalize::NormalizedSheet;
use crate::models::grid::Grid;

/// Item table headers of the manufacturing layout.
pub const MANUFACTURING_HEADERS: [&str; 9] = [
    "SI No.",
    "Part No",
    "Description of Goods",
    "HSN/SAC",
    "Quantity",
    "Rate",
    "per",
    "Disc. %",
    "Amount",
];

/// Column widths (in characters) of the manufacturing layout.
pub const MANUFACTURING_WIDTHS: [f64; 9] = [5.0, 25.0, 30.0, 10.0, 10.0, 10.0, 5.0, 10.0, 15.0];

/// A named worksheet: cell text plus presentation hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Grid,
    /// Index of the row rendered in bold.
    pub header_row: Option<usize>,
    pub column_widths: Vec<f64>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Grid) -> Self {
        Self {
            name: name.into(),
            rows,
            header_row: None,
            column_widths: Vec::new(),
        }
    }

    pub fn with_header_row(mut self, row: usize) -> Self {
        self.header_row = Some(row);
        self
    }

    pub fn with_column_widths(mut self, widths: &[f64]) -> Self {
        self.column_widths = widths.to_vec();
        self
    }

    /// Manufacturing layout: state/terms line, a blank line, the bold
    /// header row, then one numbered row per item.
    pub fn manufacturing(name: impl Into<String>, data: &NormalizedSheet) -> Self {
        let mut rows: Grid = Vec::with_capacity(data.items.len() + 3);

        rows.push(vec![
            "State Name".to_string(),
            ":".to_string(),
            data.state_name.clone(),
            String::new(),
            String::new(),
            String::new(),
            "Terms of Delivery".to_string(),
            data.terms_of_delivery.clone(),
        ]);
        rows.push(Vec::new());
        rows.push(MANUFACTURING_HEADERS.iter().map(|h| h.to_string()).collect());

        for (index, item) in data.items.iter().enumerate() {
            let mut row = Vec::with_capacity(9);
            row.push((index + 1).to_string());
            row.extend(item.cells().iter().map(|c| c.to_string()));
            rows.push(row);
        }

        Sheet::new(name, rows)
            .with_header_row(2)
            .with_column_widths(&MANUFACTURING_WIDTHS)
    }

    /// Number of columns in the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::normalize::ExportRow;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_manufacturing_layout() {
        let data = NormalizedSheet {
            state_name: "Invoice Data".into(),
            terms_of_delivery: "Standard".into(),
            items: vec![
                ExportRow {
                    part_no: "P-1".into(),
                    amount: "10".into(),
                    ..Default::default()
                },
                ExportRow {
                    part_no: "P-2".into(),
                    ..Default::default()
                },
            ],
        };

        let sheet = Sheet::manufacturing("Invoice Data", &data);
        assert_eq!(sheet.rows.len(), 5);
        assert_eq!(
            sheet.rows[0],
            vec!["State Name", ":", "Invoice Data", "", "", "", "Terms of Delivery", "Standard"]
        );
        assert!(sheet.rows[1].is_empty());
        assert_eq!(sheet.rows[2][2], "Description of Goods");
        assert_eq!(sheet.rows[3], vec!["1", "P-1", "", "", "", "", "", "", "10"]);
        assert_eq!(sheet.rows[4][0], "2");
        assert_eq!(sheet.header_row, Some(2));
        assert_eq!(sheet.width(), 9);
    }
}
