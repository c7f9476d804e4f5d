//! Tabular extraction output and its display helpers.

use serde::{Deserialize, Serialize};

use super::invoice::{Invoice, Scalar};

/// A 2D table of cell strings. Rows may differ in length.
pub type Grid = Vec<Vec<String>>;

/// Build a grid from string literals.
pub fn grid_from<R, C>(rows: R) -> Grid
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

/// A highlighted region of the preview image, in percent of its size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HighlightArea {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Convert to a pixel rectangle `(x, y, width, height)` for an image of
    /// the given size, clamped to the image bounds.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let w = image_width as f32;
        let h = image_height as f32;

        let x = (self.x.clamp(0.0, 100.0) / 100.0 * w).round();
        let y = (self.y.clamp(0.0, 100.0) / 100.0 * h).round();
        let width = (self.width.max(0.0) / 100.0 * w).round().min(w - x);
        let height = (self.height.max(0.0) / 100.0 * h).round().min(h - y);

        (x as u32, y as u32, width as u32, height as u32)
    }
}

/// A grid split into headers and body rows for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    pub headers: Vec<String>,
    pub rows: Grid,
}

impl ResultsTable {
    /// With more than one row the first row is the header; a single row
    /// gets generated `Column N` headers. Empty grids yield `None`.
    pub fn from_grid(grid: &Grid) -> Option<Self> {
        let first = grid.first()?;

        if grid.len() > 1 {
            Some(Self {
                headers: first.clone(),
                rows: grid[1..].to_vec(),
            })
        } else {
            Some(Self {
                headers: (1..=first.len()).map(|i| format!("Column {}", i)).collect(),
                rows: grid.clone(),
            })
        }
    }

    /// Render as an aligned plain-text table.
    pub fn render(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let format_row = |row: &[String]| -> String {
            let cells: Vec<String> = (0..columns)
                .map(|i| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", cell, width = widths[i])
                })
                .collect();
            cells.join(" | ").trim_end().to_string()
        };

        let mut output = String::new();
        output.push_str(&format_row(&self.headers));
        output.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&rule.join("-+-"));
        output.push('\n');
        for row in &self.rows {
            output.push_str(&format_row(row));
            output.push('\n');
        }
        output
    }
}

/// One line of the multi-invoice listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummaryRow {
    pub invoice_number: String,
    pub date: String,
    pub material_id: String,
    pub total: String,
    pub items: usize,
}

impl InvoiceSummaryRow {
    pub const HEADERS: [&'static str; 5] = ["Invoice #", "Date", "Material ID", "Total", "Items"];

    pub fn from_invoice(invoice: &Invoice) -> Self {
        let text = |field: &Option<Scalar>| field.as_ref().map(Scalar::text).unwrap_or_default();

        Self {
            invoice_number: text(&invoice.invoice_number),
            date: text(&invoice.date),
            material_id: text(&invoice.material_id),
            total: text(&invoice.total),
            items: invoice.item_count(),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.invoice_number.clone(),
            self.date.clone(),
            self.material_id.clone(),
            self.total.clone(),
            self.items.to_string(),
        ]
    }
}

/// Build the listing grid (header row first) for a set of invoices.
pub fn summary_grid<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Grid {
    let mut grid = vec![InvoiceSummaryRow::HEADERS.iter().map(|h| h.to_string()).collect()];
    grid.extend(
        invoices
            .into_iter()
            .map(|invoice| InvoiceSummaryRow::from_invoice(invoice).cells()),
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_results_table_uses_first_row_as_header() {
        let grid = grid_from([["Item", "Qty"], ["Widget A", "5"]]);
        let table = ResultsTable::from_grid(&grid).unwrap();

        assert_eq!(table.headers, vec!["Item", "Qty"]);
        assert_eq!(table.rows, grid_from([["Widget A", "5"]]));
    }

    #[test]
    fn test_results_table_single_row_gets_column_headers() {
        let grid = grid_from([["a", "b", "c"]]);
        let table = ResultsTable::from_grid(&grid).unwrap();

        assert_eq!(table.headers, vec!["Column 1", "Column 2", "Column 3"]);
        assert_eq!(table.rows.len(), 1);
        assert!(ResultsTable::from_grid(&Vec::new()).is_none());
    }

    #[test]
    fn test_render_aligns_columns() {
        let grid = grid_from([["Item", "Qty"], ["Widget A", "5"]]);
        let rendered = ResultsTable::from_grid(&grid).unwrap().render();

        assert_eq!(rendered, "Item     | Qty\n---------+----\nWidget A | 5\n");
    }

    #[test]
    fn test_highlight_to_pixels() {
        let area = HighlightArea::new(5.0, 35.0, 90.0, 60.0);
        assert_eq!(area.to_pixels(1000, 2000), (50, 700, 900, 1200));

        let overflowing = HighlightArea::new(50.0, 50.0, 80.0, 80.0);
        assert_eq!(overflowing.to_pixels(100, 100), (50, 50, 50, 50));
    }
}
