//! Canned extraction output returned in place of real OCR.

use crate::models::grid::{grid_from, Grid, HighlightArea};

/// Text returned by the simulated OCR pass.
pub const MOCK_OCR_TEXT: &str = "
        Invoice #: 1234567
        Date: 2023-04-15

        Client: ABC Company
        Address: 123 Business St, City, State

        Item Description | Quantity | Unit Price | Total
        Widget A | 5 | $10.00 | $50.00
        Widget B | 3 | $15.00 | $45.00
        Service X | 2 | $25.00 | $50.00

        Subtotal: $145.00
        Tax (8%): $11.60
        Total: $156.60
      ";

/// Item table returned by the simulated structured-data pass.
pub fn structured_items() -> Grid {
    grid_from([
        ["Item Description", "Quantity", "Unit Price", "Total"],
        ["Widget A", "5", "$10.00", "$50.00"],
        ["Widget B", "3", "$15.00", "$45.00"],
        ["Service X", "2", "$25.00", "$50.00"],
        ["", "", "Subtotal", "$145.00"],
        ["", "", "Tax (8%)", "$11.60"],
        ["", "", "Total", "$156.60"],
    ])
}

/// Full-document table returned by the simulated invoice pipeline.
pub fn invoice_table() -> Grid {
    let mut grid = grid_from([
        ["Invoice #", "1234567", "Date", "2023-04-15"],
        ["Client", "ABC Company", "", ""],
        ["Address", "123 Business St, City, State", "", ""],
        ["", "", "", ""],
    ]);
    grid.extend(structured_items());
    grid
}

/// Header, address and table sections of the document.
pub const INVOICE_HIGHLIGHTS: [HighlightArea; 3] = [
    HighlightArea::new(5.0, 5.0, 90.0, 15.0),
    HighlightArea::new(5.0, 20.0, 90.0, 10.0),
    HighlightArea::new(5.0, 35.0, 90.0, 60.0),
];

/// Regions reported by simulated table detection.
pub const DETECTED_TABLES: [HighlightArea; 2] = [
    HighlightArea::new(10.0, 20.0, 80.0, 30.0),
    HighlightArea::new(10.0, 55.0, 80.0, 40.0),
];
