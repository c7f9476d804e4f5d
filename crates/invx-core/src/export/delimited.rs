//! CSV and TSV renderings of a grid.

use csv::{Terminator, WriterBuilder};

use crate::error::ExportError;
use crate::models::grid::Grid;

/// Comma-separated text; cells containing commas, quotes or line breaks
/// are quoted. Each row ends with `\n`; empty rows are blank lines.
pub fn grid_to_csv(grid: &Grid) -> Result<String, ExportError> {
    let mut builder = WriterBuilder::new();
    builder.terminator(Terminator::Any(b'\n'));

    let mut out = Vec::new();
    for row in grid {
        // Spacer rows are a bare line break, not `""`.
        if row.is_empty() {
            out.push(b'\n');
            continue;
        }
        let mut writer = builder.from_writer(&mut out);
        writer.write_record(row)?;
        writer.flush().map_err(csv::Error::from)?;
    }

    Ok(String::from_utf8(out)?)
}

/// Tab-separated text for pasting into a spreadsheet. Not quoted.
pub fn grid_to_tsv(grid: &Grid) -> String {
    grid.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}
