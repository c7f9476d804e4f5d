//! XLSX output.

use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use super::sheet::Sheet;
use crate::error::ExportError;

fn build_workbook(sheets: &[Sheet]) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, width) in sheet.column_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        for (r, row) in sheet.rows.iter().enumerate() {
            let is_header = sheet.header_row == Some(r);
            for (c, cell) in row.iter().enumerate() {
                // Blank cells are left unwritten.
                if cell.is_empty() {
                    continue;
                }
                if is_header {
                    worksheet.write_string_with_format(r as u32, c as u16, cell, &bold)?;
                } else {
                    worksheet.write_string(r as u32, c as u16, cell)?;
                }
            }
        }

        debug!("Sheet {:?}: {} rows", sheet.name, sheet.rows.len());
    }

    Ok(workbook)
}

/// Render sheets into an in-memory workbook.
pub fn write_xlsx(sheets: &[Sheet]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(sheets)?;
    Ok(workbook.save_to_buffer()?)
}
