//! Text-level helpers: OCR text to table, material IDs from part numbers.

use super::patterns::{CELL_SEPARATOR, MATERIAL_CODE, MIT_SUFFIX};
use crate::models::grid::Grid;

/// Split OCR text into a table.
///
/// Each non-blank line becomes a row; cells are separated by two or more
/// whitespace characters or a tab. Blank cells are dropped.
pub fn extract_table_from_text(text: &str) -> Grid {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            CELL_SEPARATOR
                .split(line)
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// Pull the material code out of a part number.
///
/// `"Laser Cutting-MIT-EA012B014-04"` yields `"EA012B014-04"`.
pub fn extract_material_id(part_no: &str) -> Option<String> {
    if let Some(caps) = MATERIAL_CODE.captures(part_no) {
        return Some(caps[1].to_string());
    }

    MIT_SUFFIX
        .captures(part_no)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::grid_from;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_material_id() {
        assert_eq!(
            extract_material_id("Laser Cutting-MIT-EA012B014-04"),
            Some("EA012B014-04".to_string())
        );
        assert_eq!(
            extract_material_id("Laser Cutting-MIT-EA111B538-04 REV 0"),
            Some("EA111B538-04".to_string())
        );
        assert_eq!(
            extract_material_id("Laser Cutting-MIT-EA214C825-01LS1"),
            Some("EA214C825-01LS1".to_string())
        );
        assert_eq!(
            extract_material_id("Laser Cutting-MIT-X42"),
            Some("X42".to_string())
        );
        assert_eq!(extract_material_id("Project Management"), None);
    }

    #[test]
    fn test_extract_table_from_text() {
        let text = "Item Description  Quantity\tTotal\n\n   \nWidget A    5  $50.00\nSubtotal: $145.00\n";
        let grid = extract_table_from_text(text);

        assert_eq!(
            grid,
            grid_from([
                vec!["Item Description", "Quantity", "Total"],
                vec!["Widget A", "5", "$50.00"],
                vec!["Subtotal: $145.00"],
            ])
        );
    }

    #[test]
    fn test_leading_indentation_is_not_a_cell() {
        let grid = extract_table_from_text("        Invoice #: 1234567\r\n");
        assert_eq!(grid, grid_from([["Invoice #: 1234567"]]));
    }
}
