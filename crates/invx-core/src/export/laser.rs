//! Built-in laser cutting invoice used by `sample` exports.

use super::normalize::{ExportRow, NormalizedSheet};

/// Sheet name used for manufacturing workbooks written by batch and
/// sample exports.
pub const MANUFACTURING_SHEET: &str = "Manufacturing Invoice";

const HSN: &str = "73269070";

// (part number, description, quantity, rate, amount)
const ITEMS: [(&str, &str, &str, &str, &str); 11] = [
    ("Laser Cutting-MIT-EA012B014-04", "SIZE:147.4X179.7X6MM-CUT LENGTH-1207MM-HR", "116 Nos.", "118.500", "13,746.000"),
    ("Laser Cutting-MIT-EA015C294-02", "SIZE:110X222.4X6MM-CUT LENGTH-949MM-HR", "100 Nos.", "103.000", "10,300.000"),
    ("Laser Cutting-MIT-EA021C281-05", "SIZE:110X125X6MM-CUT LENGTH-543MM-HR", "10 Nos.", "58.400", "584.000"),
    ("Laser Cutting-MIT-EA033C300-01", "SIZE:170X240X6MM-CUT LENGTH-1287MM-HR", "20 Nos.", "160.900", "3,218.000"),
    ("Laser Cutting-MIT-EA033C301-01", "SIZE:125X145X6MM-CUT LENGTH-768MM-HR", "10 Nos.", "78.900", "789.000"),
    ("Laser Cutting-MIT-EA111B538-04 REV 0", "SIZE:175X355X6MM- CUT LENGTH1384MM-HR", "12 Nos.", "223.300", "2,679.600"),
    ("Laser Cutting-MIT-EA131D685-01", "SIZE:32X32X6MM-CUT LENGTH -157MM-HR 2062", "180 Nos.", "8.800", "1,584.000"),
    ("Laser Cutting-MIT-EA175C796-01", "SIZE:115X255.4X6MM-CUT LENGTH-1322MM-HR", "28 Nos.", "130.800", "3,662.400"),
    ("Laser Cutting-MIT-EA179D554-01", "SIZE:100X110X6MM-CUT LENGTH-664MM-HR", "10 Nos.", "55.900", "559.000"),
    ("Laser Cutting-MIT-EA214C825-01LS1", "SIZE:50X1155X6MM-CUT LENGTH 2617MM-HR", "6 Nos.", "257.900", "1,547.400"),
    ("Laser Cutting-MIT-EA214C825-01LS2", "SIZE:50X1230X6MM-CUT LENGTH 2767MM-HR", "6 Nos.", "273.900", "1,643.400"),
];

/// The default laser cutting table.
pub fn laser_cutting_sample() -> NormalizedSheet {
    let items = ITEMS
        .iter()
        .map(|(part_no, description, quantity, rate, amount)| ExportRow {
            part_no: part_no.to_string(),
            description: description.to_string(),
            hsn: HSN.to_string(),
            quantity: quantity.to_string(),
            rate: rate.to_string(),
            per: "Nos.".to_string(),
            discount_percentage: String::new(),
            amount: amount.to_string(),
        })
        .collect();

    NormalizedSheet {
        state_name: "Karnataka, Code : 29".to_string(),
        terms_of_delivery: "As per terms".to_string(),
        items,
    }
}
