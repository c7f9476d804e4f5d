//! Regex patterns shared by the text utilities.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Material code inside a laser-cutting part number (EA012B014-04)
    pub static ref MATERIAL_CODE: Regex = Regex::new(
        r"\b([A-Z]{2}\d{3}[A-Z]\d{3}(?:-[A-Z0-9]+)?)\b"
    ).unwrap();

    // Anything following the MIT marker when the code has another shape
    pub static ref MIT_SUFFIX: Regex = Regex::new(
        r"(?i)\bMIT-(\S+)"
    ).unwrap();

    // Column separator in OCR lines: two or more spaces, or a tab
    pub static ref CELL_SEPARATOR: Regex = Regex::new(
        r"\s{2,}|\t"
    ).unwrap();
}
