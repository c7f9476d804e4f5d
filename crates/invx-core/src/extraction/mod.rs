//! Simulated invoice extraction.
//!
//! Nothing here performs real OCR: the pipeline returns canned data after
//! artificial delays, and per-file extraction returns placeholder records.

pub mod mock;
mod patterns;
#[cfg(feature = "native")]
mod pipeline;
mod record;
mod text;

#[cfg(feature = "native")]
pub use pipeline::MockPipeline;
pub use record::{extract_invoice_record, FileKind};
pub use text::{extract_material_id, extract_table_from_text};

use serde::Serialize;

use crate::models::grid::{Grid, HighlightArea};
use crate::upload::PreviewUrl;

/// Progress stages of the invoice pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    Preprocessing,
    DetectingElements,
    PerformingOcr,
    ExtractingData,
}

impl ProcessingStage {
    pub const ALL: [ProcessingStage; 4] = [
        ProcessingStage::Preprocessing,
        ProcessingStage::DetectingElements,
        ProcessingStage::PerformingOcr,
        ProcessingStage::ExtractingData,
    ];

    /// Status line shown while the stage runs.
    pub fn message(&self) -> &'static str {
        match self {
            ProcessingStage::Preprocessing => "Preprocessing image...",
            ProcessingStage::DetectingElements => "Detecting document elements...",
            ProcessingStage::PerformingOcr => "Performing OCR analysis...",
            ProcessingStage::ExtractingData => "Extracting structured data...",
        }
    }

    /// Milliseconds after the start of processing at which the stage begins.
    pub fn offset_ms(&self) -> u64 {
        match self {
            ProcessingStage::Preprocessing => 0,
            ProcessingStage::DetectingElements => 1000,
            ProcessingStage::PerformingOcr => 2500,
            ProcessingStage::ExtractingData => 4000,
        }
    }

    /// Rough completion percentage for progress bars.
    pub fn percent(&self) -> u64 {
        self.offset_ms() * 100 / 4000
    }
}

/// Output of the invoice pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    /// Extracted table.
    pub data: Grid,
    /// Regions of the document the table came from.
    pub highlight_areas: Vec<HighlightArea>,
}

/// Output of the table detection step.
#[derive(Debug)]
pub struct ProcessedImage {
    pub preview: PreviewUrl,
    pub detected_areas: Vec<HighlightArea>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_offsets_increase() {
        let offsets: Vec<u64> = ProcessingStage::ALL.iter().map(|s| s.offset_ms()).collect();
        assert_eq!(offsets, vec![0, 1000, 2500, 4000]);
        assert_eq!(ProcessingStage::ExtractingData.percent(), 100);
        assert_eq!(ProcessingStage::DetectingElements.percent(), 25);
    }
}
