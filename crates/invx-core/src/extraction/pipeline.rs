//! Simulated processing pipeline.
//!
//! Every step sleeps for a fixed time (scaled by
//! [`PipelineConfig::delay_scale`]) and then returns canned data.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::mock;
use super::{ProcessedImage, ProcessingResult, ProcessingStage};
use crate::models::config::PipelineConfig;
use crate::models::grid::Grid;
use crate::upload::{PreviewRegistry, PreviewUrl, UploadFile};

/// Mock OCR/extraction pipeline.
#[derive(Debug, Clone)]
pub struct MockPipeline {
    config: PipelineConfig,
    previews: PreviewRegistry,
}

impl MockPipeline {
    pub fn new(config: PipelineConfig, previews: PreviewRegistry) -> Self {
        Self { config, previews }
    }

    /// Pipeline without artificial delays.
    pub fn instant() -> Self {
        Self::new(PipelineConfig { delay_scale: 0.0 }, PreviewRegistry::new())
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    async fn pause(&self, millis: u64) {
        let scaled = millis as f64 * f64::from(self.config.effective_delay_scale());
        match Duration::try_from_secs_f64(scaled / 1000.0) {
            Ok(delay) if !delay.is_zero() => tokio::time::sleep(delay).await,
            Ok(_) => {}
            Err(e) => warn!("Skipping delay of {}ms: {}", scaled, e),
        }
    }

    /// Simulated OCR text recognition.
    pub async fn extract_text_from_image(&self, file: &UploadFile) -> String {
        debug!("Recognizing text in {}", file.name);
        self.pause(2000).await;
        mock::MOCK_OCR_TEXT.to_string()
    }

    /// Simulated text-to-table structuring.
    pub async fn extract_structured_data(&self, text: &str) -> Grid {
        debug!("Structuring {} characters of text", text.len());
        self.pause(1500).await;
        mock::structured_items()
    }

    /// Full simulated pipeline, reporting each stage as it starts.
    pub async fn process_invoice<F>(&self, file: &UploadFile, mut on_stage: F) -> ProcessingResult
    where
        F: FnMut(ProcessingStage),
    {
        info!("Processing {}", file.name);

        let mut elapsed = 0;
        for stage in ProcessingStage::ALL {
            self.pause(stage.offset_ms() - elapsed).await;
            elapsed = stage.offset_ms();
            debug!("Stage: {}", stage.message());
            on_stage(stage);
        }

        ProcessingResult {
            data: mock::invoice_table(),
            highlight_areas: mock::INVOICE_HIGHLIGHTS.to_vec(),
        }
    }

    /// Simulated deskew; returns a preview of the unchanged image.
    pub async fn deskew_image(&self, file: &UploadFile) -> PreviewUrl {
        self.pause(1000).await;
        self.previews.create(file)
    }

    /// Simulated table detection.
    pub async fn detect_tables(&self, file: &UploadFile) -> ProcessedImage {
        self.pause(2000).await;
        ProcessedImage {
            preview: self.previews.create(file),
            detected_areas: mock::DETECTED_TABLES.to_vec(),
        }
    }

    /// Simulated OCR preprocessing (grayscale, threshold, denoise).
    pub async fn preprocess_for_ocr(&self, file: &UploadFile) -> PreviewUrl {
        self.pause(1500).await;
        self.previews.create(file)
    }
}
