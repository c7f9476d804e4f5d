//! Upload-and-process state of a single user session.

use serde::Serialize;
use tracing::info;

use crate::error::UploadError;
#[cfg(feature = "native")]
use crate::error::ExtractionError;
#[cfg(feature = "native")]
use crate::extraction::{MockPipeline, ProcessingStage};
use crate::models::config::UploadConfig;
use crate::models::grid::{Grid, HighlightArea, ResultsTable};
#[cfg(feature = "native")]
use crate::notice::Notice;
use crate::upload::{validate_upload, PreviewUrl, UploadFile};

/// Which view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Upload,
    Results,
}

/// Selected file, extraction results and view state.
#[derive(Debug, Default)]
pub struct Session {
    limits: UploadConfig,
    file: Option<UploadFile>,
    is_processing: bool,
    active_tab: Tab,
    extracted_data: Option<Grid>,
    highlight_areas: Vec<HighlightArea>,
    preview: Option<PreviewUrl>,
}

impl Session {
    pub fn new(limits: UploadConfig) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    /// Validate and select a file. Previous results are cleared; on
    /// rejection the session is left untouched.
    pub fn select_file(&mut self, file: UploadFile) -> Result<(), UploadError> {
        validate_upload(&file, &self.limits)?;

        info!("Selected {} ({} bytes)", file.name, file.size);
        self.file = Some(file);
        self.preview = None;
        self.extracted_data = None;
        self.highlight_areas.clear();
        Ok(())
    }

    /// Run the pipeline on the selected file and switch to the results.
    #[cfg(feature = "native")]
    pub async fn process<F>(
        &mut self,
        pipeline: &MockPipeline,
        on_stage: F,
    ) -> Result<Notice, ExtractionError>
    where
        F: FnMut(ProcessingStage),
    {
        let file = self.file.clone().ok_or(ExtractionError::NoFileSelected)?;

        self.is_processing = true;
        let result = pipeline.process_invoice(&file, on_stage).await;
        self.is_processing = false;

        self.extracted_data = Some(result.data);
        self.highlight_areas = result.highlight_areas;
        self.preview = Some(pipeline.previews().create(&file));
        self.active_tab = Tab::Results;

        Ok(Notice::processing_complete())
    }

    /// Back to the initial state, releasing the preview.
    pub fn reset(&mut self) {
        let limits = std::mem::take(&mut self.limits);
        *self = Self::new(limits);
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn extracted_data(&self) -> Option<&Grid> {
        self.extracted_data.as_ref()
    }

    pub fn highlight_areas(&self) -> &[HighlightArea] {
        &self.highlight_areas
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewUrl::as_str)
    }

    pub fn results_table(&self) -> Option<ResultsTable> {
        self.extracted_data.as_ref().and_then(ResultsTable::from_grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(size: u64) -> UploadFile {
        UploadFile::new("invoice.png", size, "image/png")
    }

    #[test]
    fn test_rejected_file_keeps_state() {
        let mut session = Session::new(UploadConfig::default());
        session.select_file(png(100)).unwrap();

        let err = session
            .select_file(UploadFile::new("notes.txt", 10, "text/plain"))
            .unwrap_err();
        assert_eq!(err.title(), "Invalid file type");
        assert_eq!(session.file().unwrap().name, "invoice.png");

        let err = session.select_file(png(10 * 1024 * 1024 + 1)).unwrap_err();
        assert_eq!(err.description(), "Maximum file size is 10MB");
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn test_process_requires_a_file() {
        let mut session = Session::new(UploadConfig::default());
        let pipeline = MockPipeline::instant();

        let err = session.process(&pipeline, |_| {}).await.unwrap_err();
        assert!(matches!(err, ExtractionError::NoFileSelected));
        assert_eq!(session.active_tab(), Tab::Upload);
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn test_process_then_reset() {
        let mut session = Session::new(UploadConfig::default());
        let pipeline = MockPipeline::instant();
        session.select_file(png(2048)).unwrap();

        let notice = session.process(&pipeline, |_| {}).await.unwrap();
        assert_eq!(notice.title, "Processing complete");
        assert_eq!(session.active_tab(), Tab::Results);
        assert!(!session.is_processing());
        assert_eq!(session.highlight_areas().len(), 3);
        assert_eq!(session.results_table().unwrap().headers[0], "Invoice #");

        let url = session.preview_url().unwrap().to_string();
        assert!(pipeline.previews().is_live(&url));

        // A new selection drops the previous preview.
        session.select_file(png(10)).unwrap();
        assert!(session.extracted_data().is_none());
        assert!(!pipeline.previews().is_live(&url));

        session.process(&pipeline, |_| {}).await.unwrap();
        session.reset();
        assert_eq!(pipeline.previews().live_count(), 0);
        assert!(session.file().is_none());
        assert_eq!(session.active_tab(), Tab::Upload);
    }
}
