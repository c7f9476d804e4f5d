//! Configuration structures for the upload, pipeline and export stages.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for invx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvxConfig {
    /// Upload validation limits.
    pub upload: UploadConfig,

    /// Mock pipeline configuration.
    pub pipeline: PipelineConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// Upload validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,

    /// Accepted MIME types.
    pub accepted_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            accepted_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
                "application/pdf".to_string(),
            ],
        }
    }
}

/// Mock pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Multiplier applied to every simulated delay (0 disables them).
    pub delay_scale: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { delay_scale: 1.0 }
    }
}

impl PipelineConfig {
    /// Largest honoured `delay_scale`.
    pub const MAX_DELAY_SCALE: f32 = 60.0;

    /// `delay_scale` clamped to `0..=MAX_DELAY_SCALE`; NaN counts as 0.
    pub fn effective_delay_scale(&self) -> f32 {
        if self.delay_scale.is_nan() {
            return 0.0;
        }
        self.delay_scale.clamp(0.0, Self::MAX_DELAY_SCALE)
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported files are written to.
    pub output_dir: PathBuf,

    /// Filename prefix for timestamped batch exports.
    pub export_name: String,

    /// State shown when no invoice carries one.
    pub default_state_name: String,

    /// Terms shown when no invoice carries any.
    pub default_terms_of_delivery: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            export_name: "Invoice_Export".to_string(),
            default_state_name: "Invoice Data".to_string(),
            default_terms_of_delivery: "Standard".to_string(),
        }
    }
}

impl InvxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: InvxConfig =
            serde_json::from_str(r#"{"pipeline": {"delay_scale": 0.0}}"#).unwrap();

        assert_eq!(config.pipeline.delay_scale, 0.0);
        assert_eq!(config.upload.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.export.export_name, "Invoice_Export");
    }

    #[test]
    fn test_effective_delay_scale() {
        let scale = |delay_scale| PipelineConfig { delay_scale }.effective_delay_scale();

        assert_eq!(scale(0.5), 0.5);
        assert_eq!(scale(1e30), PipelineConfig::MAX_DELAY_SCALE);
        assert_eq!(scale(f32::INFINITY), PipelineConfig::MAX_DELAY_SCALE);
        assert_eq!(scale(-1.0), 0.0);
        assert_eq!(scale(f32::NAN), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvxConfig::default();
        config.export.export_name = "Laser".to_string();
        config.save(&path).unwrap();

        let loaded = InvxConfig::from_file(&path).unwrap();
        assert_eq!(loaded.export.export_name, "Laser");
        assert_eq!(loaded.upload.accepted_types.len(), 5);
    }
}
