//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod export;
pub mod process;
pub mod sample;

use std::path::{Path, PathBuf};

use console::style;
use indicatif::ProgressStyle;
use tracing::debug;

use invx_core::models::config::InvxConfig;
use invx_core::Notice;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invx")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or
/// fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvxConfig> {
    if let Some(path) = config_path {
        return Ok(InvxConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        return Ok(InvxConfig::from_file(&default_path)?);
    }

    Ok(InvxConfig::default())
}

/// Print a notice to stderr.
pub fn print_notice(notice: &Notice) {
    if notice.is_destructive() {
        eprintln!(
            "{} {}: {}",
            style("✗").red(),
            style(&notice.title).red(),
            notice.description
        );
    } else {
        eprintln!("{} {}: {}", style("✓").green(), notice.title, notice.description);
    }
}

/// Turn a destructive notice into an error.
pub fn fail(notice: Notice) -> anyhow::Error {
    anyhow::anyhow!("{}: {}", notice.title, notice.description)
}

pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

pub fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
