//! Sample command - write the built-in laser cutting invoice.

use std::path::PathBuf;

use clap::Args;
use console::style;

use invx_core::InvoiceExporter;

use super::{load_config, now};

/// Arguments for the sample command.
#[derive(Args)]
pub struct SampleArgs {
    /// Output directory (default: configured export directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Filename prefix for the workbook
    #[arg(long, default_value = "Laser_Cutting_Invoice")]
    export_name: String,
}

pub async fn run(args: SampleArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let output_dir = args.output_dir.unwrap_or_else(|| config.export.output_dir.clone());

    let exporter = InvoiceExporter::with_config(config.export);
    let file = exporter.export_laser_sample(&args.export_name, now())?;
    let path = file.save_in(&output_dir)?;

    println!("{} Output written to {}", style("✓").green(), path.display());

    Ok(())
}
