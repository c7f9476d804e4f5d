//! Batch command - extract records from many files into one workbook.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invx_core::export::grid_to_csv;
use invx_core::extraction::{extract_invoice_record, FileKind};
use invx_core::models::grid::summary_grid;
use invx_core::{Invoice, InvoiceExporter};

use super::{load_config, now};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory, file, or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: configured export directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Filename prefix for the workbook
    #[arg(long)]
    export_name: Option<String>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    invoices: Vec<Invoice>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(name) = &args.export_name {
        config.export.export_name = name.clone();
    }
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());

    let files = collect_files(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        match extract_invoice_record(&path, now()) {
            Ok(invoices) => {
                debug!("{}: {} records", path.display(), invoices.len());
                results.push(ProcessResult {
                    path,
                    invoices,
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        invoices: Vec::new(),
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let successful = results.iter().filter(|r| r.error.is_none()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let invoices: Vec<Invoice> = results
        .iter()
        .flat_map(|r| r.invoices.iter().cloned())
        .collect();

    if invoices.is_empty() {
        println!("{} No data to export.", style("ℹ").blue());
    } else {
        let exporter = InvoiceExporter::with_config(config.export.clone());
        let file = exporter.export_aggregate(&invoices, now())?;
        let path = file.save_in(&output_dir)?;
        println!(
            "{} Exported {} records to {}",
            style("✓").green(),
            invoices.len(),
            path.display()
        );

        if args.summary {
            fs::create_dir_all(&output_dir)?;
            let summary_path = output_dir.join("summary.csv");
            fs::write(&summary_path, grid_to_csv(&summary_grid(&invoices))?)?;
            println!(
                "{} Summary written to {}",
                style("✓").green(),
                summary_path.display()
            );
        }
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Expand the input into a sorted list of files. A directory contributes
/// its direct entries; anything else is treated as a glob pattern.
fn collect_files(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let path = Path::new(input);

    let mut files: Vec<PathBuf> = if path.is_dir() {
        fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect()
    } else {
        glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect()
    };

    files.retain(|p| {
        let supported = FileKind::from_path(p) != FileKind::Unsupported;
        if !supported {
            warn!("Skipping unsupported file: {}", p.display());
        }
        supported
    });
    files.sort();

    Ok(files)
}
