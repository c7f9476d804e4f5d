//! Process command - run the extraction pipeline on a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::ProgressBar;
use serde_json::json;
use tracing::{debug, info};

use invx_core::export::{grid_to_csv, grid_to_tsv};
use invx_core::{InvoiceExporter, MockPipeline, Notice, PreviewRegistry, Session, UploadFile};

use super::{bar_style, fail, load_config, print_notice};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (image or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout, or the export directory for xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Skip the simulated processing delays
    #[arg(long)]
    fast: bool,

    /// Print the recognized text instead of the results table
    #[arg(long)]
    raw_text: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON with the table and highlight areas
    Json,
    /// CSV output
    Csv,
    /// Tab-separated output
    Tsv,
    /// Aligned plain-text table
    Text,
    /// Excel workbook
    Xlsx,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.fast {
        config.pipeline.delay_scale = 0.0;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let file = UploadFile::from_path(&args.input)?;
    let mut session = Session::new(config.upload.clone());
    session
        .select_file(file.clone())
        .map_err(|e| fail(Notice::from(&e)))?;

    let pipeline = MockPipeline::new(config.pipeline.clone(), PreviewRegistry::new());
    info!("Processing file: {}", args.input.display());

    if args.raw_text {
        let text = pipeline.extract_text_from_image(&file).await;
        return write_output(&args, &text);
    }

    let pb = ProgressBar::new(100);
    pb.set_style(bar_style());

    let notice = session
        .process(&pipeline, |stage| {
            pb.set_message(stage.message());
            pb.set_position(stage.percent());
        })
        .await
        .map_err(|e| fail(Notice::from(&e)))?;

    pb.finish_with_message("Done");
    print_notice(&notice);

    let data = session.extracted_data().cloned().unwrap_or_default();

    match args.format {
        OutputFormat::Json => {
            let output = serde_json::to_string_pretty(&json!({
                "data": data,
                "highlightAreas": session.highlight_areas(),
            }))?;
            write_output(&args, &output)?;
        }
        OutputFormat::Csv => write_output(&args, &grid_to_csv(&data)?)?,
        OutputFormat::Tsv => write_output(&args, &grid_to_tsv(&data))?,
        OutputFormat::Text => {
            let table = session.results_table().map(|t| t.render()).unwrap_or_default();
            write_output(&args, &table)?;
        }
        OutputFormat::Xlsx => {
            let exporter = InvoiceExporter::with_config(config.export.clone());
            let file = exporter.export_extracted_grid(&data, &file.name)?;

            let path = match &args.output {
                Some(path) => {
                    fs::write(path, &file.bytes)?;
                    path.clone()
                }
                None => file.save_in(&config.export.output_dir)?,
            };
            println!("{} Output written to {}", style("✓").green(), path.display());
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn write_output(args: &ProcessArgs, output: &str) -> anyhow::Result<()> {
    if let Some(output_path) = &args.output {
        fs::write(output_path, output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}
