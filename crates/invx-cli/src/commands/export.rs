//! Export command - turn invoice JSON into a spreadsheet.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use invx_core::export::grid_to_tsv;
use invx_core::{ExportInput, InvoiceExporter, InvoiceTemplate, Notice};

use super::{fail, load_config, print_notice};

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// JSON file with one invoice or an array of invoices
    input: Option<PathBuf>,

    /// Output directory (default: configured export directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Render through an invoice template (construction, manufacturing, services)
    #[arg(short, long, value_parser = parse_template, conflicts_with = "index")]
    template: Option<InvoiceTemplate>,

    /// Select the template by position (0-2)
    #[arg(long)]
    index: Option<usize>,

    /// Write the normalized rows as CSV instead of a workbook
    #[arg(long, conflicts_with_all = ["template", "index", "tsv"])]
    csv: bool,

    /// Print the normalized rows tab-separated for pasting into a spreadsheet
    #[arg(long, conflicts_with_all = ["template", "index"])]
    tsv: bool,
}

fn parse_template(s: &str) -> Result<InvoiceTemplate, String> {
    s.parse().map_err(|e: invx_core::ExportError| e.to_string())
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());
    let today = chrono::Local::now().date_naive();

    let input = match &args.input {
        Some(path) => {
            info!("Reading {}", path.display());
            ExportInput::from_json(&fs::read_to_string(path)?)?
        }
        None => None,
    };

    let template = match (args.template, args.index) {
        (Some(template), _) => Some(template),
        (None, Some(index)) => Some(
            InvoiceTemplate::from_index(index)
                .ok_or_else(|| anyhow::anyhow!("No template at index {}", index))?,
        ),
        (None, None) => None,
    };

    let mut exporter = InvoiceExporter::with_config(config.export.clone());

    if let Some(template) = template {
        let invoice = input.as_ref().and_then(|i| i.invoices().next());
        let file = exporter.export_template(template, invoice, today)?;
        let path = file.save_in(&output_dir)?;
        print_notice(&Notice::export_successful());
        println!("{} Output written to {}", style("✓").green(), path.display());
        return Ok(());
    }

    if args.csv || args.tsv {
        let Some(input) = input.as_ref().filter(|i| !i.is_empty()) else {
            return Err(fail(Notice::no_data()));
        };
        let grid = exporter.summary_sheet(input).rows;

        if args.tsv {
            let notice = copy_text(std::io::stdout().lock(), &grid_to_tsv(&grid));
            if notice.is_destructive() {
                return Err(fail(notice));
            }
            print_notice(&notice);
            return Ok(());
        }

        let file = exporter.export_csv(&grid, today)?;
        let path = file.save_in(&output_dir)?;
        print_notice(&Notice::csv_exported());
        println!("{} Output written to {}", style("✓").green(), path.display());
        return Ok(());
    }

    let export = exporter.export_summary(input.as_ref(), today);
    for notice in &export.notices {
        print_notice(notice);
    }

    match export.result {
        Ok(file) => {
            let path = file.save_in(&output_dir)?;
            println!("{} Output written to {}", style("✓").green(), path.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Write TSV text where the clipboard copy would go.
fn copy_text(mut out: impl Write, text: &str) -> Notice {
    match writeln!(out, "{}", text).and_then(|_| out.flush()) {
        Ok(()) => Notice::copied(),
        Err(e) => {
            warn!("Failed to write TSV: {}", e);
            Notice::copy_failed()
        }
    }
}
