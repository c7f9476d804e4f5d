//! CLI application for the invx invoice extraction demo.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, export, process, sample};

/// Invoice extraction demo - mock OCR and spreadsheet export
#[derive(Parser)]
#[command(name = "invx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the extraction pipeline on a single invoice file
    Process(process::ProcessArgs),

    /// Export invoice JSON to a spreadsheet
    Export(export::ExportArgs),

    /// Extract records from many files into one workbook
    Batch(batch::BatchArgs),

    /// Write the built-in laser cutting invoice
    Sample(sample::SampleArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Export(args) => export::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Sample(args) => sample::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
