mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bomlens",
    version,
    about = "Extract bill-of-materials tables from engineering drawing PDFs"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract BOM records from one or more PDF drawings using the hosted model
    Extract {
        /// Paths to PDF files
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write extracted records to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Write a spreadsheet export (directory or file path; .csv writes CSV)
        #[arg(short, long, value_name = "PATH")]
        export: Option<PathBuf>,

        /// Keep records from files that succeeded when others fail
        #[arg(long)]
        partial: bool,

        /// Config file (TOML, JSON or YAML) with api_key, model, api_base, timeout_secs
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Run the pipeline on a saved model response (no network)
    Assemble {
        /// Path to the model's JSON response
        response_file: PathBuf,

        /// Source file name recorded on each record (default: response file name)
        #[arg(short, long)]
        source_file: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show how quantity strings are normalized
    Normalize {
        /// Quantity strings, e.g. 43'-4" or 3.5m
        #[arg(required = true)]
        quantities: Vec<String>,
    },
    /// Export saved records (JSON) to a spreadsheet (.xlsx, or CSV for a .csv path)
    Export {
        /// Path to records JSON written by `extract --out`
        records_file: PathBuf,

        /// Output path (default: BOM_Export_<timestamp>.xlsx)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Summarize saved records
    Metrics {
        /// Path to records JSON written by `extract --out`
        records_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_files,
            output,
            out,
            export,
            partial,
            config,
        } => commands::extract::run(input_files, &output, out, export, partial, config),
        Commands::Assemble {
            response_file,
            source_file,
            output,
        } => commands::assemble::run(response_file, source_file, &output),
        Commands::Normalize { quantities } => commands::normalize::run(&quantities),
        Commands::Export { records_file, out } => commands::export::run(records_file, out),
        Commands::Metrics {
            records_file,
            output,
        } => commands::metrics::run(records_file, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
