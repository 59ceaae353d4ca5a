use anyhow::Result;
use chrono::{Datelike, Local};
use clap::Parser;
use std::path::PathBuf;
use tally_finance::{Summary, aggregate, extract_all, successful, write_csv};
use tally_ingest::find_statements;
use tracing_subscriber::EnvFilter;

mod config;
mod output;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    long_version = LONG_VERSION,
    about = "Extract transactions from credit-card statement PDFs into one CSV"
)]
struct Cli {
    /// Directory containing statement PDFs (not searched recursively)
    directory: PathBuf,

    /// Output CSV (default: extracted_expenses.csv in the current directory)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Config file (default: ~/.tally/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log extraction details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_config(cli.config.as_deref())?;
    let output_path = cli.output.unwrap_or_else(|| cfg.output.file.clone());
    let extractor = cfg.extractor()?;

    let paths = find_statements(&cli.directory)?;
    if paths.is_empty() {
        println!("No PDF files found in {}", cli.directory.display());
    }

    let outcomes = extract_all(&extractor, &paths);
    output::print_outcomes(&outcomes);

    let rows = aggregate(successful(outcomes), Local::now().year());
    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!();
    output::print_table(&rows);
    println!();
    output::print_summary(&Summary::of(&rows));

    write_csv(&output_path, &rows)?;
    println!("Saved to {}", output_path.display());

    Ok(())
}
