use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use expense_ledger::{export, logging, DataDir, Storage};

#[derive(Parser)]
#[command(
    name = "expense-ledger",
    version,
    about = "Maintenance commands for the expense ledger data directory"
)]
struct Cli {
    /// Directory holding expenses.db and config.json
    #[arg(long, env = "EXPENSE_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, database schema, and default config
    Init,

    /// Write every expense to a CSV or JSON file
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configured categories and currency
    Categories,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    logging::init_logging("warn", false);

    let cli = Cli::parse();
    let data_dir = DataDir::new(cli.data_dir);

    match cli.command {
        Commands::Init => run_init(&data_dir),
        Commands::Export { format, output } => run_export(&data_dir, format, output),
        Commands::Categories => run_categories(&data_dir),
    }
}

fn run_init(data_dir: &DataDir) -> Result<()> {
    let (storage, config) = data_dir.open()?;
    config.save().context("Failed to write config")?;

    println!("✓ Data directory: {}", data_dir.root().display());
    println!("✓ Database ready: {} expenses", storage.count()?);
    if let Some(path) = config.path() {
        println!("✓ Config written: {}", path.display());
    }

    Ok(())
}

fn run_export(data_dir: &DataDir, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let (storage, _config) = data_dir.open()?;
    let expenses = storage.get_all_expenses()?;

    let bytes = match format {
        ExportFormat::Csv => export::to_csv(&expenses)?,
        ExportFormat::Json => export::to_json(&expenses)?,
    };

    match output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            file.write_all(&bytes)?;
            eprintln!("✓ Exported {} expenses to {}", expenses.len(), path.display());
        }
        None => io::stdout().write_all(&bytes)?,
    }

    Ok(())
}

fn run_categories(data_dir: &DataDir) -> Result<()> {
    let (_storage, config) = data_dir.open()?;
    let settings = config.snapshot();

    println!("Currency: {}", settings.currency);
    println!("Categories:");
    for category in &settings.categories {
        println!("  - {}", category);
    }

    Ok(())
}
