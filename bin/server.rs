// Expense Ledger - Web Server
// REST API and HTML views with Axum

use anyhow::{Context, Result};
use clap::Parser;
use expense_ledger::{logging, router, AppState, DataDir, VERSION};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "expense-server", version, about = "Personal expense tracker web server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "EXPENSE_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "EXPENSE_PORT", default_value_t = 8080)]
    port: u16,

    /// Directory holding expenses.db and config.json
    #[arg(long, env = "EXPENSE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Emit JSON log lines
    #[arg(long, env = "EXPENSE_JSON_LOGS")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging("info", args.json_logs);
    tracing::info!(version = VERSION, "Starting expense-server");

    // Open database and config
    let data_dir = DataDir::new(&args.data_dir);
    let (storage, config) = data_dir.open()?;
    tracing::info!(path = %data_dir.database().display(), "Database opened");
    tracing::info!(
        categories = config.categories().len(),
        currency = %config.currency(),
        "Config loaded"
    );

    let state = AppState::new(Arc::new(storage), Arc::new(config));
    let app = router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
