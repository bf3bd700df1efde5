// Expense Ledger - Core Library
// Shared by the HTTP server, the maintenance CLI, and tests

pub mod api;
pub mod config;
pub mod db;
pub mod expense;
pub mod export;
pub mod logging;
pub mod web;

// Re-export commonly used types
pub use api::{router, ApiError, AppState};
pub use config::{Config, ConfigError, Settings};
pub use db::{SqliteStorage, Storage, StorageError};
pub use expense::{Expense, ExpenseRequest, NewExpense, ValidationError};
pub use export::ExportError;

use std::path::{Path, PathBuf};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Files that make up one ledger on disk
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database(&self) -> PathBuf {
        self.root.join(db::DATABASE_FILE)
    }

    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// Open storage and config together, creating the directory if needed
    pub fn open(&self) -> anyhow::Result<(SqliteStorage, Config)> {
        use anyhow::Context;

        self.ensure_exists()
            .with_context(|| format!("Failed to create data directory {}", self.root.display()))?;
        let storage = SqliteStorage::open(&self.database())
            .with_context(|| format!("Failed to open database {}", self.database().display()))?;
        let config = Config::load(&self.root).context("Failed to load config")?;

        Ok((storage, config))
    }
}
