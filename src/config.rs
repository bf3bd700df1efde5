// ⚙️ Config - categories and currency shared by every request
//
// One Config is created at startup and handed to the router behind an Arc.
// Reads take a shared lock; replacements take the write lock, persist to
// config.json (when file-backed), then swap the in-memory value.

use crate::expense::{NewExpense, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// File name of the persisted settings inside the data directory
pub const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "Food",
    "Groceries",
    "Travel",
    "Rent",
    "Utilities",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Miscellaneous",
];

pub const DEFAULT_CURRENCY: &str = "usd";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// SETTINGS (the persisted value)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            currency: default_currency(),
        }
    }
}

// ============================================================================
// CONFIG (the shared, synchronized owner)
// ============================================================================

pub struct Config {
    settings: RwLock<Settings>,
    path: Option<PathBuf>,
}

impl Config {
    /// Config that lives only in memory (tests, one-shot tools)
    pub fn in_memory(settings: Settings) -> Self {
        Config {
            settings: RwLock::new(settings),
            path: None,
        }
    }

    /// Load `config.json` from `data_dir`, falling back to defaults when the
    /// file does not exist yet. Updates are written back to the same file.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE);

        let settings = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.clone(),
                source,
            })?
        } else {
            tracing::info!(path = %path.display(), "No config file found, using defaults");
            Settings::default()
        };

        Ok(Config {
            settings: RwLock::new(settings),
            path: Some(path),
        })
    }

    /// Write the current settings to disk (no-op for in-memory configs)
    pub fn save(&self) -> Result<(), ConfigError> {
        let settings = self.read();
        self.persist(&settings)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> Settings {
        self.read().clone()
    }

    pub fn categories(&self) -> Vec<String> {
        self.read().categories.clone()
    }

    pub fn currency(&self) -> String {
        self.read().currency.clone()
    }

    /// Replace the whole category list. The new list is taken as-is.
    pub fn update_categories(&self, categories: Vec<String>) -> Result<(), ConfigError> {
        let mut settings = self.write();
        let next = Settings {
            categories,
            currency: settings.currency.clone(),
        };
        self.persist(&next)?;
        *settings = next;
        Ok(())
    }

    pub fn update_currency(&self, currency: String) -> Result<(), ConfigError> {
        let mut settings = self.write();
        let next = Settings {
            categories: settings.categories.clone(),
            currency,
        };
        self.persist(&next)?;
        *settings = next;
        Ok(())
    }

    /// Full expense rule set: field rules, then category membership.
    pub fn validate(&self, expense: &NewExpense) -> Result<(), ValidationError> {
        expense.validate_fields()?;

        if !self.read().categories.iter().any(|c| c == &expense.category) {
            return Err(ValidationError::UnknownCategory(expense.category.clone()));
        }

        Ok(())
    }

    fn persist(&self, settings: &Settings) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let contents = serde_json::to_string_pretty(settings).map_err(|source| {
            ConfigError::Json {
                path: path.clone(),
                source,
            }
        })?;

        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })
    }

    // Updates swap a complete Settings value, so a poisoned lock still
    // holds a consistent one.
    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        self.settings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::in_memory(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.categories().len(), 9);
        assert_eq!(config.categories()[0], "Food");
        assert_eq!(config.currency(), "usd");
    }

    #[test]
    fn test_update_categories_replaces_whole_list() {
        let config = Config::default();
        config
            .update_categories(vec!["Books".to_string(), "Games".to_string()])
            .unwrap();

        assert_eq!(config.categories(), vec!["Books", "Games"]);
        assert_eq!(config.currency(), "usd");
    }

    #[test]
    fn test_update_currency() {
        let config = Config::default();
        config.update_currency("eur".to_string()).unwrap();
        assert_eq!(config.currency(), "eur");
    }

    #[test]
    fn test_validate_checks_category_membership() {
        let config = Config::default();

        assert!(config.validate(&NewExpense::new("Coffee", "Food", 3.5, None)).is_ok());
        assert_eq!(
            config.validate(&NewExpense::new("Coffee", "food", 3.5, None)),
            Err(ValidationError::UnknownCategory("food".to_string()))
        );
        // Field rules run before membership
        assert_eq!(
            config.validate(&NewExpense::new("", "Nope", 3.5, None)),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.snapshot(), Settings::default());
        assert!(!temp_dir.path().join(CONFIG_FILE).exists());

        config.update_categories(vec!["Travel".to_string()]).unwrap();
        config.update_currency("gbp".to_string()).unwrap();

        let reloaded = Config::load(temp_dir.path()).unwrap();
        assert_eq!(reloaded.categories(), vec!["Travel"]);
        assert_eq!(reloaded.currency(), "gbp");
    }

    #[test]
    fn test_failed_persist_leaves_settings_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");
        let config = Config::load(&missing).unwrap();

        let result = config.update_categories(vec!["Books".to_string()]);

        assert!(matches!(result, Err(ConfigError::Io { .. })));
        assert_eq!(config.categories(), default_categories());
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_fields() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), r#"{"currency":"jpy"}"#).unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.currency(), "jpy");
        assert_eq!(config.categories(), default_categories());
    }
}
