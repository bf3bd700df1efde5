// 🧩 App State - shared storage and config handed to every handler

use crate::config::Config;
use crate::db::Storage;
use std::sync::Arc;

/// Cheaply cloneable; all clones share the same storage and config.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: Arc<Config>) -> Self {
        Self { storage, config }
    }
}
