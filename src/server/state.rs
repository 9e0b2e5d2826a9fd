//! Application state shared across handlers.

use crate::config::Config;
use crate::db::{BookStore, Category, SEED_CATEGORIES};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Book store, opened once per process.
    pub store: Arc<dyn BookStore>,
}

impl AppState {
    /// Create new application state around a store.
    pub fn new(config: Config, store: impl BookStore + 'static) -> Self {
        Self::with_store(config, Arc::new(store))
    }

    /// Create new application state around an already shared store.
    pub fn with_store(config: Config, store: Arc<dyn BookStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Categories for select boxes.
    ///
    /// Falls back to the seed list when the store cannot be read, so forms
    /// still render.
    pub fn categories(&self) -> Vec<Category> {
        match self.store.list_categories() {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load categories, using defaults");
                SEED_CATEGORIES
                    .iter()
                    .map(|(id, name)| Category {
                        id: *id,
                        name: name.to_string(),
                    })
                    .collect()
            }
        }
    }
}
