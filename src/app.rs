use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{config, store::Store};

/// Shared state of the service, cloned into every HTTP worker.
#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub store: Store,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all)]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let store = Store::connect(&cfg.store).await.change_context(AppError)?;
        Ok(Self::with_store(cfg, store))
    }

    /// Creates an [`App`] around an already built store.
    #[must_use]
    pub fn with_store(cfg: config::Server, store: Store) -> Self {
        Self {
            config: Arc::new(cfg),
            store,
        }
    }
}
