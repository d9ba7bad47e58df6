use async_trait::async_trait;
use error_stack::{Report, ResultExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config;
use crate::types::{ConsentRecord, Employee};

mod error;
mod memory;
mod postgres;

pub use error::*;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// A key-value store of consent records keyed by phone number.
///
/// Implementations must make every single-key operation atomic. No
/// guarantee is expected across different keys.
#[async_trait]
pub trait Backend: std::fmt::Debug + Send + Sync {
    /// Reads the record stored under `phone_no`.
    async fn get(&self, phone_no: &str) -> Result<Option<ConsentRecord>>;

    /// Writes the record only if its phone number is not taken yet.
    ///
    /// Returns `false` without touching the store otherwise.
    async fn insert(&self, record: &ConsentRecord) -> Result<bool>;

    /// Writes the whole record, replacing whatever was stored under
    /// its phone number (including the identity).
    async fn put(&self, record: &ConsentRecord) -> Result<()>;

    /// Overwrites the mutable fields of an existing record and keeps
    /// its identity. Returns `false` if nothing is stored under the
    /// employee's phone number.
    async fn update(&self, employee: &Employee) -> Result<bool>;
}

/// Handle to the consent store shared by every request.
///
/// Every call is bounded by the configured timeout, a stalled backend
/// fails the call with [`Error::Timeout`].
#[derive(Debug, Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
    timeout: Duration,
}

impl Store {
    #[must_use]
    pub fn new(backend: impl Backend + 'static, timeout: Duration) -> Self {
        Self {
            backend: Arc::new(backend),
            timeout,
        }
    }

    /// Builds the store backend chosen from the configuration.
    #[tracing::instrument(skip_all, name = "store.connect", fields(backend = ?cfg.backend))]
    pub async fn connect(cfg: &config::Store) -> Result<Self> {
        let timeout = Duration::from_secs(cfg.timeout_secs.get());
        match cfg.backend {
            config::StoreBackend::Memory => Ok(Self::new(MemoryStore::default(), timeout)),
            config::StoreBackend::Postgres => {
                let Some(pg) = cfg.postgres.as_ref() else {
                    return Err(Report::new(Error::InvalidUrl))
                        .attach_printable("`store.postgres` is not configured");
                };
                let backend = PostgresStore::connect(pg, timeout).await?;
                Ok(Self::new(backend, timeout))
            }
        }
    }
}

impl Store {
    #[tracing::instrument(skip_all, name = "store.get", fields(phone_no = "<hidden>"))]
    pub async fn get(&self, phone_no: &str) -> Result<Option<ConsentRecord>> {
        self.bounded(self.backend.get(phone_no)).await
    }

    #[tracing::instrument(skip_all, name = "store.insert", fields(id = %record.id))]
    pub async fn insert(&self, record: &ConsentRecord) -> Result<bool> {
        self.bounded(self.backend.insert(record)).await
    }

    #[tracing::instrument(skip_all, name = "store.put", fields(id = %record.id))]
    pub async fn put(&self, record: &ConsentRecord) -> Result<()> {
        self.bounded(self.backend.put(record)).await
    }

    #[tracing::instrument(skip_all, name = "store.update", fields(phone_no = "<hidden>"))]
    pub async fn update(&self, employee: &Employee) -> Result<bool> {
        self.bounded(self.backend.update(employee)).await
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(elapsed) => {
                tracing::warn!(timeout = ?self.timeout, "Store call timed out");
                Err(Report::new(elapsed).change_context(Error::Timeout(self.timeout)))
            }
        }
    }
}
