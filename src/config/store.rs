use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64, NonZeroUsize};
use url::Url;

use crate::types::Sensitive;

/// Where consent records are kept.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Records live in process memory and are lost on restart.
    #[default]
    Memory,
    /// Records live in a Postgres table.
    Postgres,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Store {
    /// **Environment variables**:
    /// - `ASKHR_STORE_BACKEND`
    pub backend: StoreBackend,
    /// How long a single store call may take before the request
    /// fails with a store error.
    ///
    /// **Environment variables**:
    /// - `ASKHR_STORE_TIMEOUT_SECS`
    pub timeout_secs: NonZeroU64,
    /// Maximum amount of writes a batch upsert keeps in flight.
    ///
    /// **Environment variables**:
    /// - `ASKHR_STORE_BATCH_CONCURRENCY`
    pub batch_concurrency: NonZeroUsize,
    /// Required if `backend` is `postgres`.
    pub postgres: Option<Postgres>,
}

/// Configuration for connecting to a Postgres database
#[derive(Debug, Deserialize)]
pub struct Postgres {
    /// Connection URL connecting to the Postgres database.
    ///
    /// **Environment variables**:
    /// - `ASKHR_STORE_POSTGRES_URL` or `DATABASE_URL`
    pub url: Sensitive<Url>,
    /// Minimum idle database connections just to avoid wasting
    /// hardware resources from the database server.
    ///
    /// **Environment variables**:
    /// - `ASKHR_STORE_POSTGRES_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// Maximum amount of pool size that database can handle
    ///
    /// **Environment variables**:
    /// - `ASKHR_STORE_POSTGRES_POOL_SIZE`
    #[serde(default = "Postgres::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Prefer encrypting database connections with TLS.
    ///
    /// **Environment variables**:
    /// - `ASKHR_STORE_POSTGRES_ENFORCE_TLS`
    #[serde(default = "Postgres::default_enforce_tls")]
    pub enforce_tls: bool,
    /// Table holding the consent records.
    #[serde(default = "Postgres::default_table")]
    pub table: String,
}

impl Store {
    const DEFAULT_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_BATCH_CONCURRENCY: usize = 8;

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    const fn default_batch_concurrency() -> NonZeroUsize {
        match NonZeroUsize::new(Self::DEFAULT_BATCH_CONCURRENCY) {
            Some(n) => n,
            None => panic!("DEFAULT_BATCH_CONCURRENCY is accidentally set to 0"),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            timeout_secs: Self::default_timeout_secs(),
            batch_concurrency: Self::default_batch_concurrency(),
            postgres: None,
        }
    }
}

impl Postgres {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_TABLE: &'static str = "askhr_consents";

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_enforce_tls() -> bool {
        true
    }

    fn default_table() -> String {
        Self::DEFAULT_TABLE.to_string()
    }

    pub(crate) fn has_postgres_scheme(&self) -> bool {
        matches!(self.url.as_ref().scheme(), "postgres" | "postgresql")
    }

    pub(crate) fn has_valid_table(&self) -> bool {
        let mut chars = self.table.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
