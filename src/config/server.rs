use error_stack::{Report, Result};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;

use super::{Logging, ParseError, Store, StoreBackend};
use crate::util::figment::FigmentErrorAttachable;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    /// **Environment variables**:
    /// - `ASKHR_IP`
    pub ip: IpAddr,
    /// **Environment variables**:
    /// - `ASKHR_PORT`
    pub port: u16,
    /// Amount of HTTP workers (and runtime threads) to spawn.
    ///
    /// **Environment variables**:
    /// - `ASKHR_WORKERS`
    pub workers: NonZeroUsize,
    /// First path segment of every route, `/{resource}/get_consent/..`.
    ///
    /// **Environment variables**:
    /// - `ASKHR_RESOURCE`
    pub resource: String,
    /// Largest accepted JSON request body in bytes.
    ///
    /// **Environment variables**:
    /// - `ASKHR_BODY_LIMIT`
    pub body_limit: usize,
    pub store: Store,
    pub logging: Logging,
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "askhr.toml";
    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_RESOURCE: &'static str = "askhr";
    const DEFAULT_BODY_LIMIT: usize = 256 * 1024;

    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config.validate()?;
        Ok(config)
    }

    /// Creates a default [`Figment`] object to load server
    /// configuration. This function is there for [`Server::load`]
    /// and testing.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // Fields with underscores in their names cannot be
            // split by the env provider, so they are mapped by hand.
            .merge(Env::prefixed("ASKHR_").map(|v| match v.as_str() {
                "BODY_LIMIT" => "body_limit".into(),

                "STORE_TIMEOUT_SECS" => "store.timeout_secs".into(),
                "STORE_BATCH_CONCURRENCY" => "store.batch_concurrency".into(),

                "STORE_POSTGRES_MIN_IDLE" => "store.postgres.min_idle".into(),
                "STORE_POSTGRES_POOL_SIZE" => "store.postgres.pool_size".into(),
                "STORE_POSTGRES_ENFORCE_TLS" => "store.postgres.enforce_tls".into(),

                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL"])
                    .map(|_| "store.postgres.url".into()),
            )
    }

    fn validate(&self) -> Result<(), ParseError> {
        if self.resource.is_empty() || self.resource.contains('/') {
            return Err(Report::new(ParseError)
                .attach_printable("`resource` must be a single non-empty path segment"));
        }

        match (self.store.backend, self.store.postgres.as_ref()) {
            (StoreBackend::Postgres, None) => {
                return Err(Report::new(ParseError).attach_printable(
                    "`store.postgres` must be configured to use the postgres backend",
                ));
            }
            (_, Some(pg)) if !pg.has_postgres_scheme() => {
                return Err(Report::new(ParseError)
                    .attach_printable("Invalid Postgres connection URL"));
            }
            (_, Some(pg)) if !pg.has_valid_table() => {
                return Err(Report::new(ParseError)
                    .attach_printable(format!("Invalid table name {:?}", pg.table)));
            }
            _ => {}
        }

        Ok(())
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: Self::DEFAULT_PORT,
            workers: std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            resource: Self::DEFAULT_RESOURCE.to_string(),
            body_limit: Self::DEFAULT_BODY_LIMIT,
            store: Store::default(),
            logging: Logging::default(),
        }
    }
}
