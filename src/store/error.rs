use error_stack::Report;
use std::time::Duration;
use thiserror::Error;

/// Consent store related errors
#[derive(Debug, Error)]
pub enum Error {
    /// An error caused by an invalid Postgres connection url.
    #[error("invalid connection url")]
    InvalidUrl,
    /// An error caused by an [`sqlx`] error.
    #[error("received a database error: {0}")]
    Internal(sqlx::Error),
    /// The store did not reply within the configured time limit.
    #[error("store did not respond within {}s", .0.as_secs_f64())]
    Timeout(Duration),
    /// The connection pool has no reliable connection to the
    /// database server.
    #[error("unhealthy store connection pool")]
    UnhealthyPool,
    /// The record behind a key kept changing while it was written.
    #[error("record changed concurrently while writing")]
    Contended,
}

/// Converts from a generic [sqlx] result into a [store compatible error](Error).
pub trait ErrorExt<T> {
    fn into_store_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_store_error(self) -> Result<T> {
        self.map_err(|e| match &e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Report::new(e).change_context(Error::UnhealthyPool)
            }
            _ => Report::new(Error::Internal(e)),
        })
    }
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a store error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_unhealthy() {
        let result: std::result::Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        let report = result.into_store_error().unwrap_err();
        assert!(matches!(report.current_context(), Error::UnhealthyPool));
    }

    #[test]
    fn timeout_message_names_limit() {
        let error = Error::Timeout(Duration::from_millis(1500));
        assert_eq!(error.to_string(), "store did not respond within 1.5s");
    }
}
