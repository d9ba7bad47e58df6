use thiserror::Error;

mod logging;
mod server;
mod store;

pub use logging::{Logging, LoggingStyle};
pub use server::Server;
pub use store::{Postgres, Store, StoreBackend};

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
