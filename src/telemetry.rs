use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::{self, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

pub fn init(config: &config::Logging) -> Result<(), TracingInitError> {
    let filter = make_env_filter(&config.targets);
    let console = match config.style {
        LoggingStyle::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_filter(filter)
            .boxed(),
        LoggingStyle::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_filter(filter)
            .boxed(),
        LoggingStyle::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_filter(filter)
            .boxed(),
    };

    let registry = tracing_subscriber::Registry::default()
        .with(console)
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    Ok(())
}

#[cfg(test)]
pub(crate) fn init_for_tests() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let console = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_filter(make_env_filter(""));

        let registry = tracing_subscriber::Registry::default()
            .with(console)
            .with(ErrorLayer::default());

        // another harness may have installed its own subscriber
        tracing::subscriber::set_global_default(registry).ok();
    });
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let builder = EnvFilter::builder().with_default_directive(default_level.into());
    if targets.is_empty() {
        builder.from_env_lossy()
    } else {
        builder.parse_lossy(targets)
    }
}
