pub mod app;
pub mod config;
pub mod http;
pub mod services;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod util;

pub use app::App;

#[cfg(test)]
pub(crate) mod test_utils;
