use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Output format of the console logger.
    ///
    /// **Environment variables**:
    /// - `ASKHR_LOGGING_STYLE`
    pub style: LoggingStyle,
    /// Filter directives (same syntax as `RUST_LOG`). When empty,
    /// `RUST_LOG` is read instead.
    ///
    /// **Environment variables**:
    /// - `ASKHR_LOGGING_TARGETS`
    pub targets: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingStyle {
    #[default]
    Pretty,
    Compact,
    Json,
}
