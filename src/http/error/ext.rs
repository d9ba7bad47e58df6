use super::Error;
use crate::{store, types::Error as ErrorType};

/// Turns a failed store call into a request error whose body
/// carries the store error as its `cause`.
pub trait StoreResultExt<T> {
    fn or_fail_with(self, error_type: impl FnOnce(String) -> ErrorType) -> Result<T, Error>;
}

impl<T> StoreResultExt<T> for store::Result<T> {
    fn or_fail_with(self, error_type: impl FnOnce(String) -> ErrorType) -> Result<T, Error> {
        self.map_err(|report| {
            tracing::warn!(error = ?report, "Store call failed");
            let cause = report.current_context().to_string();
            Error::from_report(error_type(cause), report)
        })
    }
}
