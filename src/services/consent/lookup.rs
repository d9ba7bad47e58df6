use thiserror::Error;

use crate::http::{Error, StoreResultExt};
use crate::types::{ConsentRecord, Error as ErrorType};
use crate::App;

/// Reads the consent record stored under a phone number.
#[derive(Debug)]
pub struct Lookup<'a> {
    pub phone_no: &'a str,
}

#[derive(Debug, Error)]
#[error("No consent record is stored under the given phone number")]
struct NotFound;

impl Lookup<'_> {
    #[tracing::instrument(skip_all, name = "services.consent.lookup")]
    pub async fn perform(self, app: &App) -> Result<ConsentRecord, Error> {
        let record = app
            .store
            .get(self.phone_no)
            .await
            .or_fail_with(|cause| ErrorType::RetrieveFailed { cause })?;

        record.ok_or_else(|| Error::from_context(ErrorType::ConsentNotFound, NotFound))
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[tokio::test]
    async fn finds_stored_record() {
        let app = test_utils::build_test_app();
        let record = test_utils::insert_record(&app, "555", "granted").await;

        let found = Lookup { phone_no: "555" }.perform(&app).await.unwrap();
        assert_eq!(found, record);
    }

    #[tokio::test]
    async fn unknown_phone_is_not_found() {
        let app = test_utils::build_test_app();
        let error = Lookup { phone_no: "000" }.perform(&app).await.unwrap_err();
        assert_eq!(error.as_type(), &ErrorType::ConsentNotFound);
    }

    #[tokio::test]
    async fn store_failure_hides_existence() {
        let app = test_utils::build_failing_app();
        let error = Lookup { phone_no: "555" }.perform(&app).await.unwrap_err();
        assert!(matches!(error.as_type(), ErrorType::RetrieveFailed { .. }));
        assert!(error.downcast_ref::<crate::store::Error>().is_some());
    }
}
