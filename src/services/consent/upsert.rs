use serde_json::Value;
use tracing::{debug, warn};

use super::validation;
use crate::http::{Error, StoreResultExt};
use crate::store;
use crate::types::{ConsentRecord, Error as ErrorType, RecordView};
use crate::App;

/// Creates or updates the consent record of one employee.
///
/// The record is created with a fresh identity if its phone number is
/// new, otherwise the stored record keeps its identity and every other
/// field is overwritten.
#[derive(Debug)]
pub struct Upsert<'a> {
    pub body: &'a Value,
}

impl Upsert<'_> {
    /// Insert attempts before giving up on a key whose record keeps
    /// disappearing between the insert and the update.
    const MAX_ATTEMPTS: usize = 3;

    #[tracing::instrument(skip_all, name = "services.consent.upsert")]
    pub async fn perform(self, app: &App) -> Result<RecordView, Error> {
        let employee = validation::validate(self.body)
            .map_err(|error| Error::from_context(ErrorType::InvalidField(error.0), error))?;

        // The insert is conditional on the phone number being absent, so
        // concurrent first-time upserts of one key cannot both create.
        for _ in 0..Self::MAX_ATTEMPTS {
            let record = ConsentRecord::new(employee.clone());
            let created = app
                .store
                .insert(&record)
                .await
                .or_fail_with(|cause| ErrorType::CreateFailed { cause })?;

            if created {
                debug!(id = %record.id, "Created consent record");
                return Ok(RecordView::Created(record));
            }

            let updated = app
                .store
                .update(&employee)
                .await
                .or_fail_with(|cause| ErrorType::UpdateFailed { cause })?;

            if updated {
                debug!("Updated consent record");
                return Ok(RecordView::Updated(employee));
            }

            warn!("Consent record disappeared before it could be updated, retrying");
        }

        Err(Error::from_context(
            ErrorType::UpdateFailed {
                cause: store::Error::Contended.to_string(),
            },
            store::Error::Contended,
        ))
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, VanishingBackend};
    use crate::types::Field;
    use serde_json::json;

    fn body(phone_no: &str, consent: &str) -> Value {
        json!({
            "name": "A",
            "nickname": "a",
            "facility": "F",
            "empNum": "E1",
            "phoneNo": phone_no,
            "consent": consent,
        })
    }

    #[tokio::test]
    async fn creates_then_updates() {
        let app = test_utils::build_test_app();

        let created = Upsert {
            body: &body("555", "granted"),
        }
        .perform(&app)
        .await
        .unwrap();
        let id = created.id().unwrap();

        let updated = Upsert {
            body: &body("555", "revoked"),
        }
        .perform(&app)
        .await
        .unwrap();
        assert_eq!(updated.id(), None);
        assert_eq!(updated.employee().consent, "revoked");

        let stored = app.store.get("555").await.unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.employee.consent, "revoked");
    }

    #[tokio::test]
    async fn rejects_invalid_body_before_store() {
        let app = test_utils::build_failing_app();
        let mut request = body("555", "granted");
        request["facility"] = json!(12);

        let error = Upsert { body: &request }.perform(&app).await.unwrap_err();
        assert_eq!(error.as_type(), &ErrorType::InvalidField(Field::Facility));
    }

    #[tokio::test]
    async fn concurrent_first_upserts_create_once() {
        let app = test_utils::build_test_app();
        let first = body("555", "granted");
        let second = body("555", "revoked");

        let (a, b) = tokio::join!(
            Upsert { body: &first }.perform(&app),
            Upsert { body: &second }.perform(&app),
        );

        let created = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|view| view.id().is_some())
            .count();
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn store_failure_is_create_failure() {
        let app = test_utils::build_failing_app();
        let error = Upsert {
            body: &body("555", "granted"),
        }
        .perform(&app)
        .await
        .unwrap_err();

        assert!(matches!(error.as_type(), ErrorType::CreateFailed { .. }));
    }

    #[tokio::test]
    async fn gives_up_on_vanishing_record() {
        let app = test_utils::build_app_with(VanishingBackend);
        let error = Upsert {
            body: &body("555", "granted"),
        }
        .perform(&app)
        .await
        .unwrap_err();

        assert!(matches!(error.as_type(), ErrorType::UpdateFailed { .. }));
        assert!(error.downcast_ref::<store::Error>().is_some());
    }
}
