use actix_web::{body::BoxBody, error::JsonPayloadError, http::StatusCode, HttpResponse};

use super::Error;
use crate::types::Error as ErrorType;

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::InvalidField(..)
            | ErrorType::InvalidBody { .. }
            | ErrorType::NotAnArray
            | ErrorType::EmptyBatch => StatusCode::BAD_REQUEST,
            ErrorType::ConsentNotFound | ErrorType::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorType::RetrieveFailed { .. }
            | ErrorType::CreateFailed { .. }
            | ErrorType::UpdateFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).json(&self.error_type)
    }
}

impl From<JsonPayloadError> for Error {
    fn from(value: JsonPayloadError) -> Self {
        #[derive(Debug, thiserror::Error)]
        #[error("Could not read JSON request body")]
        struct InvalidBody;

        let cause = value.to_string();
        Error::from_context(ErrorType::InvalidBody { cause }, InvalidBody)
    }
}
