use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt::Display;

use super::consent::Field;

/// Errors visible to API callers.
///
/// Every variant serializes as `{ "error": <message> }`, store failures
/// also carry the underlying `cause`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidField(Field),
    InvalidBody { cause: String },
    NotAnArray,
    EmptyBatch,
    ConsentNotFound,
    RouteNotFound,
    RetrieveFailed { cause: String },
    CreateFailed { cause: String },
    UpdateFailed { cause: String },
}

impl Error {
    #[must_use]
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::InvalidBody { cause }
            | Self::RetrieveFailed { cause }
            | Self::CreateFailed { cause }
            | Self::UpdateFailed { cause } => Some(cause),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidField(field) => write!(f, "\"{}\" must be a string", field.label()),
            Error::InvalidBody { .. } => f.write_str("Invalid request body"),
            Error::NotAnArray => f.write_str(
                "to add many employee object, you need to enclose them with an array [{},].",
            ),
            Error::EmptyBatch => f.write_str("The request body is empty."),
            Error::ConsentNotFound => {
                f.write_str("Could not find consent with provided \"mobile phone\"")
            }
            Error::RouteNotFound => f.write_str("Not Found"),
            Error::RetrieveFailed { .. } => f.write_str("Could not retrieve consent"),
            Error::CreateFailed { .. } => f.write_str("Could not create askhr employee"),
            Error::UpdateFailed { .. } => f.write_str("Could not update askhr employee"),
        }
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let cause = self.cause();
        let len = if cause.is_some() { 2 } else { 1 };

        let mut state = serializer.serialize_struct("Error", len)?;
        state.serialize_field("error", &self.to_string())?;
        if let Some(cause) = cause {
            state.serialize_field("cause", cause)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::Token;

    #[track_caller]
    fn assert_message(value: &Error, message: &'static str) {
        serde_test::assert_ser_tokens(
            value,
            &[
                Token::Struct {
                    name: "Error",
                    len: 1,
                },
                Token::Str("error"),
                Token::Str(message),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_serde_impl() {
        assert_message(&Error::InvalidField(Field::Name), "\"name\" must be a string");
        assert_message(
            &Error::InvalidField(Field::EmpNum),
            "\"employee number\" must be a string",
        );
        assert_message(&Error::EmptyBatch, "The request body is empty.");
        assert_message(&Error::RouteNotFound, "Not Found");
    }

    #[test]
    fn store_failures_carry_cause() {
        serde_test::assert_ser_tokens(
            &Error::RetrieveFailed {
                cause: "unhealthy store connection pool".into(),
            },
            &[
                Token::Struct {
                    name: "Error",
                    len: 2,
                },
                Token::Str("error"),
                Token::Str("Could not retrieve consent"),
                Token::Str("cause"),
                Token::Str("unhealthy store connection pool"),
                Token::StructEnd,
            ],
        );
    }
}
