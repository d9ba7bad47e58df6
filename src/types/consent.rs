use serde::Serialize;

use super::RecordId;

/// Caller-supplied fields of a consent record.
///
/// Every upsert carries the whole set, partial updates are
/// not supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub name: String,
    pub nickname: String,
    pub facility: String,
    pub emp_num: String,
    /// Natural key of the record.
    pub phone_no: String,
    pub consent: String,
}

/// A stored consent record: the employee fields plus the identity
/// minted when the phone number was first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsentRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub employee: Employee,
}

impl ConsentRecord {
    /// Wraps the employee fields in a record with a fresh identity.
    #[must_use]
    pub fn new(employee: Employee) -> Self {
        Self {
            id: RecordId::generate(),
            employee,
        }
    }

    #[must_use]
    pub fn phone_no(&self) -> &str {
        &self.employee.phone_no
    }
}

/// What the caller gets back from a single-record upsert.
///
/// The identity is only revealed when the record was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordView {
    Created(ConsentRecord),
    Updated(Employee),
}

impl RecordView {
    #[must_use]
    pub fn employee(&self) -> &Employee {
        match self {
            Self::Created(record) => &record.employee,
            Self::Updated(employee) => employee,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<RecordId> {
        match self {
            Self::Created(record) => Some(record.id),
            Self::Updated(..) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsentView {
    pub consent: String,
}

/// Required request fields, listed in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Nickname,
    Facility,
    EmpNum,
    PhoneNo,
    Consent,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Nickname,
        Field::Facility,
        Field::EmpNum,
        Field::PhoneNo,
        Field::Consent,
    ];

    /// Key of the field in a request body.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Nickname => "nickname",
            Self::Facility => "facility",
            Self::EmpNum => "empNum",
            Self::PhoneNo => "phoneNo",
            Self::Consent => "consent",
        }
    }

    /// Human readable name used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Nickname => "nickname",
            Self::Facility => "facility",
            Self::EmpNum => "employee number",
            Self::PhoneNo => "phone number",
            Self::Consent => "consent",
        }
    }
}

/// Outcome of a batch upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub error_details: Vec<BatchEntryError>,
    pub count_added: usize,
}

/// A record of a batch that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntryError {
    /// 0-based position of the record in the request.
    #[serde(skip)]
    pub index: usize,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(rename = "errorCode")]
    pub error_code: u16,
}

impl BatchEntryError {
    #[must_use]
    pub fn invalid(index: usize, message: impl std::fmt::Display) -> Self {
        Self {
            index,
            error: format!("{}. {message}", index + 1),
            cause: None,
            error_code: 400,
        }
    }

    #[must_use]
    pub fn write_failed(index: usize, cause: String) -> Self {
        Self {
            index,
            error: format!("{}. Could not create askhr employee", index + 1),
            cause: Some(cause),
            error_code: 500,
        }
    }
}
