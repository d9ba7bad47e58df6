use serde_json::Value;
use thiserror::Error;

use crate::types::{Employee, Field};

/// The first required field of a request body that is missing or not
/// a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("\"{}\" must be a string", .0.label())]
pub struct InvalidField(pub Field);

/// Checks that a request body carries every required field as a string.
///
/// Fields are checked in the order of [`Field::ALL`] and checking stops
/// at the first bad one, so a malformed body always reports the same
/// field. A body that is not an object fails on the first field.
pub fn validate(body: &Value) -> Result<Employee, InvalidField> {
    let string = |field: Field| {
        body.get(field.key())
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(InvalidField(field))
    };

    Ok(Employee {
        name: string(Field::Name)?,
        nickname: string(Field::Nickname)?,
        facility: string(Field::Facility)?,
        emp_num: string(Field::EmpNum)?,
        phone_no: string(Field::PhoneNo)?,
        consent: string(Field::Consent)?,
    })
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "name": "A",
            "nickname": "a",
            "facility": "F",
            "empNum": "E1",
            "phoneNo": "555",
            "consent": "granted",
        })
    }

    #[test]
    fn accepts_complete_body() {
        let employee = validate(&valid_body()).unwrap();
        assert_eq!(employee.emp_num, "E1");
        assert_eq!(employee.phone_no, "555");
        assert_eq!(employee.consent, "granted");
    }

    #[test]
    fn reports_each_missing_field() {
        for field in Field::ALL {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field.key());
            assert_eq!(validate(&body), Err(InvalidField(field)));
        }
    }

    #[test]
    fn reports_first_offending_field() {
        let body = json!({
            "name": "A",
            "nickname": 7,
            "facility": null,
            "empNum": "E1",
            "phoneNo": 555,
            "consent": "granted",
        });
        assert_eq!(validate(&body), Err(InvalidField(Field::Nickname)));
    }

    #[test]
    fn non_objects_fail_on_name() {
        for body in [json!(null), json!([]), json!("A"), json!(42)] {
            assert_eq!(validate(&body), Err(InvalidField(Field::Name)));
        }
    }

    #[test]
    fn messages_use_field_labels() {
        assert_eq!(
            InvalidField(Field::Name).to_string(),
            "\"name\" must be a string"
        );
        assert_eq!(
            InvalidField(Field::PhoneNo).to_string(),
            "\"phone number\" must be a string"
        );
    }
}
