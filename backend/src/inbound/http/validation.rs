//! Request validation helpers shared by the HTTP handlers.
//!
//! Every failure becomes an `invalid_request` error whose details name the
//! offending field and a machine-readable problem code.

use pagination::{Cursor, CursorError, PageParams};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::domain::{AuthFormErrors, Error};

/// Problem codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Problem {
    MissingField,
    InvalidUuid,
    InvalidCursor,
    InvalidFields,
}

impl Problem {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidCursor => "invalid_cursor",
            Self::InvalidFields => "invalid_fields",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let FieldName(name) = field;
    Error::invalid_field(
        name,
        Problem::MissingField.as_str(),
        format!("missing required field: {name}"),
    )
}

/// Parse a list of identifiers, reporting the first bad entry by index.
pub(crate) fn parse_uuid_list(values: Vec<String>, field: FieldName) -> Result<Vec<Uuid>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(&value).map_err(|_| {
                let FieldName(name) = field;
                Error::invalid_request(format!("{name} must contain valid UUIDs")).with_details(
                    json!({
                        "field": name,
                        "index": index,
                        "value": value,
                        "code": Problem::InvalidUuid.as_str(),
                    }),
                )
            })
        })
        .collect()
}

/// Decode the page cursor, rejecting tokens minted for another listing.
pub(crate) fn parse_cursor<K: DeserializeOwned>(
    params: &PageParams,
) -> Result<Option<Cursor<K>>, Error> {
    params.cursor().map_err(|error: CursorError| {
        Error::invalid_field(
            "cursor",
            Problem::InvalidCursor.as_str(),
            format!("cursor is invalid: {error}"),
        )
    })
}

/// Field-keyed form failures as one `invalid_request` error.
///
/// Details carry `{ "code": "invalid_fields", "errors": { field: message } }`
/// and the message is the first failure, so simple clients can show it as
/// is.
pub(crate) fn form_error(errors: &AuthFormErrors) -> Error {
    let fields: Map<String, Value> = errors
        .iter()
        .map(|(field, message)| (field.to_owned(), Value::from(message)))
        .collect();
    let message = errors
        .iter()
        .next()
        .map_or_else(|| "invalid request".to_owned(), |(_, message)| message.to_owned());
    Error::invalid_request(message).with_details(json!({
        "code": Problem::InvalidFields.as_str(),
        "errors": fields,
    }))
}
