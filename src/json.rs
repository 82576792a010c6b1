//! JSON wire format for records.
//!
//! Records cross the service boundary as JSON objects with a single `fields`
//! array; every field carries its tag under the key `name`, a two-character
//! `indicator` and a `subfields` array of `{name, value}` pairs:
//!
//! ```json
//! {"fields": [
//!   {"name": "001", "indicator": "00", "subfields": [
//!     {"name": "a", "value": "2 345 678 9"},
//!     {"name": "b", "value": "870970"}
//!   ]}
//! ]}
//! ```
//!
//! The [`Record`](crate::record::Record) serde implementation produces this
//! shape directly; the helpers here add string/value conversion and reject
//! payloads whose tags are not three characters.

use serde_json::Value;

use crate::error::{Result, UpdateError};
use crate::record::Record;

/// Serialize a record to a JSON value.
///
/// # Errors
///
/// Returns [`UpdateError::Json`] when serialization fails.
pub fn record_to_json(record: &Record) -> Result<Value> {
    Ok(serde_json::to_value(record)?)
}

/// Serialize a record to a JSON string.
///
/// # Errors
///
/// Returns [`UpdateError::Json`] when serialization fails.
pub fn record_to_json_string(record: &Record) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Deserialize a record from a JSON value.
///
/// # Errors
///
/// Returns [`UpdateError::Json`] when the payload does not match the wire
/// shape and [`UpdateError::InvalidTag`] when a field tag is not three
/// characters.
pub fn record_from_json(value: &Value) -> Result<Record> {
    let record: Record = serde_json::from_value(value.clone())?;
    validate_tags(&record)?;
    Ok(record)
}

/// Deserialize a record from a JSON string.
///
/// # Errors
///
/// Returns [`UpdateError::Json`] when the payload does not match the wire
/// shape and [`UpdateError::InvalidTag`] when a field tag is not three
/// characters.
pub fn record_from_json_str(payload: &str) -> Result<Record> {
    let record: Record = serde_json::from_str(payload)?;
    validate_tags(&record)?;
    Ok(record)
}

fn validate_tags(record: &Record) -> Result<()> {
    for field in record.fields() {
        if field.tag.chars().count() != 3 {
            return Err(UpdateError::InvalidTag(field.tag.clone()));
        }
    }
    Ok(())
}
