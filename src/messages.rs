//! Validation messages returned to submitting clients.
//!
//! Authorization rejections are data, not errors: each is a
//! [`ValidationMessage`] with a severity type and a parameter object, and the
//! whole response is a JSON array of them. The shape is bit-compatible with
//! the surrounding platform:
//!
//! ```json
//! [{"type": "ERROR", "params": {"url": "", "message": "...", "fieldno": -1}}]
//! ```

use serde::{Deserialize, Serialize};

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    /// The update is rejected.
    Error,
    /// The update proceeds, but the submitter should be told.
    Warning,
}

/// Parameters of a validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageParams {
    /// Link to documentation of the failed rule, empty when none exists.
    #[serde(default)]
    pub url: String,
    /// Human-readable message in the cataloguing language.
    pub message: String,
    /// Index of the field the message concerns, absent for record-level
    /// messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieldno: Option<i32>,
    /// Index of the subfield the message concerns, absent unless the message
    /// points at a single subfield.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subfieldno: Option<i32>,
}

/// A single validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Message severity.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Message parameters.
    pub params: MessageParams,
}

impl ValidationMessage {
    /// Create a record-level error message.
    #[must_use]
    pub fn record_error(message: impl Into<String>) -> Self {
        ValidationMessage {
            message_type: MessageType::Error,
            params: MessageParams {
                url: String::new(),
                message: message.into(),
                fieldno: None,
                subfieldno: None,
            },
        }
    }

    /// Create an error message pointing at a field.
    #[must_use]
    pub fn field_error(message: impl Into<String>, fieldno: i32) -> Self {
        ValidationMessage {
            message_type: MessageType::Error,
            params: MessageParams {
                url: String::new(),
                message: message.into(),
                fieldno: Some(fieldno),
                subfieldno: None,
            },
        }
    }

    /// Create an error message pointing at a single subfield.
    #[must_use]
    pub fn subfield_error(message: impl Into<String>, fieldno: i32, subfieldno: i32) -> Self {
        ValidationMessage {
            message_type: MessageType::Error,
            params: MessageParams {
                url: String::new(),
                message: message.into(),
                fieldno: Some(fieldno),
                subfieldno: Some(subfieldno),
            },
        }
    }

    /// Set the documentation link of the message.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.params.url = url.into();
        self
    }

    /// The message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.params.message
    }
}
