//! HTTP Request body types

use serde::{Deserialize, Serialize};

use crate::key_value::{KeyValueItem, blank_rows, rows_or_blank};

/// The kind of request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BodyType {
    /// No body
    #[default]
    None,
    /// Raw JSON text
    Json,
    /// Raw plain text
    Text,
    /// Multipart form data
    FormData,
    /// Form URL encoded body
    #[serde(rename = "x-www-form-urlencoded")]
    FormUrlEncoded,
}

/// HTTP request body as edited by the user.
///
/// `content` is authoritative for JSON and text bodies, `form_data` for
/// the form encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    /// The kind of body
    #[serde(rename = "type", default)]
    pub kind: BodyType,
    /// Raw content for JSON and text bodies
    #[serde(default)]
    pub content: String,
    /// Fields for form bodies
    #[serde(default = "blank_rows", deserialize_with = "rows_or_blank")]
    pub form_data: Vec<KeyValueItem>,
}

impl Default for RequestBody {
    fn default() -> Self {
        Self::none()
    }
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub fn none() -> Self {
        Self {
            kind: BodyType::None,
            content: String::new(),
            form_data: blank_rows(),
        }
    }

    /// Creates a JSON body.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self {
            kind: BodyType::Json,
            content: content.into(),
            ..Self::none()
        }
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: BodyType::Text,
            content: content.into(),
            ..Self::none()
        }
    }

    /// Creates a form body of the given kind from the supplied fields.
    #[must_use]
    pub fn form(kind: BodyType, fields: Vec<KeyValueItem>) -> Self {
        Self {
            kind,
            content: String::new(),
            form_data: fields,
        }
    }

    /// Reports why a JSON body does not parse, for editor hints.
    ///
    /// Validity is advisory: an invalid JSON body is still sent as-is.
    /// Empty content and non-JSON bodies yield `None`.
    #[must_use]
    pub fn json_error(&self) -> Option<String> {
        if self.kind != BodyType::Json || self.content.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<serde_json::Value>(&self.content)
            .err()
            .map(|e| format!("Invalid JSON: {e}"))
    }
}
