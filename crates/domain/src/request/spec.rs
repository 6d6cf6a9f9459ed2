//! Editable request type

use serde::{Deserialize, Serialize};

use super::{HttpMethod, RequestBody};
use crate::auth::AuthConfig;
use crate::id::RequestId;
use crate::key_value::{KeyValueItem, blank_rows, ensure_trailing_blank, rows_or_blank};
use crate::response::ResponseRecord;

/// A request as the user edits it, plus the outcome of its last dispatch.
///
/// Field groups are replaced through the `with_*` functions, each of which
/// returns a new value and leaves the original untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// Collection-scoped identifier
    pub id: RequestId,
    /// Human-readable name
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL (may be relative to the base URL and contain variables)
    pub url: String,
    /// Query parameters, appended in order
    #[serde(default = "blank_rows", deserialize_with = "rows_or_blank")]
    pub params: Vec<KeyValueItem>,
    /// Request headers
    #[serde(default = "blank_rows", deserialize_with = "rows_or_blank")]
    pub headers: Vec<KeyValueItem>,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Outcome of the last dispatch
    #[serde(default)]
    pub response: Option<ResponseRecord>,
    /// When the last dispatch happened, in epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<i64>,
}

impl ApiRequest {
    /// Creates a blank GET request with the given id.
    #[must_use]
    pub fn new(id: RequestId) -> Self {
        Self {
            id,
            name: "New Request".to_string(),
            method: HttpMethod::Get,
            url: String::new(),
            params: blank_rows(),
            headers: blank_rows(),
            body: RequestBody::none(),
            auth: AuthConfig::none(),
            response: None,
            sent_at: None,
        }
    }

    /// Returns a copy renamed to `name`.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Returns a copy using `method`.
    #[must_use]
    pub fn with_method(self, method: HttpMethod) -> Self {
        Self { method, ..self }
    }

    /// Returns a copy targeting `url`.
    #[must_use]
    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self
        }
    }

    /// Returns a copy with `params` replacing the query parameter rows.
    #[must_use]
    pub fn with_params(self, params: Vec<KeyValueItem>) -> Self {
        Self {
            params: ensure_trailing_blank(params),
            ..self
        }
    }

    /// Returns a copy with `headers` replacing the header rows.
    #[must_use]
    pub fn with_headers(self, headers: Vec<KeyValueItem>) -> Self {
        Self {
            headers: ensure_trailing_blank(headers),
            ..self
        }
    }

    /// Returns a copy with `body` replacing the body.
    #[must_use]
    pub fn with_body(self, body: RequestBody) -> Self {
        let body = RequestBody {
            form_data: ensure_trailing_blank(body.form_data),
            ..body
        };
        Self { body, ..self }
    }

    /// Returns a copy with `auth` replacing the authentication.
    #[must_use]
    pub fn with_auth(self, auth: AuthConfig) -> Self {
        Self { auth, ..self }
    }

    /// Returns the dispatched form of this request.
    #[must_use]
    pub fn with_response(self, response: ResponseRecord, sent_at: i64) -> Self {
        Self {
            response: Some(response),
            sent_at: Some(sent_at),
            ..self
        }
    }

    /// Returns a copy under a new id with no dispatch state.
    #[must_use]
    pub fn duplicate_as(&self, id: RequestId) -> Self {
        Self {
            id,
            response: None,
            sent_at: None,
            ..self.clone()
        }
    }

    /// Returns true if the URL contains variable placeholders.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        self.url.contains("{{") && self.url.contains("}}")
    }
}
