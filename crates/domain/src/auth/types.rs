//! Authentication configuration types

use serde::{Deserialize, Serialize};

/// The kind of credential a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuthType {
    /// No authentication
    #[default]
    None,
    /// `Authorization: Bearer <token>`
    Bearer,
    /// API key in a header or query parameter
    ApiKey,
}

/// Location for API key authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    /// Add to request headers
    Header,
    /// Add to query parameters
    #[default]
    Query,
}

/// Authentication configuration for a request or for the global fallback.
///
/// `key_name` and `add_to` are only meaningful for [`AuthType::ApiKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Which kind of credential to apply
    #[serde(rename = "type", default)]
    pub kind: AuthType,
    /// Bearer token or API key value (may contain variables like `{{token}}`)
    #[serde(default)]
    pub token: String,
    /// Header or query parameter name for API keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    /// Where an API key goes; query when unspecified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_to: Option<ApiKeyLocation>,
}

impl AuthConfig {
    /// Creates a configuration that applies no credential.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: AuthType::None,
            token: String::new(),
            key_name: None,
            add_to: None,
        }
    }

    /// Creates a bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            kind: AuthType::Bearer,
            token: token.into(),
            key_name: None,
            add_to: None,
        }
    }

    /// Creates an API key authentication.
    #[must_use]
    pub fn api_key(
        key_name: impl Into<String>,
        token: impl Into<String>,
        location: ApiKeyLocation,
    ) -> Self {
        Self {
            kind: AuthType::ApiKey,
            token: token.into(),
            key_name: Some(key_name.into()),
            add_to: Some(location),
        }
    }

    /// Returns true if authentication is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self.kind, AuthType::None)
    }

    /// Returns where an API key is placed, defaulting to the query string.
    #[must_use]
    pub fn key_location(&self) -> ApiKeyLocation {
        self.add_to.unwrap_or_default()
    }
}
