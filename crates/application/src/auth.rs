//! Effective credential resolution
//!
//! A request's own auth wins; otherwise the global auth applies. The result
//! is a single placement the compiler writes into a header or the query.

use nexus_domain::{ApiKeyLocation, AuthConfig, AuthType};
use tracing::debug;

use crate::variable_resolver::VariableResolver;

/// Where a credential goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthLocation {
    /// As a request header
    Header,
    /// As a query parameter
    Query,
}

/// A resolved credential ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPlacement {
    /// Header or query
    pub location: AuthLocation,
    /// Header name or query key
    pub name: String,
    /// Header value or query value
    pub value: String,
}

impl AuthPlacement {
    /// Creates a header placement.
    #[must_use]
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            location: AuthLocation::Header,
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates a query placement.
    #[must_use]
    pub fn query(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            location: AuthLocation::Query,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Picks the effective auth and turns it into a placement.
///
/// Returns `None` when neither config applies anything, including an
/// `api-key` config without a key name.
#[must_use]
pub fn resolve_auth(
    request_auth: &AuthConfig,
    global_auth: &AuthConfig,
    resolver: &VariableResolver,
) -> Option<AuthPlacement> {
    let effective = if request_auth.is_configured() {
        request_auth
    } else if global_auth.is_configured() {
        debug!("request has no auth, falling back to global auth");
        global_auth
    } else {
        return None;
    };

    let token = resolver.resolve(&effective.token);
    match effective.kind {
        AuthType::None => None,
        AuthType::Bearer => Some(AuthPlacement::header(
            "Authorization",
            format!("Bearer {token}"),
        )),
        AuthType::ApiKey => {
            let key_name = effective.key_name.as_deref().unwrap_or_default();
            if key_name.is_empty() {
                debug!("api-key auth has no key name, nothing applied");
                return None;
            }
            let name = resolver.resolve(key_name);
            Some(match effective.key_location() {
                ApiKeyLocation::Header => AuthPlacement::header(name, token),
                ApiKeyLocation::Query => AuthPlacement::query(name, token),
            })
        }
    }
}
