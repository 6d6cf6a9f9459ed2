//! Request compilation
//!
//! Folds an editable [`ApiRequest`] together with the global settings and
//! the active environment into one [`CompiledRequest`]: absolute URL with
//! query, final header map and encoded body. Compilation is pure and does
//! no I/O, so an invalid URL is reported before anything touches the network.

use std::collections::BTreeMap;
use std::fmt;

use nexus_domain::{ApiRequest, BodyType, Environment, GlobalSettings, HttpMethod};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::auth::{AuthLocation, resolve_auth};
use crate::key_value::{normalize, to_map};
use crate::variable_resolver::VariableResolver;

const CONTENT_TYPE: &str = "Content-Type";

/// Errors raised while compiling a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The final URL could not be parsed.
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// Form fields could not be URL-encoded.
    #[error("Failed to encode form body: {0}")]
    Encoding(String),
}

/// The body as it goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompiledBody {
    /// No body
    #[default]
    None,
    /// Raw text (JSON or plain text)
    Text(String),
    /// `application/x-www-form-urlencoded` string
    UrlEncoded(String),
    /// Multipart form fields, in order
    Multipart(Vec<(String, String)>),
}

impl CompiledBody {
    /// Returns true if there is no body.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A fully resolved, dispatch-ready request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including query
    pub url: Url,
    /// Final headers
    pub headers: BTreeMap<String, String>,
    /// Encoded body
    pub body: CompiledBody,
}

impl CompiledRequest {
    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for CompiledRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Compiles a request against the settings and the active environment.
///
/// # Errors
///
/// Returns `CompileError::InvalidUrl` if the resolved URL cannot be parsed.
pub fn compile(
    request: &ApiRequest,
    settings: &GlobalSettings,
    environment: Option<&Environment>,
) -> Result<CompiledRequest, CompileError> {
    let resolver = VariableResolver::for_environment(environment);

    let mut url = build_url(
        &resolver.resolve(&request.url),
        &resolver.resolve(&settings.base_url),
    )?;

    let mut query = normalize(&request.params, &resolver);
    let mut headers = to_map(&request.headers, &resolver);

    if let Some(placement) = resolve_auth(&request.auth, &settings.global_auth, &resolver) {
        match placement.location {
            AuthLocation::Header => set_header(&mut headers, &placement.name, placement.value),
            AuthLocation::Query => query.push((placement.name, placement.value)),
        }
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(&query);
    }

    let body = if request.method.allows_body() {
        compile_body(request, &resolver, &mut headers)?
    } else {
        CompiledBody::None
    };

    debug!(method = %request.method, %url, "compiled request");

    Ok(CompiledRequest {
        method: request.method,
        url,
        headers,
        body,
    })
}

/// Joins a relative URL onto the base URL and parses the result.
fn build_url(raw_url: &str, base_url: &str) -> Result<Url, CompileError> {
    let raw_url = raw_url.trim();
    let base_url = base_url.trim();

    let combined = if !base_url.is_empty() && !has_http_scheme(raw_url) {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            raw_url.trim_start_matches('/')
        )
    } else {
        raw_url.to_string()
    };

    let candidate = if has_http_scheme(&combined) {
        combined.clone()
    } else {
        format!("http://{combined}")
    };

    Url::parse(&candidate).map_err(|e| {
        debug!(url = %combined, error = %e, "url rejected");
        CompileError::InvalidUrl(combined)
    })
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn compile_body(
    request: &ApiRequest,
    resolver: &VariableResolver,
    headers: &mut BTreeMap<String, String>,
) -> Result<CompiledBody, CompileError> {
    let body = &request.body;
    match body.kind {
        BodyType::None => Ok(CompiledBody::None),
        BodyType::Json => {
            set_header(headers, CONTENT_TYPE, "application/json".to_string());
            Ok(CompiledBody::Text(resolver.resolve(&body.content)))
        }
        BodyType::Text => {
            set_header(headers, CONTENT_TYPE, "text/plain".to_string());
            Ok(CompiledBody::Text(resolver.resolve(&body.content)))
        }
        BodyType::FormData => {
            // The transport writes its own boundary.
            remove_header(headers, CONTENT_TYPE);
            Ok(CompiledBody::Multipart(normalize(&body.form_data, resolver)))
        }
        BodyType::FormUrlEncoded => {
            let fields = normalize(&body.form_data, resolver);
            let encoded = serde_urlencoded::to_string(&fields)
                .map_err(|e| CompileError::Encoding(e.to_string()))?;
            set_header(
                headers,
                CONTENT_TYPE,
                "application/x-www-form-urlencoded".to_string(),
            );
            Ok(CompiledBody::UrlEncoded(encoded))
        }
    }
}

/// Inserts a header, replacing any existing header with the same name in any case.
fn set_header(headers: &mut BTreeMap<String, String>, name: &str, value: String) {
    remove_header(headers, name);
    headers.insert(name.to_string(), value);
}

fn remove_header(headers: &mut BTreeMap<String, String>, name: &str) {
    headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use nexus_domain::{ApiKeyLocation, AuthConfig, KeyValueItem, RequestBody, RequestId};
    use pretty_assertions::assert_eq;

    fn request(method: HttpMethod, url: &str) -> ApiRequest {
        ApiRequest::new(RequestId(1)).with_method(method).with_url(url)
    }

    fn settings(base_url: &str) -> GlobalSettings {
        GlobalSettings {
            base_url: base_url.to_string(),
            ..GlobalSettings::default()
        }
    }

    #[test]
    fn test_base_url_prefix() {
        let compiled = compile(
            &request(HttpMethod::Get, "/users"),
            &settings("https://api.example.com"),
            None,
        )
        .unwrap();
        assert_eq!(compiled.url.as_str(), "https://api.example.com/users");
    }

    #[test]
    fn test_base_url_slashes_collapse() {
        let compiled = compile(
            &request(HttpMethod::Get, "users"),
            &settings("https://api.example.com/v1/"),
            None,
        )
        .unwrap();
        assert_eq!(compiled.url.as_str(), "https://api.example.com/v1/users");
    }

    #[test]
    fn test_absolute_url_ignores_base() {
        let compiled = compile(
            &request(HttpMethod::Get, "HTTPS://other.example.com/x"),
            &settings("https://api.example.com"),
            None,
        )
        .unwrap();
        assert_eq!(compiled.url.as_str(), "https://other.example.com/x");
    }

    #[test]
    fn test_scheme_defaults_to_http() {
        let compiled = compile(
            &request(HttpMethod::Get, "localhost:3000/health"),
            &GlobalSettings::default(),
            None,
        )
        .unwrap();
        assert_eq!(compiled.url.as_str(), "http://localhost:3000/health");
    }

    #[test]
    fn test_invalid_url() {
        let result = compile(
            &request(HttpMethod::Get, "http://exa mple.com"),
            &GlobalSettings::default(),
            None,
        );
        assert_eq!(
            result,
            Err(CompileError::InvalidUrl("http://exa mple.com".to_string()))
        );
        assert!(compile(&request(HttpMethod::Get, ""), &GlobalSettings::default(), None).is_err());
    }

    #[test]
    fn test_params_appended_in_order() {
        let req = request(HttpMethod::Get, "https://x.test/search?lang=en").with_params(vec![
            KeyValueItem::new("q", "rust lang"),
            KeyValueItem::disabled("skip", "1"),
            KeyValueItem::new("tag", "a"),
            KeyValueItem::new("tag", "b"),
        ]);
        let compiled = compile(&req, &GlobalSettings::default(), None).unwrap();
        assert_eq!(
            compiled.url.as_str(),
            "https://x.test/search?lang=en&q=rust+lang&tag=a&tag=b"
        );
    }

    #[test]
    fn test_global_bearer_applies() {
        let settings = GlobalSettings {
            global_auth: AuthConfig::bearer("T"),
            ..GlobalSettings::default()
        };
        let compiled = compile(&request(HttpMethod::Get, "https://x.test"), &settings, None).unwrap();
        assert_eq!(compiled.header("authorization"), Some("Bearer T"));
    }

    #[test]
    fn test_auth_header_replaces_case_insensitively() {
        let req = request(HttpMethod::Get, "https://x.test")
            .with_headers(vec![KeyValueItem::new("authorization", "Basic old")])
            .with_auth(AuthConfig::bearer("new"));
        let compiled = compile(&req, &GlobalSettings::default(), None).unwrap();
        assert_eq!(compiled.headers.len(), 1);
        assert_eq!(compiled.headers["Authorization"], "Bearer new");
    }

    #[test]
    fn test_query_auth_always_appended() {
        let req = request(HttpMethod::Get, "https://x.test")
            .with_params(vec![KeyValueItem::new("api_key", "user")])
            .with_auth(AuthConfig::api_key("api_key", "auth", ApiKeyLocation::Query));
        let compiled = compile(&req, &GlobalSettings::default(), None).unwrap();
        assert_eq!(compiled.url.query(), Some("api_key=user&api_key=auth"));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let req = request(HttpMethod::Post, "https://x.test/echo")
            .with_headers(vec![KeyValueItem::new("content-type", "text/xml")])
            .with_body(RequestBody::json(r#"{"a":1}"#));
        let compiled = compile(&req, &GlobalSettings::default(), None).unwrap();
        assert_eq!(compiled.body, CompiledBody::Text(r#"{"a":1}"#.to_string()));
        assert_eq!(compiled.headers.len(), 1);
        assert_eq!(compiled.headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_text_body() {
        let req = request(HttpMethod::Put, "https://x.test").with_body(RequestBody::text("hi"));
        let compiled = compile(&req, &GlobalSettings::default(), None).unwrap();
        assert_eq!(compiled.header("content-type"), Some("text/plain"));
        assert_eq!(compiled.body, CompiledBody::Text("hi".to_string()));
    }

    #[test]
    fn test_form_data_removes_content_type() {
        let req = request(HttpMethod::Post, "https://x.test")
            .with_headers(vec![KeyValueItem::new("CONTENT-TYPE", "application/json")])
            .with_body(RequestBody::form(
                BodyType::FormData,
                vec![
                    KeyValueItem::new("name", "nexus"),
                    KeyValueItem::disabled("hidden", "x"),
                ],
            ));
        let compiled = compile(&req, &GlobalSettings::default(), None).unwrap();
        assert!(compiled.header("content-type").is_none());
        assert_eq!(
            compiled.body,
            CompiledBody::Multipart(vec![("name".to_string(), "nexus".to_string())])
        );
    }

    #[test]
    fn test_url_encoded_body() {
        let req = request(HttpMethod::Post, "https://x.test").with_body(RequestBody::form(
            BodyType::FormUrlEncoded,
            vec![KeyValueItem::new("user", "a b"), KeyValueItem::new("pw", "&")],
        ));
        let compiled = compile(&req, &GlobalSettings::default(), None).unwrap();
        assert_eq!(compiled.body, CompiledBody::UrlEncoded("user=a+b&pw=%26".to_string()));
        assert_eq!(
            compiled.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_get_and_head_suppress_body() {
        for method in [HttpMethod::Get, HttpMethod::Head] {
            let req = request(method, "https://x.test").with_body(RequestBody::json("{}"));
            let compiled = compile(&req, &GlobalSettings::default(), None).unwrap();
            assert!(compiled.body.is_none());
            assert!(compiled.header("content-type").is_none());
        }
    }

    #[test]
    fn test_environment_variables_resolved() {
        let mut env = Environment::new("dev");
        env.set_variable("host", "dev.example.com");
        env.set_variable("id", "42");
        let req = request(HttpMethod::Post, "https://{{host}}/items/{{id}}")
            .with_headers(vec![KeyValueItem::new("X-Id", "{{id}}")])
            .with_body(RequestBody::json(r#"{"id": {{id}}}"#));
        let compiled = compile(&req, &GlobalSettings::default(), Some(&env)).unwrap();
        assert_eq!(compiled.url.as_str(), "https://dev.example.com/items/42");
        assert_eq!(compiled.headers["X-Id"], "42");
        assert_eq!(compiled.body, CompiledBody::Text(r#"{"id": 42}"#.to_string()));
    }

    #[test]
    fn test_input_request_unchanged() {
        let req = request(HttpMethod::Post, "/x").with_body(RequestBody::json("{}"));
        let before = req.clone();
        let _ = compile(&req, &settings("https://api.test"), None).unwrap();
        assert_eq!(req, before);
    }
}
