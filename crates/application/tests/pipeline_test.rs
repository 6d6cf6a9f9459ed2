//! End-to-end checks of the compile, dispatch and import pipeline using an
//! in-memory HTTP client.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use nexus_application::{
    Clock, CompiledBody, CompiledRequest, HttpClient, HttpClientError, Session, TransportResponse,
    compile, normalize, resolve, to_map,
};
use nexus_application::variable_resolver::VariableResolver;
use nexus_domain::{
    ApiRequest, AuthConfig, BodyType, GlobalSettings, HISTORY_CAPACITY, HttpMethod, KeyValueItem,
    RequestBody, RequestId,
};
use pretty_assertions::assert_eq;

/// Echoes the request body back with status 200.
#[derive(Default)]
struct EchoClient {
    seen: Mutex<Vec<CompiledRequest>>,
}

impl HttpClient for EchoClient {
    fn execute(
        &self,
        request: &CompiledRequest,
    ) -> impl Future<Output = Result<TransportResponse, HttpClientError>> + Send {
        self.seen.lock().unwrap().push(request.clone());
        let body = match &request.body {
            CompiledBody::Text(text) | CompiledBody::UrlEncoded(text) => text.clone(),
            CompiledBody::Multipart(_) | CompiledBody::None => String::new(),
        };
        let content_type = request.header("content-type").unwrap_or("text/plain").to_string();
        async move {
            Ok(TransportResponse {
                status: 200,
                status_text: "OK".to_string(),
                headers: vec![("content-type".to_string(), content_type)],
                body,
            })
        }
    }
}

struct SystemTime;

impl Clock for SystemTime {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

fn session() -> (Arc<EchoClient>, Session<EchoClient, SystemTime>) {
    let client = Arc::new(EchoClient::default());
    let session = Session::new(Arc::clone(&client), Arc::new(SystemTime));
    (client, session)
}

#[test]
fn normalize_excludes_disabled_and_empty_keys() {
    let items = vec![
        KeyValueItem::new("a", "1"),
        KeyValueItem::disabled("b", "2"),
        KeyValueItem::new("", "3"),
        KeyValueItem::new("a", "4"),
    ];
    let resolver = VariableResolver::empty();
    assert_eq!(normalize(&items, &resolver).len(), 2);
    assert_eq!(to_map(&items, &resolver)["a"], "4");
}

#[test]
fn resolve_is_identity_without_references() {
    let vars = vec![KeyValueItem::new("x", "y")];
    for text in ["https://api.test/x", "{x}", "{{", "}}{{"] {
        assert_eq!(resolve(text, Some(&vars)), text);
    }
}

#[test]
fn base_url_and_global_bearer_compose() {
    let settings = GlobalSettings {
        base_url: "https://api.example.com".to_string(),
        global_auth: AuthConfig::bearer("T"),
        ..GlobalSettings::default()
    };
    let request = ApiRequest::new(RequestId(1)).with_url("/users");
    let compiled = compile(&request, &settings, None).unwrap();
    assert_eq!(compiled.url.as_str(), "https://api.example.com/users");
    assert_eq!(compiled.header("Authorization"), Some("Bearer T"));
}

#[test]
fn form_data_drops_stale_content_type() {
    let request = ApiRequest::new(RequestId(1))
        .with_method(HttpMethod::Post)
        .with_url("https://api.test/upload")
        .with_headers(vec![KeyValueItem::new("Content-Type", "application/json")])
        .with_body(RequestBody::form(
            BodyType::FormData,
            vec![KeyValueItem::new("file", "notes")],
        ));
    let compiled = compile(&request, &GlobalSettings::default(), None).unwrap();
    assert!(compiled.header("content-type").is_none());
}

#[test]
fn get_with_json_body_sends_nothing() {
    let request = ApiRequest::new(RequestId(1))
        .with_url("https://api.test")
        .with_body(RequestBody::json(r#"{"a":1}"#));
    let compiled = compile(&request, &GlobalSettings::default(), None).unwrap();
    assert_eq!(compiled.body, CompiledBody::None);
}

#[tokio::test]
async fn post_json_echo() {
    let (client, session) = session();
    let id = session.create_request().await;
    session
        .update_request(id, |r| {
            r.with_method(HttpMethod::Post)
                .with_url("https://api.test/echo")
                .with_body(RequestBody::json(r#"{"a":1}"#))
        })
        .await
        .unwrap();

    let sent = session.send(id).await.unwrap();

    let record = sent.response.unwrap();
    assert_eq!(record.body.as_deref(), Some(r#"{"a":1}"#));
    assert_eq!(record.content_type.as_deref(), Some("application/json"));
    assert_eq!(record.formatted_body().as_deref(), Some("{\n  \"a\": 1\n}"));
    let seen = client.seen.lock().unwrap();
    assert_eq!(seen[0].header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn history_is_bounded() {
    let (_, session) = session();
    let id = session.create_request().await;
    session
        .update_request(id, |r| r.with_url("https://api.test/ping"))
        .await
        .unwrap();

    for _ in 0..=HISTORY_CAPACITY {
        session.send(id).await.unwrap();
    }

    let history = session.history().await;
    assert_eq!(history.len(), HISTORY_CAPACITY);
}

#[tokio::test]
async fn invalid_import_adds_nothing() {
    let (_, session) = session();
    let result = session.import_json(r#"{"requests":[{"method":"GET"}]}"#).await;
    let message = result.unwrap_err().to_string();
    assert_eq!(
        message,
        "Import rejected: Request 1: Missing URL; Request 1: Missing name"
    );
    assert!(session.requests().await.is_empty());
}

#[tokio::test]
async fn import_keeps_numeric_and_string_ids_apart() {
    let (_, session) = session();
    let summary = session
        .import_json(
            r#"{
                "activeRequestId": "b2",
                "requests": [
                    {"id": 17, "name": "A", "method": "GET", "url": "/a"},
                    {"id": "b2", "name": "B", "method": "DELETE", "url": "/b"}
                ]
            }"#,
        )
        .await
        .unwrap();

    assert_eq!(summary.imported, vec![RequestId(1), RequestId(2)]);
    assert_eq!(summary.active_id, Some(RequestId(2)));
    assert_eq!(session.active_request_id().await, Some(RequestId(2)));
    assert!(!summary.settings_replaced);

    let next = session.create_request().await;
    assert_eq!(next, RequestId(3));
}
