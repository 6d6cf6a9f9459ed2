//! Import validation and merging
//!
//! An import document is validated as a whole before anything is merged:
//! one bad request rejects the entire file. Accepted requests are re-keyed
//! after the highest existing id and stripped of dispatch state.

use std::collections::BTreeMap;
use std::fmt;

use nexus_domain::{
    ApiRequest, AuthConfig, Environment, GlobalSettings, HttpMethod, KeyValueItem, RequestBody,
    RequestId,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

/// Every problem found in an import payload, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ImportValidationError {
    /// Human-readable messages, requests numbered from 1
    pub errors: Vec<String>,
}

impl fmt::Display for ImportValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Import rejected: {}", self.errors.join("; "))
    }
}

/// Errors raised while importing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The text is not JSON.
    #[error("Failed to parse JSON file: {0}")]
    Parse(String),

    /// The JSON does not describe an importable document.
    #[error(transparent)]
    Validation(#[from] ImportValidationError),
}

/// A request read from an import file, before re-keying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedRequest {
    /// The id the request had in the file, as text
    pub original_id: Option<String>,
    /// The request with defaults filled in and dispatch state cleared
    pub request: ApiRequest,
}

/// A validated import document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportPayload {
    /// Requests in file order
    pub requests: Vec<ImportedRequest>,
    /// The file's active request id, as text
    pub active_request_id: Option<String>,
    /// Settings, if the file carries them
    pub settings: Option<GlobalSettings>,
    /// Environments carried by the file
    pub environments: Vec<Environment>,
}

/// Outcome of merging imported requests into an existing list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMerge {
    /// Existing requests followed by the re-keyed imported ones
    pub requests: Vec<ApiRequest>,
    /// Request to activate; `None` keeps the current selection
    pub active_id: Option<RequestId>,
    /// Old id (as text) to new id
    pub id_map: BTreeMap<String, RequestId>,
}

/// Checks the shape of an import payload.
///
/// # Errors
///
/// Returns every problem found. Nothing is partially accepted.
pub fn validate_import(payload: &Value) -> Result<(), ImportValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(ImportValidationError {
            errors: vec!["Invalid file format".to_string()],
        });
    };
    let Some(requests) = object.get("requests").and_then(Value::as_array) else {
        return Err(ImportValidationError {
            errors: vec!["Missing or invalid requests array".to_string()],
        });
    };

    let mut errors = Vec::new();
    for (index, request) in requests.iter().enumerate() {
        let n = index + 1;
        let Some(request) = request.as_object() else {
            errors.push(format!("Request {n}: Invalid request"));
            continue;
        };

        match request.get("method").and_then(Value::as_str) {
            None | Some("") => errors.push(format!("Request {n}: Missing method")),
            Some(method) if method.parse::<HttpMethod>().is_err() => {
                errors.push(format!("Request {n}: Unsupported method '{method}'"));
            }
            Some(_) => {}
        }
        if !request.get("url").is_some_and(Value::is_string) {
            errors.push(format!("Request {n}: Missing URL"));
        }
        if request
            .get("name")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty)
        {
            errors.push(format!("Request {n}: Missing name"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ImportValidationError { errors })
    }
}

/// Parses and validates import text.
///
/// Settings are read from `settings`, or from `globalSettings` in older
/// files.
///
/// # Errors
///
/// Returns `ImportError::Parse` for malformed JSON and
/// `ImportError::Validation` for anything structurally wrong.
pub fn parse_import(json: &str) -> Result<ImportPayload, ImportError> {
    let payload: Value =
        serde_json::from_str(json).map_err(|e| ImportError::Parse(e.to_string()))?;
    validate_import(&payload)?;

    let mut errors = Vec::new();
    let object = payload.as_object().cloned().unwrap_or_default();

    let requests: Vec<ImportedRequest> = object
        .get("requests")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            decode_request(value)
                .map_err(|e| errors.push(format!("Request {}: {e}", index + 1)))
                .ok()
        })
        .collect();

    let settings = object
        .get("settings")
        .or_else(|| object.get("globalSettings"))
        .filter(|value| !value.is_null())
        .and_then(|value| {
            decode::<GlobalSettings>(value)
                .map_err(|e| errors.push(format!("Invalid settings: {e}")))
                .ok()
        });

    let environments = match object.get("environments") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => decode::<Vec<Environment>>(value).unwrap_or_else(|e| {
            errors.push(format!("Invalid environments: {e}"));
            Vec::new()
        }),
    };

    if !errors.is_empty() {
        return Err(ImportValidationError { errors }.into());
    }

    let payload = ImportPayload {
        requests,
        active_request_id: object.get("activeRequestId").and_then(id_text),
        settings,
        environments,
    };
    debug!(
        requests = payload.requests.len(),
        environments = payload.environments.len(),
        "import payload accepted"
    );
    Ok(payload)
}

/// Re-keys imported requests after the existing ones.
///
/// With `m` the largest existing id (0 when empty), imported request `i`
/// gets id `m + i + 1`. The preferred active id is looked up among the
/// imported requests' original ids; failing that the first imported request
/// is chosen, and an empty import leaves the selection alone.
#[must_use]
pub fn merge_import(
    existing: &[ApiRequest],
    imported: Vec<ImportedRequest>,
    preferred_active_id: Option<&str>,
) -> ImportMerge {
    let max_id = existing.iter().map(|r| r.id.get()).max().unwrap_or(0);
    let mut requests = existing.to_vec();
    let mut id_map = BTreeMap::new();
    let mut first = None;

    for (offset, entry) in (1u64..).zip(imported) {
        let id = RequestId(max_id + offset);
        if first.is_none() {
            first = Some(id);
        }
        if let Some(original) = entry.original_id {
            id_map.entry(original).or_insert(id);
        }
        requests.push(ApiRequest {
            id,
            response: None,
            sent_at: None,
            ..entry.request
        });
    }

    let active_id = preferred_active_id
        .and_then(|preferred| id_map.get(preferred).copied())
        .or(first);

    info!(
        imported = requests.len() - existing.len(),
        active = ?active_id,
        "merged imported requests"
    );

    ImportMerge {
        requests,
        active_id,
        id_map,
    }
}

fn decode_request(value: &Value) -> Result<ImportedRequest, String> {
    let object = value.as_object().cloned().unwrap_or_default();

    let method = object
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .parse::<HttpMethod>()
        .map_err(|e| e.to_string())?;

    let request = ApiRequest {
        id: RequestId(0),
        name: text(&object, "name"),
        method,
        url: text(&object, "url"),
        params: rows(&object, "params")?,
        headers: rows(&object, "headers")?,
        body: optional::<RequestBody>(&object, "body")?.unwrap_or_else(RequestBody::none),
        auth: optional::<AuthConfig>(&object, "auth")?.unwrap_or_else(AuthConfig::none),
        response: None,
        sent_at: None,
    };

    Ok(ImportedRequest {
        original_id: object.get("id").and_then(id_text),
        request,
    })
}

fn text(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Lists present in the file are kept as written; missing ones get a blank row.
fn rows(object: &Map<String, Value>, key: &str) -> Result<Vec<KeyValueItem>, String> {
    Ok(optional::<Vec<KeyValueItem>>(object, key)?
        .unwrap_or_else(|| vec![KeyValueItem::blank()]))
}

fn optional<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
) -> Result<Option<T>, String> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => decode(value)
            .map(Some)
            .map_err(|e| format!("Invalid {key}: {e}")),
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value.clone())
}

/// Reads an id that older files may store as a string or a number.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
