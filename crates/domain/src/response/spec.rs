//! Response record type
//!
//! A [`ResponseRecord`] captures exactly one dispatch outcome: either the
//! status, headers and body the server sent, or the error that prevented a
//! response from arriving. Either way it carries the elapsed time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalized outcome of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    /// HTTP status code, 0 when the request failed
    pub status: u16,
    /// Status text (e.g., "OK", "Not Found")
    #[serde(default)]
    pub status_text: String,
    /// Response headers, multi-valued headers joined with `, `
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Raw response body text
    #[serde(default)]
    pub body: Option<String>,
    /// Size of the UTF-8 body in bytes
    #[serde(default)]
    pub size: u64,
    /// Elapsed wall-clock time in milliseconds
    #[serde(default)]
    pub time: u64,
    /// Human-readable failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response content type, if the server sent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ResponseRecord {
    /// Creates a record for a response that arrived.
    #[must_use]
    pub fn success(
        status: u16,
        status_text: impl Into<String>,
        headers: BTreeMap<String, String>,
        body: String,
        time: u64,
    ) -> Self {
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.clone());
        Self {
            status,
            status_text: status_text.into(),
            headers,
            size: body.len() as u64,
            body: Some(body),
            time,
            error: None,
            content_type,
        }
    }

    /// Creates a record for a dispatch that produced no response.
    #[must_use]
    pub fn failure(message: impl Into<String>, time: u64) -> Self {
        Self {
            time,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Returns true if this record represents a failed dispatch.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the body pretty-printed as JSON, if it is JSON.
    ///
    /// The raw `body` stays the source of truth; this is display-only.
    #[must_use]
    pub fn formatted_body(&self) -> Option<String> {
        self.body.as_deref().and_then(try_format_json)
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Returns a human-readable size string (e.g., "1.2 KB").
    #[must_use]
    pub fn size_display(&self) -> String {
        format_bytes(self.size)
    }

    /// Returns a human-readable duration string (e.g., "124 ms").
    #[must_use]
    pub fn duration_display(&self) -> String {
        if self.time < 1000 {
            format!("{} ms", self.time)
        } else {
            #[allow(clippy::cast_precision_loss)]
            let secs = self.time as f64 / 1000.0;
            format!("{secs:.2} s")
        }
    }
}

/// Pretty-prints `text` as JSON with 2-space indentation.
///
/// Returns `None` when `text` is not valid JSON. Never panics.
#[must_use]
pub fn try_format_json(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Formats bytes into a human-readable string.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    #[allow(clippy::cast_precision_loss)]
    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_success_record() {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let record = ResponseRecord::success(200, "OK", headers, "héllo".to_string(), 12);

        assert_eq!(record.size, 6);
        assert_eq!(record.content_type.as_deref(), Some("application/json"));
        assert!(record.is_success());
        assert!(!record.is_error());
        assert_eq!(record.get_header("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_failure_record() {
        let record = ResponseRecord::failure("connection refused", 8);
        assert_eq!(record.status, 0);
        assert!(record.headers.is_empty());
        assert!(record.body.is_none());
        assert_eq!(record.time, 8);
        assert!(record.is_error());
    }

    #[test]
    fn test_try_format_json() {
        assert_eq!(
            try_format_json(r#"{"a":1}"#).unwrap(),
            "{\n  \"a\": 1\n}"
        );
        assert!(try_format_json("not json").is_none());
        assert!(try_format_json("").is_none());
    }

    #[test]
    fn test_try_format_json_keeps_key_order() {
        assert_eq!(
            try_format_json(r#"{"zeta":1,"alpha":{"y":true,"b":null}}"#).unwrap(),
            "{\n  \"zeta\": 1,\n  \"alpha\": {\n    \"y\": true,\n    \"b\": null\n  }\n}"
        );
    }

    #[test]
    fn test_formatted_body_keeps_raw() {
        let record = ResponseRecord::success(200, "OK", BTreeMap::new(), "[1,2]".to_string(), 1);
        assert_eq!(record.formatted_body().unwrap(), "[\n  1,\n  2\n]");
        assert_eq!(record.body.as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(ResponseRecord::failure("x", 124).duration_display(), "124 ms");
        assert_eq!(ResponseRecord::failure("x", 1500).duration_display(), "1.50 s");
    }

    #[test]
    fn test_wire_names() {
        let record = ResponseRecord::success(404, "Not Found", BTreeMap::new(), String::new(), 3);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["statusText"], "Not Found");
        assert!(json.get("error").is_none());
    }
}
