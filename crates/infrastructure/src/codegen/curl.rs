//! `curl` command rendering.

use nexus_application::{CompiledBody, CompiledRequest};

/// Renders a compiled request as a multi-line `curl` command.
///
/// Every value is single-quoted, with embedded quotes written as `'\''`.
#[must_use]
pub fn curl_snippet(request: &CompiledRequest) -> String {
    let mut parts = vec![format!(
        "curl -X {} {}",
        request.method,
        quote(request.url.as_str())
    )];

    for (name, value) in &request.headers {
        parts.push(format!("-H {}", quote(&format!("{name}: {value}"))));
    }

    match &request.body {
        CompiledBody::None => {}
        CompiledBody::Text(content) | CompiledBody::UrlEncoded(content) => {
            parts.push(format!("-d {}", quote(content)));
        }
        CompiledBody::Multipart(fields) => {
            for (key, value) in fields {
                parts.push(format!("-F {}", quote(&format!("{key}={value}"))));
            }
        }
    }

    parts.join(" \\\n  ")
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
