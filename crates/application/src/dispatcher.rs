//! Request dispatch
//!
//! Executes a [`CompiledRequest`] through the [`HttpClient`] port and
//! normalizes whatever happens into a [`ResponseRecord`]. Dispatch never
//! fails: transport errors become records with `error` set.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use std::time::Instant;

use nexus_domain::ResponseRecord;
use tracing::{info, warn};

use crate::compiler::CompiledRequest;
use crate::ports::{HttpClient, TransportResponse};

/// Sends compiled requests and records the outcome.
///
/// # Example
///
/// ```ignore
/// let dispatcher = Dispatcher::new(Arc::new(ReqwestHttpClient::new(config)?));
/// let record = dispatcher.send(&compiled).await;
/// println!("{} in {}ms", record.status, record.time);
/// ```
pub struct Dispatcher<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> Dispatcher<C> {
    /// Creates a dispatcher over the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Executes the request and returns the normalized record.
    ///
    /// Elapsed time is measured around the transport call and rounded to
    /// the nearest millisecond, for failures too.
    pub async fn send(&self, request: &CompiledRequest) -> ResponseRecord {
        info!(method = %request.method, url = %request.url, "sending request");
        let start = Instant::now();
        let result = self.client.execute(request).await;
        let time = elapsed_millis(start);

        match result {
            Ok(response) => {
                info!(status = response.status, time_ms = time, "response received");
                into_record(response, time)
            }
            Err(error) => {
                warn!(%error, time_ms = time, "request failed");
                ResponseRecord::failure(error.to_string(), time)
            }
        }
    }
}

fn into_record(response: TransportResponse, time: u64) -> ResponseRecord {
    ResponseRecord::success(
        response.status,
        response.status_text,
        flatten_headers(response.headers),
        response.body,
        time,
    )
}

/// Folds repeated header names into one entry, values joined with `, `.
fn flatten_headers(headers: Vec<(String, String)>) -> BTreeMap<String, String> {
    let mut flattened = BTreeMap::new();
    for (name, value) in headers {
        match flattened.entry(name) {
            Entry::Occupied(mut entry) => {
                let joined: &mut String = entry.get_mut();
                joined.push_str(", ");
                joined.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }
    flattened
}

fn elapsed_millis(start: Instant) -> u64 {
    let micros = start.elapsed().as_micros();
    u64::try_from((micros + 500) / 1000).unwrap_or(u64::MAX)
}
