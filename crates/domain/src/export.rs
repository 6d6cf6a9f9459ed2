//! Versioned export document.
//!
//! This is the JSON shape written by "export" and by the state file:
//! every open request, the settings, the environments and the history.
//! Older documents without `environments`, `settings` or `history` still
//! load, with those parts defaulted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::RequestCollection;
use crate::environment::Environment;
use crate::history::History;
use crate::id::RequestId;
use crate::request::ApiRequest;
use crate::settings::GlobalSettings;

/// Current export format version.
pub const EXPORT_VERSION: &str = "1.2";

/// The full persisted/exported application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Format version
    #[serde(default = "default_version")]
    pub version: String,
    /// When the document was written
    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,
    /// The request that was active when exporting
    #[serde(default)]
    pub active_request_id: Option<RequestId>,
    /// Global settings
    #[serde(default)]
    pub settings: GlobalSettings,
    /// Open requests in tab order
    #[serde(default)]
    pub requests: Vec<ApiRequest>,
    /// Named variable sets
    #[serde(default)]
    pub environments: Vec<Environment>,
    /// Dispatched snapshots, oldest first
    #[serde(default)]
    pub history: History,
}

fn default_version() -> String {
    EXPORT_VERSION.to_string()
}

impl Default for ExportDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            exported_at: Utc::now(),
            active_request_id: None,
            settings: GlobalSettings::default(),
            requests: Vec::new(),
            environments: Vec::new(),
            history: History::new(),
        }
    }
}

impl ExportDocument {
    /// Captures the current state at `exported_at`.
    #[must_use]
    pub fn capture(
        collection: &RequestCollection,
        settings: &GlobalSettings,
        environments: &[Environment],
        history: &History,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: default_version(),
            exported_at,
            active_request_id: collection.active_id(),
            settings: settings.clone(),
            requests: collection.requests().to_vec(),
            environments: environments.to_vec(),
            history: history.clone(),
        }
    }

    /// Rebuilds the request collection described by this document.
    #[must_use]
    pub fn collection(&self) -> RequestCollection {
        RequestCollection::from_parts(self.requests.clone(), self.active_request_id)
    }
}
