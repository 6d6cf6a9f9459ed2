//! Session store
//!
//! Owns the open requests, settings, environments and history behind one
//! async mutex, and drives the compile/dispatch pipeline against them.

use std::sync::Arc;

use nexus_domain::{
    ApiRequest, DomainError, Environment, ExportDocument, GlobalSettings, History, RequestCollection,
    RequestId,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::compiler::{CompiledRequest, compile};
use crate::dispatcher::Dispatcher;
use crate::error::ApplicationResult;
use crate::import::{merge_import, parse_import};
use crate::ports::{Clock, HttpClient};

#[derive(Debug, Default)]
struct SessionState {
    collection: RequestCollection,
    settings: GlobalSettings,
    environments: Vec<Environment>,
    history: History,
}

impl SessionState {
    fn active_environment(&self) -> Option<&Environment> {
        self.settings.active_environment(&self.environments)
    }

    fn compile(&self, id: RequestId) -> ApplicationResult<(ApiRequest, CompiledRequest)> {
        let request = self.collection.get(id)?.clone();
        let compiled = compile(&request, &self.settings, self.active_environment())?;
        Ok((request, compiled))
    }
}

/// What an import changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// New ids of the imported requests, in file order
    pub imported: Vec<RequestId>,
    /// The request that became active, if the import chose one
    pub active_id: Option<RequestId>,
    /// Number of environments added or replaced
    pub environments: usize,
    /// Whether the file replaced the settings
    pub settings_replaced: bool,
}

/// The single-writer application state plus the dispatch pipeline.
pub struct Session<C: HttpClient, K: Clock> {
    state: Mutex<SessionState>,
    dispatcher: Dispatcher<C>,
    clock: Arc<K>,
}

impl<C: HttpClient, K: Clock> Session<C, K> {
    /// Creates an empty session.
    pub fn new(client: Arc<C>, clock: Arc<K>) -> Self {
        Self::from_document(ExportDocument::default(), client, clock)
    }

    /// Restores a session from a persisted document.
    pub fn from_document(document: ExportDocument, client: Arc<C>, clock: Arc<K>) -> Self {
        let state = SessionState {
            collection: document.collection(),
            settings: document.settings,
            environments: document.environments,
            history: document.history,
        };
        Self {
            state: Mutex::new(state),
            dispatcher: Dispatcher::new(client),
            clock,
        }
    }

    /// Compiles and dispatches a request, then records the outcome.
    ///
    /// The stored request gets the response and `sentAt`, and a snapshot is
    /// appended to history, for failed dispatches too. The lock is not held
    /// across the network call, so two concurrent sends of the same request
    /// both land in history and either response may end up stored.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` for an unknown id and `Compile` when the
    /// URL is invalid. Neither touches any state.
    pub async fn send(&self, id: RequestId) -> ApplicationResult<ApiRequest> {
        let (request, compiled) = self.state.lock().await.compile(id)?;

        let record = self.dispatcher.send(&compiled).await;
        let updated = request.with_response(record, self.clock.now_millis());

        let mut state = self.state.lock().await;
        if state.collection.replace(updated.clone()).is_err() {
            debug!(%id, "request closed while in flight, keeping history only");
        }
        state.history.push(updated.clone());
        Ok(updated)
    }

    /// Compiles a request without sending it.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` or `Compile` like [`Self::send`].
    pub async fn compile_request(&self, id: RequestId) -> ApplicationResult<CompiledRequest> {
        let (_, compiled) = self.state.lock().await.compile(id)?;
        Ok(compiled)
    }

    /// Imports a JSON document into the session.
    ///
    /// All-or-nothing: a rejected document leaves the session untouched.
    /// Imported environments replace ones with the same id and are appended
    /// otherwise. Settings are replaced only when the file carries them.
    ///
    /// # Errors
    ///
    /// Returns `Import` when the text is not JSON or fails validation.
    pub async fn import_json(&self, json: &str) -> ApplicationResult<ImportSummary> {
        let payload = parse_import(json)?;

        let mut state = self.state.lock().await;
        let existing = state.collection.len();
        let merge = merge_import(
            state.collection.requests(),
            payload.requests,
            payload.active_request_id.as_deref(),
        );
        let imported: Vec<RequestId> = merge.requests[existing..].iter().map(|r| r.id).collect();
        state.collection.apply_import(merge.requests, merge.active_id);

        let environments = payload.environments.len();
        for environment in payload.environments {
            upsert(&mut state.environments, environment);
        }
        let settings_replaced = payload.settings.is_some();
        if let Some(settings) = payload.settings {
            state.settings = settings;
        }

        let summary = ImportSummary {
            imported,
            active_id: merge.active_id,
            environments,
            settings_replaced,
        };
        info!(
            requests = summary.imported.len(),
            environments, settings_replaced, "import applied"
        );
        Ok(summary)
    }

    /// Captures the whole session as an export document.
    pub async fn export(&self) -> ExportDocument {
        let state = self.state.lock().await;
        ExportDocument::capture(
            &state.collection,
            &state.settings,
            &state.environments,
            &state.history,
            self.clock.now(),
        )
    }

    /// Replaces the global settings.
    pub async fn update_settings(&self, settings: GlobalSettings) {
        self.state.lock().await.settings = settings;
    }

    /// Returns the global settings.
    pub async fn settings(&self) -> GlobalSettings {
        self.state.lock().await.settings.clone()
    }

    /// Selects the environment used for substitution, or none.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentNotFound` if `id` names no environment.
    pub async fn set_active_environment(&self, id: Option<String>) -> ApplicationResult<()> {
        let mut state = self.state.lock().await;
        if let Some(id) = id.as_deref()
            && !state.environments.iter().any(|env| env.id == id)
        {
            return Err(DomainError::EnvironmentNotFound(id.to_string()).into());
        }
        state.settings.active_environment_id = id;
        Ok(())
    }

    /// Adds an environment, or replaces the one with the same id.
    pub async fn upsert_environment(&self, environment: Environment) {
        upsert(&mut self.state.lock().await.environments, environment);
    }

    /// Returns all environments.
    pub async fn environments(&self) -> Vec<Environment> {
        self.state.lock().await.environments.clone()
    }

    /// Opens a blank request and makes it active.
    pub async fn create_request(&self) -> RequestId {
        self.state.lock().await.collection.create()
    }

    /// Opens a copy of a request and makes it active.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` for an unknown id.
    pub async fn duplicate_request(&self, id: RequestId) -> ApplicationResult<RequestId> {
        Ok(self.state.lock().await.collection.duplicate(id)?)
    }

    /// Closes a request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` for an unknown id.
    pub async fn close_request(&self, id: RequestId) -> ApplicationResult<ApiRequest> {
        Ok(self.state.lock().await.collection.close(id)?)
    }

    /// Applies a typed update to a request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` for an unknown id.
    pub async fn update_request<F>(&self, id: RequestId, update: F) -> ApplicationResult<ApiRequest>
    where
        F: FnOnce(ApiRequest) -> ApiRequest,
    {
        let mut state = self.state.lock().await;
        Ok(state.collection.update(id, update)?.clone())
    }

    /// Selects the active request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` for an unknown id.
    pub async fn set_active_request(&self, id: RequestId) -> ApplicationResult<()> {
        Ok(self.state.lock().await.collection.set_active(id)?)
    }

    /// Returns the active request id.
    pub async fn active_request_id(&self) -> Option<RequestId> {
        self.state.lock().await.collection.active_id()
    }

    /// Returns a copy of one request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` for an unknown id.
    pub async fn request(&self, id: RequestId) -> ApplicationResult<ApiRequest> {
        Ok(self.state.lock().await.collection.get(id)?.clone())
    }

    /// Returns copies of all open requests in tab order.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().await.collection.requests().to_vec()
    }

    /// Returns a copy of the history.
    pub async fn history(&self) -> History {
        self.state.lock().await.history.clone()
    }

    /// Opens a history entry as a new active request with a fresh id and no
    /// response. `index` counts back from the newest entry.
    ///
    /// # Errors
    ///
    /// Returns `HistoryEntryNotFound` when `index` is past the oldest entry.
    pub async fn reopen_history(&self, index: usize) -> ApplicationResult<RequestId> {
        let mut state = self.state.lock().await;
        let snapshot = state
            .history
            .nth_newest(index)
            .cloned()
            .ok_or(DomainError::HistoryEntryNotFound(index))?;
        let id = state.collection.open_snapshot(&snapshot);
        debug!(%id, index, "history entry reopened");
        Ok(id)
    }

    /// Empties the history.
    pub async fn clear_history(&self) {
        self.state.lock().await.history.clear();
    }
}

fn upsert(environments: &mut Vec<Environment>, environment: Environment) {
    if let Some(existing) = environments.iter_mut().find(|e| e.id == environment.id) {
        *existing = environment;
    } else {
        environments.push(environment);
    }
}
