//! The set of open requests and the active selection.

use crate::error::{DomainError, DomainResult};
use crate::id::RequestId;
use crate::request::ApiRequest;

/// Ordered collection of open requests with a monotonic id counter.
///
/// Ids are never reused within a collection: closing a request does not
/// rewind the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCollection {
    requests: Vec<ApiRequest>,
    active_id: Option<RequestId>,
    next_id: RequestId,
}

impl Default for RequestCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestCollection {
    /// Creates an empty collection whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests: Vec::new(),
            active_id: None,
            next_id: RequestId(1),
        }
    }

    /// Rebuilds a collection from persisted requests.
    ///
    /// The counter resumes after the largest existing id. An active id that
    /// does not name a request is dropped.
    #[must_use]
    pub fn from_parts(requests: Vec<ApiRequest>, active_id: Option<RequestId>) -> Self {
        let next_id = requests
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(RequestId(1), RequestId::next);
        let active_id = active_id.filter(|id| requests.iter().any(|r| r.id == *id));
        Self {
            requests,
            active_id,
            next_id,
        }
    }

    fn allocate_id(&mut self) -> RequestId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Opens a blank request and makes it active.
    pub fn create(&mut self) -> RequestId {
        let id = self.allocate_id();
        self.requests.push(ApiRequest::new(id));
        self.active_id = Some(id);
        id
    }

    /// Opens a copy of an existing request (without its response) and makes it active.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if `source` is not in the collection.
    pub fn duplicate(&mut self, source: RequestId) -> DomainResult<RequestId> {
        let template = self.get(source)?.clone();
        Ok(self.open_snapshot(&template))
    }

    /// Opens a copy of a snapshot (typically a history entry) under a fresh
    /// id, without its response, and makes it active.
    pub fn open_snapshot(&mut self, snapshot: &ApiRequest) -> RequestId {
        let id = self.allocate_id();
        self.requests.push(snapshot.duplicate_as(id));
        self.active_id = Some(id);
        id
    }

    /// Closes a request.
    ///
    /// If it was active, the last remaining request becomes active, or
    /// nothing when the collection is now empty.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if `id` is not in the collection.
    pub fn close(&mut self, id: RequestId) -> DomainResult<ApiRequest> {
        let index = self.position(id)?;
        let closed = self.requests.remove(index);
        if self.active_id == Some(id) {
            self.active_id = self.requests.last().map(|r| r.id);
        }
        Ok(closed)
    }

    /// Applies a typed update to one request and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if `id` is not in the collection.
    pub fn update<F>(&mut self, id: RequestId, update: F) -> DomainResult<&ApiRequest>
    where
        F: FnOnce(ApiRequest) -> ApiRequest,
    {
        let index = self.position(id)?;
        let current = self.requests[index].clone();
        let mut updated = update(current);
        updated.id = id;
        self.requests[index] = updated;
        Ok(&self.requests[index])
    }

    /// Renames a request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if `id` is not in the collection.
    pub fn rename(&mut self, id: RequestId, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        self.update(id, |r| r.with_name(name)).map(|_| ())
    }

    /// Replaces a request wholesale, matching on its id.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if the request's id is not in the collection.
    pub fn replace(&mut self, request: ApiRequest) -> DomainResult<()> {
        let index = self.position(request.id)?;
        self.requests[index] = request;
        Ok(())
    }

    /// Replaces the whole list after an import merge.
    ///
    /// `active_id` of `None` keeps the current selection.
    pub fn apply_import(&mut self, requests: Vec<ApiRequest>, active_id: Option<RequestId>) {
        let max_id = requests.iter().map(|r| r.id).max();
        self.requests = requests;
        if let Some(max_id) = max_id {
            if max_id >= self.next_id {
                self.next_id = max_id.next();
            }
        }
        if active_id.is_some() {
            self.active_id = active_id;
        }
    }

    /// Selects the active request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if `id` is not in the collection.
    pub fn set_active(&mut self, id: RequestId) -> DomainResult<()> {
        self.position(id)?;
        self.active_id = Some(id);
        Ok(())
    }

    /// Returns a request by id.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if `id` is not in the collection.
    pub fn get(&self, id: RequestId) -> DomainResult<&ApiRequest> {
        self.requests
            .iter()
            .find(|r| r.id == id)
            .ok_or(DomainError::RequestNotFound(id.get()))
    }

    fn position(&self, id: RequestId) -> DomainResult<usize> {
        self.requests
            .iter()
            .position(|r| r.id == id)
            .ok_or(DomainError::RequestNotFound(id.get()))
    }

    /// Returns the active request, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ApiRequest> {
        self.active_id.and_then(|id| self.get(id).ok())
    }

    /// Returns the active request id, if any.
    #[must_use]
    pub const fn active_id(&self) -> Option<RequestId> {
        self.active_id
    }

    /// Returns all requests in tab order.
    #[must_use]
    pub fn requests(&self) -> &[ApiRequest] {
        &self.requests
    }

    /// Returns the number of open requests.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true if no requests are open.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
