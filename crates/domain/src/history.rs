//! Request History Domain Model
//!
//! A bounded log of dispatched request snapshots. Each snapshot carries its
//! own response and is independent of the live, editable request.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::request::ApiRequest;

/// Maximum number of snapshots kept in history.
pub const HISTORY_CAPACITY: usize = 50;

/// Request history, oldest entry first.
///
/// Serialized as a plain array. Appending beyond [`HISTORY_CAPACITY`]
/// evicts from the front.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "VecDeque<ApiRequest>", into = "VecDeque<ApiRequest>")]
pub struct History {
    entries: VecDeque<ApiRequest>,
}

impl History {
    /// Creates a new empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Appends a snapshot, evicting the oldest entries past capacity.
    pub fn push(&mut self, snapshot: ApiRequest) {
        self.entries.push_back(snapshot);
        self.trim();
    }

    fn trim(&mut self) {
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Returns all entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ApiRequest> {
        self.entries.iter()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&ApiRequest> {
        self.entries.back()
    }

    /// Returns the entry `index` places back from the newest (0 is the newest).
    #[must_use]
    pub fn nth_newest(&self, index: usize) -> Option<&ApiRequest> {
        self.entries.iter().rev().nth(index)
    }

    /// Clears all history entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<VecDeque<ApiRequest>> for History {
    fn from(entries: VecDeque<ApiRequest>) -> Self {
        let mut history = Self { entries };
        history.trim();
        history
    }
}

impl From<History> for VecDeque<ApiRequest> {
    fn from(history: History) -> Self {
        history.entries
    }
}

/// Returns `history` with `snapshot` appended and overflow evicted.
#[must_use]
pub fn append_history(mut history: History, snapshot: ApiRequest) -> History {
    history.push(snapshot);
    history
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::id::RequestId;
    use pretty_assertions::assert_eq;

    fn snapshot(n: u64) -> ApiRequest {
        ApiRequest::new(RequestId(n)).with_url(format!("https://example.com/{n}"))
    }

    #[test]
    fn test_append_keeps_order() {
        let history = append_history(append_history(History::new(), snapshot(1)), snapshot(2));
        let urls: Vec<_> = history.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/1", "https://example.com/2"]);
        assert_eq!(history.latest().unwrap().id, RequestId(2));
    }

    #[test]
    fn test_51st_entry_evicts_oldest() {
        let mut history = History::new();
        for i in 1..=50 {
            history.push(snapshot(i));
        }
        assert_eq!(history.len(), 50);

        let history = append_history(history, snapshot(51));
        assert_eq!(history.len(), 50);
        assert_eq!(history.iter().next().unwrap().id, RequestId(2));
        assert_eq!(history.latest().unwrap().id, RequestId(51));
    }

    #[test]
    fn test_nth_newest_counts_back_from_latest() {
        let history = append_history(append_history(History::new(), snapshot(1)), snapshot(2));
        assert_eq!(history.nth_newest(0).unwrap().id, RequestId(2));
        assert_eq!(history.nth_newest(1).unwrap().id, RequestId(1));
        assert!(history.nth_newest(2).is_none());
    }

    #[test]
    fn test_deserialize_trims_to_capacity() {
        let entries: Vec<ApiRequest> = (1..=60).map(snapshot).collect();
        let json = serde_json::to_string(&entries).unwrap();
        let history: History = serde_json::from_str(&json).unwrap();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.iter().next().unwrap().id, RequestId(11));
    }

    #[test]
    fn test_serializes_as_array() {
        let history = append_history(History::new(), snapshot(1));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
    }
}
