//! Clock port

use chrono::{DateTime, Utc};

/// Source of wall-clock time for `sentAt` and `exportedAt` stamps.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time as epoch milliseconds.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}
