//! System clock adapter

use chrono::{DateTime, Utc};
use nexus_application::ports::Clock;

/// Clock backed by the operating system's wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_track_now() {
        let clock = SystemClock::new();
        let before = Utc::now().timestamp_millis();
        let stamped = clock.now_millis();
        assert!(stamped >= before);
    }
}
