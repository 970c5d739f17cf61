//! Live connectivity indicator.
//!
//! Tracks the outcome of each poll so the dashboard can show whether the
//! figures on screen are current.

use chrono::{DateTime, Utc};
use std::fmt;

/// Connection state derived from the latest poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    /// No poll has completed yet.
    Connecting,
    /// The latest poll succeeded.
    Live,
    /// The latest poll failed.
    Offline,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Connecting => write!(f, "Connecting"),
            Connection::Live => write!(f, "Live"),
            Connection::Offline => write!(f, "Offline"),
        }
    }
}

/// Poll history backing the live indicator.
#[derive(Debug, Clone)]
pub struct LiveStatus {
    connection: Connection,
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
}

impl Default for LiveStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveStatus {
    pub fn new() -> Self {
        Self {
            connection: Connection::Connecting,
            last_success: None,
            consecutive_failures: 0,
        }
    }

    /// Record a successful poll.
    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.connection = Connection::Live;
        self.last_success = Some(at);
        self.consecutive_failures = 0;
    }

    /// Record a failed poll.
    pub fn record_failure(&mut self) {
        self.connection = Connection::Offline;
        self.consecutive_failures += 1;
    }

    pub fn connection(&self) -> Connection {
        self.connection
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// One-line indicator, e.g. `● Live (updated 12:30:00 UTC)`.
    pub fn indicator(&self) -> String {
        let updated = self
            .last_success
            .map(|t| format!(" (updated {})", t.format("%H:%M:%S UTC")))
            .unwrap_or_default();

        match self.connection {
            Connection::Connecting => "◌ Connecting".to_string(),
            Connection::Live => format!("● Live{}", updated),
            Connection::Offline => format!(
                "○ Offline, {} failed poll{}{}",
                self.consecutive_failures,
                if self.consecutive_failures == 1 { "" } else { "s" },
                updated
            ),
        }
    }
}
