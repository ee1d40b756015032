//! Change and duplicate tracking
//!
//! Remembers what has already been said in the chat so that a status is
//! announced once per change and each distinct failure once per process.

use std::collections::HashSet;

/// Mutable state of the polling loop
///
/// Owned by the poller for the whole process lifetime and never
/// persisted. A restart therefore re-announces the current status.
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    /// Last status message delivered to the chat
    last_status_message: String,

    /// Failure messages already delivered to the chat
    notified_errors: HashSet<String>,

    /// `from_date` of the next poll
    cursor: i64,
}

impl LoopState {
    /// Creates a fresh state starting at `cursor`
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            ..Default::default()
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_status_message(&self) -> &str {
        &self.last_status_message
    }

    /// Moves the cursor to the server time of the last checked answer
    pub fn advance_cursor(&mut self, cursor: i64) {
        self.cursor = cursor;
    }

    /// Whether `message` differs from the last delivered status
    pub fn should_announce_status(&self, message: &str) -> bool {
        message != self.last_status_message
    }

    /// Records a status message as delivered
    pub fn mark_status_announced(&mut self, message: String) {
        self.last_status_message = message;
    }

    /// Whether `message` has never been delivered as a failure report
    pub fn should_announce_error(&self, message: &str) -> bool {
        !self.notified_errors.contains(message)
    }

    /// Records a failure message as delivered
    pub fn mark_error_notified(&mut self, message: String) {
        self.notified_errors.insert(message);
    }

    /// Number of distinct failures delivered so far
    pub fn notified_error_count(&self) -> usize {
        self.notified_errors.len()
    }
}
