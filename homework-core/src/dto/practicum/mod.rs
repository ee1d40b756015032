//! Grading API DTOs

use serde::{Deserialize, Serialize};

/// Query string of a homework statuses request
///
/// Only statuses changed after `from_date` (Unix seconds) are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusesQuery {
    pub from_date: i64,
}
