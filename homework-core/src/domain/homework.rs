//! Homework domain types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::StatusError;

/// A homework record as reported by the grading API
///
/// Every field is optional on the wire. A record without a name or
/// with an unrecognised status is still a valid record; it only fails
/// later, when it is turned into a message. The informational fields
/// are kept as raw JSON so an unexpected type there never rejects the
/// answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homework_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_comment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_name: Option<Value>,
}

impl Submission {
    /// Creates a submission with only a name and a status set
    pub fn new(homework_name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            homework_name: Some(homework_name.into()),
            status: Some(status.into()),
            ..Default::default()
        }
    }
}

/// Review status of a homework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    /// Accepted by the reviewer
    Approved,

    /// Picked up by a reviewer, not graded yet
    Reviewing,

    /// Returned with remarks
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict shown in the chat
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(StatusError::UnknownStatus(other.to_string())),
        }
    }
}

/// A checked answer of the grading API
///
/// `homeworks` is ordered newest first, as the API returns it.
/// `current_date` is the server time of the answer and becomes the
/// `from_date` of the next poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult {
    pub homeworks: Vec<Submission>,
    pub current_date: i64,
}

impl PollResult {
    /// The most recently updated submission
    pub fn latest(&self) -> Option<&Submission> {
        self.homeworks.first()
    }
}
