//! Status verdicts
//!
//! Turns a submission into the message posted to the chat.

use crate::domain::homework::{HomeworkStatus, Submission};
use crate::error::StatusError;

/// Builds the chat message for a submission's current status
///
/// The name is checked before the status, so a record lacking both
/// reports the missing name.
pub fn parse_status(submission: &Submission) -> Result<String, StatusError> {
    let name = submission
        .homework_name
        .as_deref()
        .ok_or(StatusError::MissingField("homework_name"))?;

    let status: HomeworkStatus = submission
        .status
        .as_deref()
        .ok_or_else(|| StatusError::UnknownStatus("<missing>".to_string()))?
        .parse()?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}
