//! Response checking
//!
//! Verifies that a decoded grading API answer has the documented shape
//! before anything else looks at it.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::homework::{PollResult, Submission};
use crate::error::CheckError;

pub type Result<T> = std::result::Result<T, CheckError>;

/// Checks a raw grading API answer and extracts its homeworks
///
/// The answer must be an object with a non-empty `homeworks` array and
/// an integer `current_date`. An absent, `null` or empty `homeworks`
/// list is reported as [`CheckError::NoPendingData`]; every other shape
/// violation is [`CheckError::MalformedResponse`].
pub fn check_response(raw: &Value) -> Result<PollResult> {
    let object = raw
        .as_object()
        .ok_or_else(|| CheckError::malformed(format!("expected an object, got {}", kind(raw))))?;

    let homeworks = match object.get("homeworks") {
        None | Some(Value::Null) => return Err(CheckError::NoPendingData),
        Some(Value::Array(items)) if items.is_empty() => return Err(CheckError::NoPendingData),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(CheckError::malformed(format!(
                "`homeworks` must be a list, got {}",
                kind(other)
            )));
        }
    };

    let current_date = match object.get("current_date") {
        None => return Err(CheckError::malformed("`current_date` is missing")),
        Some(value) => value.as_i64().ok_or_else(|| {
            CheckError::malformed(format!(
                "`current_date` must be an integer, got {}",
                kind(value)
            ))
        })?,
    };

    let homeworks = homeworks
        .iter()
        .enumerate()
        .map(|(i, item)| parse_submission(i, item))
        .collect::<Result<Vec<_>>>()?;

    Ok(PollResult {
        homeworks,
        current_date,
    })
}

fn parse_submission(index: usize, item: &Value) -> Result<Submission> {
    if !item.is_object() {
        return Err(CheckError::malformed(format!(
            "homework {} must be an object, got {}",
            index,
            kind(item)
        )));
    }

    Submission::deserialize(item)
        .map_err(|e| CheckError::malformed(format!("homework {}: {}", index, e)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
