//! Error types for response checking and status translation

use thiserror::Error;

/// Why a grading API answer could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The answer does not have the documented shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The answer is well formed but carries no homework updates
    ///
    /// This is the normal idle state and is never reported to the chat.
    #[error("no new homework statuses in response")]
    NoPendingData,
}

impl CheckError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse(reason.into())
    }
}

/// Why a submission could not be turned into a chat message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// A required field is absent from the submission
    #[error("missing field `{0}` in homework")]
    MissingField(&'static str),

    /// The status is absent or not one of the known values
    #[error("unknown homework status: {0:?}")]
    UnknownStatus(String),
}
