//! Data Transfer Objects for the external APIs
//!
//! Wire shapes of the requests sent to the grading API and to the
//! Telegram Bot API, kept apart from the domain types.

pub mod practicum;
pub mod telegram;
