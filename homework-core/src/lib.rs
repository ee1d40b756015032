//! Homework Core
//!
//! Core types and pure logic for the homework status bot.
//!
//! This crate contains:
//! - Domain types: homework submissions, review statuses, poll results
//! - DTOs: request/response shapes for the grading and messaging APIs
//! - Response checking: validation of a raw grading API answer
//! - Verdicts: translation of a submission status into a chat message

pub mod check;
pub mod domain;
pub mod dto;
pub mod error;
pub mod verdict;
