//! Core domain types
//!
//! These types describe what the grading API tells us about a homework
//! and are shared between the HTTP client and the bot.

pub mod homework;
