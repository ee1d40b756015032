//! Scheduler layer for the bot
//!
//! This layer drives the fixed-period polling loop and decides what
//! reaches the chat.

pub mod poller;

pub use poller::StatusPoller;
