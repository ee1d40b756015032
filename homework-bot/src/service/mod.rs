//! Service layer
//!
//! State and decisions of the bot that do not talk to the network.

pub mod tracker;

pub use tracker::LoopState;
