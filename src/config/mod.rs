//! Configuration module for Markpad
//!
//! This module handles user preferences, including deserialization from
//! JSON in the platform-specific config directory, and the view-mode
//! state machine.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
