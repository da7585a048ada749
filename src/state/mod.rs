//! State machine module for wake-word activation
//!
//! Two states:
//! - Idle: listening only for the wake word
//! - Active: every non-empty transcript is a command, until sleep/exit

mod machine;

pub use machine::{State, StateMachine};
