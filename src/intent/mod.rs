//! Intent matching and dispatch
//!
//! Transcripts are matched by ordered substring containment against a
//! fixed keyword table; the first keyword found wins. Anything that matches
//! nothing gets the help message.

mod dispatcher;
mod matcher;

pub use dispatcher::{Clock, Dispatcher, SystemClock};
pub use matcher::Intent;
