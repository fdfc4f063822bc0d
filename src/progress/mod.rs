//! Progress reporting module
//!
//! Defines the display capability a run reports to, with a terminal
//! implementation and a headless one that records events.

mod reporter;

pub use reporter::*;
