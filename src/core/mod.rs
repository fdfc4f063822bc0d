//! Core copy engine module
//!
//! Provides the run state machine that counts matches, resolves
//! destination names, copies files and reports progress.

mod copier;

pub use copier::*;
