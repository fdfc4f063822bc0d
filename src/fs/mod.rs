//! File system operations module
//!
//! Provides the suffix-filtered directory walk and the
//! collision-resolving copy primitives used by a run.

mod operations;
mod scanner;

pub use operations::*;
pub use scanner::*;
