//! Content hashing module
//!
//! Provides SHA-256 hashing of files and the content comparison used to
//! recognise files that were already collected.

mod integrity;

pub use integrity::*;
