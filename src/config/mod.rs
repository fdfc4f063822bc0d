//! Configuration module for SuffixCopy
//!
//! Provides configuration management including CLI arguments,
//! environment overrides, runtime settings and localized messages.

mod locale;
mod settings;

pub use locale::*;
pub use settings::*;
