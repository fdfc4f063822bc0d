//! # SuffixCopy - collect files by suffix into one folder
//!
//! SuffixCopy walks a directory tree, picks every file whose name ends with a
//! given suffix and copies it into a single flat destination folder. Name
//! collisions are resolved by inserting `_1`, `_2`, ... before the extension,
//! so nothing already in the destination is ever overwritten.
//!
//! ## Features
//!
//! - **Literal suffix matching**: `"txt"` matches `report.txt` and `report_txt`;
//!   an extension mode requires the dot
//! - **Deterministic renaming**: the first free name in `a.log`, `a_1.log`, ... wins,
//!   optionally capped
//! - **Identical-content detection**: optionally skip files already collected
//! - **Progress and per-file log**: through a pluggable display
//! - **Parallel copy**: names are planned up front, copies run on a thread pool
//!
//! ## Quick Start
//!
//! ```no_run
//! use suffixcopy::config::RunConfig;
//! use suffixcopy::core::{collect_files, RunOutcome};
//! use suffixcopy::progress::ConsoleDisplay;
//!
//! let config = RunConfig::new("/var/log/myapp", ".log");
//! let display = ConsoleDisplay::new();
//!
//! match collect_files(config, &display).unwrap() {
//!     RunOutcome::Completed(report) => report.print_summary(),
//!     RunOutcome::NoFiles => println!("nothing to copy"),
//! }
//! ```
//!
//! ## Step by step
//!
//! ```no_run
//! use suffixcopy::config::{Locale, RenameLimit, RunConfig};
//! use suffixcopy::core::CopyRun;
//! use suffixcopy::progress::HeadlessDisplay;
//!
//! let config = RunConfig {
//!     locale: Locale::En,
//!     rename_limit: RenameLimit::Unbounded,
//!     skip_identical: true,
//!     ..RunConfig::new("/data", "csv")
//! };
//!
//! let display = HeadlessDisplay::new();
//! let mut run = CopyRun::new(config, &display);
//!
//! let total = run.count().unwrap();
//! println!("{total} files to collect into {}", run.destination().display());
//! run.start().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod hash;
pub mod progress;

// Re-export commonly used types
pub use crate::config::{Locale, MatchMode, RenameLimit, RunConfig};
pub use crate::core::{collect_files, CopyRun, Counters, RunOutcome, RunReport};
pub use crate::error::{Result, SuffixCopyError};
pub use crate::progress::{ConsoleDisplay, HeadlessDisplay, RunDisplay};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use suffixcopy::prelude::*;
    //! ```

    pub use crate::config::{Locale, MatchMode, RenameLimit, RunConfig};
    pub use crate::core::{collect_files, CopyRun, Counters, RunOutcome, RunReport, RunState};
    pub use crate::error::{Result, SuffixCopyError};
    pub use crate::fs::{resolve_destination, Resolution, Scanner, SuffixFilter};
    pub use crate::hash::{hash_file, ContentMatcher, HashResult};
    pub use crate::progress::{ConsoleDisplay, HeadlessDisplay, RunDisplay};
}
