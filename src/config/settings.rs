//! Configuration settings for SuffixCopy
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for a collection run.

use crate::config::Locale;
use crate::error::{Result, SuffixCopyError};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default cap on numeric rename suffixes per destination name
pub const DEFAULT_RENAME_LIMIT: u32 = 999;

/// SuffixCopy - collect files by suffix into a single folder
#[derive(Parser, Debug, Clone)]
#[command(name = "suffixcopy")]
#[command(author = "SuffixCopy Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Collect files by suffix from a directory tree into one folder")]
#[command(long_about = r#"
SuffixCopy walks a source directory recursively and copies every file whose
name ends with the given suffix into a single destination folder. When a
name is already taken the copy is renamed to name_1.ext, name_2.ext, ...

By default the destination is <SOURCE>/arquivos_<EXT> (or <SOURCE>/files_<EXT>
with --lang en).

Examples:
  suffixcopy ~/projects --ext .log                 # Collect all .log files
  suffixcopy ~/photos -e jpg --match extension     # Only names ending in .jpg
  suffixcopy /data -e .csv --dest /tmp/csv -t 8    # Custom destination, 8 workers
  suffixcopy /data -e .csv --skip-identical        # Don't duplicate identical files
"#)]
pub struct CliArgs {
    /// Source directory to walk
    #[arg(value_name = "SOURCE", env = "SUFFIXCOPY_SOURCE")]
    pub source: PathBuf,

    /// File name suffix to match (e.g. .log)
    #[arg(short = 'e', long, value_name = "EXT", env = "SUFFIXCOPY_EXT")]
    pub ext: String,

    /// Destination folder (default: <SOURCE>/<prefix><EXT>)
    #[arg(short = 'd', long, value_name = "DIR", env = "SUFFIXCOPY_DEST")]
    pub dest: Option<PathBuf>,

    /// Language of messages and of the default destination folder name
    #[arg(long, value_enum, default_value = "pt", env = "SUFFIXCOPY_LANG")]
    pub lang: Locale,

    /// How the suffix is matched against file names
    #[arg(long = "match", value_enum, default_value = "suffix", env = "SUFFIXCOPY_MATCH")]
    pub match_mode: MatchMode,

    /// Maximum rename attempts per name before the file is counted as an error
    #[arg(long, value_name = "NUM", env = "SUFFIXCOPY_MAX_RENAMES")]
    pub max_renames: Option<u32>,

    /// Never give up renaming (no attempt limit)
    #[arg(long, conflicts_with = "max_renames", env = "SUFFIXCOPY_UNBOUNDED_RENAMES")]
    pub unbounded_renames: bool,

    /// Skip files whose content already exists under the same name
    #[arg(long, env = "SUFFIXCOPY_SKIP_IDENTICAL")]
    pub skip_identical: bool,

    /// Number of copy threads (0 = auto-detect, 1 = sequential)
    #[arg(short = 't', long, default_value = "1", value_name = "NUM", env = "SUFFIXCOPY_THREADS")]
    pub threads: usize,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress progress and log output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Output format for the final report
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

/// How the configured suffix is compared with file names
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Plain trailing-character match ("txt" matches "report_txt")
    #[default]
    Suffix,
    /// Name must end with "." followed by the suffix
    Extension,
}

/// Cap on the numeric suffixes tried when resolving a name collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameLimit {
    /// Suffixes `_1` up to `_(n - 1)` are tried, then the file fails
    Bounded(u32),
    /// Keep counting until a free name is found
    Unbounded,
}

impl Default for RenameLimit {
    fn default() -> Self {
        Self::Bounded(DEFAULT_RENAME_LIMIT)
    }
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Source root
    pub source: PathBuf,
    /// Suffix to match
    pub extension: String,
    /// Explicit destination, overriding the derived one
    pub destination: Option<PathBuf>,
    /// Message and folder-name language
    pub locale: Locale,
    /// Suffix comparison mode
    pub match_mode: MatchMode,
    /// Rename attempt cap
    pub rename_limit: RenameLimit,
    /// Detect identical content under colliding names
    pub skip_identical: bool,
    /// Thread count (0 = auto, 1 = sequential)
    pub threads: usize,
}

impl CliArgs {
    /// Log filter used when `RUST_LOG` is unset
    ///
    /// Per-file failures are logged at `warn`, below the quiet default, since
    /// the display already reports them.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "error",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            extension: String::new(),
            destination: None,
            locale: Locale::default(),
            match_mode: MatchMode::default(),
            rename_limit: RenameLimit::default(),
            skip_identical: false,
            threads: 1,
        }
    }
}

impl RunConfig {
    /// Create a config for `source` and `extension` with default settings
    pub fn new(source: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            extension: extension.into(),
            ..Default::default()
        }
    }

    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> std::result::Result<Self, String> {
        let rename_limit = match (args.unbounded_renames, args.max_renames) {
            (true, _) => RenameLimit::Unbounded,
            (false, Some(0)) => return Err("--max-renames must be at least 1".to_string()),
            (false, Some(n)) => RenameLimit::Bounded(n),
            (false, None) => RenameLimit::default(),
        };

        Ok(Self {
            source: args.source.clone(),
            extension: args.ext.clone(),
            destination: args.dest.clone(),
            locale: args.lang,
            match_mode: args.match_mode,
            rename_limit,
            skip_identical: args.skip_identical,
            threads: args.threads,
        })
    }

    /// Check that the extension can be used both as a filter and as part of
    /// the destination folder name
    pub fn validate_extension(&self) -> Result<()> {
        if self.extension.is_empty() {
            return Err(SuffixCopyError::config("Extension must not be empty"));
        }
        if self.extension.contains(std::path::is_separator) || self.extension.contains('\0') {
            return Err(SuffixCopyError::config(format!(
                "Extension must not contain path separators: {:?}",
                self.extension
            )));
        }
        Ok(())
    }

    /// Check that the source root is an existing directory
    pub fn validate_source(&self) -> Result<()> {
        if !self.source.exists() {
            return Err(SuffixCopyError::NotFound(self.source.clone()));
        }
        if !self.source.is_dir() {
            return Err(SuffixCopyError::NotADirectory(self.source.clone()));
        }
        Ok(())
    }

    /// Destination folder for this run
    pub fn destination_dir(&self) -> PathBuf {
        match &self.destination {
            Some(dest) => dest.clone(),
            None => default_destination(&self.source, &self.extension, self.locale),
        }
    }

    /// Resolved number of copy threads
    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

/// `<source>/<prefix><extension>`, e.g. `/data/arquivos_.log`
pub fn default_destination(source: &Path, extension: &str, locale: Locale) -> PathBuf {
    source.join(format!("{}{}", locale.destination_prefix(), extension))
}
