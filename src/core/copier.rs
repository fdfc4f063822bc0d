//! Run orchestration
//!
//! A [`CopyRun`] walks the source tree once to size the progress bar, then
//! again to copy every match into the destination folder. Per-file failures
//! are counted and logged; they never abort the run.

use crate::config::{Locale, RunConfig};
use crate::error::{Result, SuffixCopyError};
use crate::fs::{
    copy_file, create_destination, path_taken, resolve_destination, Resolution, Scanner,
    SuffixFilter,
};
use crate::hash::ContentMatcher;
use crate::progress::RunDisplay;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// Files copied to the destination
    pub copied: u64,
    /// Files skipped because identical content was already there
    pub identical: u64,
    /// Files that could not be copied
    pub errors: u64,
}

impl Counters {
    /// Files handled so far, whatever the outcome
    pub fn processed(&self) -> u64 {
        self.copied + self.identical + self.errors
    }

    /// Share of `total` handled so far, 0-100
    pub fn percent_of(&self, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (self.processed() as f64 / total as f64 * 100.0).min(100.0)
    }
}

/// Lifecycle of a [`CopyRun`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Nothing counted yet, or a previous run was aborted
    Idle,
    /// Walking the source to count matches
    Counting,
    /// Match count known, ready to copy
    Ready {
        /// Number of matching files
        total: u64,
    },
    /// Copy pass in progress
    Copying {
        /// Number of matching files
        total: u64,
    },
    /// Copy pass finished
    Done(Counters),
}

impl RunState {
    /// Short lowercase name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Counting => "counting",
            Self::Ready { .. } => "ready",
            Self::Copying { .. } => "copying",
            Self::Done(_) => "done",
        }
    }
}

/// Final report of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Source root
    pub source: PathBuf,
    /// Destination folder
    pub destination: PathBuf,
    /// Matching files found by the count pass
    pub total: u64,
    /// Final counters
    #[serde(flatten)]
    pub counters: Counters,
    /// Bytes written by successful copies
    pub bytes_copied: u64,
    /// Wall time of the copy pass in seconds
    pub duration_secs: f64,
    /// Localized counters line
    pub summary: String,
}

impl RunReport {
    /// Check if every file was copied or skipped as identical
    pub fn is_success(&self) -> bool {
        self.counters.errors == 0
    }

    /// Detail lines for the console; the counters line is left to the display
    pub fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("Destination:     {}", self.destination.display()),
            format!(
                "Bytes copied:    {}",
                humansize::format_size(self.bytes_copied, humansize::BINARY)
            ),
            format!("Duration:        {:.2}s", self.duration_secs),
        ]
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Copy Summary ===");
        for line in self.detail_lines() {
            println!("{line}");
        }
    }
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The count pass found nothing; no folder was created
    NoFiles,
    /// The copy pass ran to completion
    Completed(RunReport),
}

/// What happened to one matched file
#[derive(Debug)]
pub struct FileOutcome {
    /// Matched source file
    pub source: PathBuf,
    /// Result for that file
    pub kind: OutcomeKind,
}

/// Result of processing one matched file
#[derive(Debug)]
pub enum OutcomeKind {
    /// Copied to `dest`
    Copied {
        /// Final destination path
        dest: PathBuf,
        /// Bytes written
        bytes: u64,
    },
    /// `dest` already held the same content
    Identical {
        /// Existing destination path
        dest: PathBuf,
    },
    /// Rename resolution or copy failed
    Failed(SuffixCopyError),
}

#[derive(Debug)]
struct CopyTask {
    source: PathBuf,
    dest: PathBuf,
}

impl CopyTask {
    fn execute(self) -> FileOutcome {
        let kind = match copy_file(&self.source, &self.dest) {
            Ok(bytes) => OutcomeKind::Copied {
                dest: self.dest,
                bytes,
            },
            Err(e) => OutcomeKind::Failed(e),
        };
        FileOutcome {
            source: self.source,
            kind,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    counters: Counters,
    bytes_copied: u64,
}

/// One collection run: count, then copy with collision renaming
pub struct CopyRun<'d> {
    config: RunConfig,
    destination: PathBuf,
    scanner: Scanner,
    display: &'d dyn RunDisplay,
    state: RunState,
}

impl<'d> CopyRun<'d> {
    /// Create a run reporting to `display`
    pub fn new(config: RunConfig, display: &'d dyn RunDisplay) -> Self {
        let destination = config.destination_dir();
        let scanner = Scanner::new(SuffixFilter::new(&config.extension, config.match_mode))
            .excluding(&destination);

        Self {
            config,
            destination,
            scanner,
            display,
            state: RunState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Configuration of this run
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Destination folder of this run
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Count matches and execute the copy pass
    pub fn execute(&mut self) -> Result<RunOutcome> {
        self.count()?;
        self.start()
    }

    /// Walk the source and count matching files
    ///
    /// Valid from `Idle` or `Done`; moves to `Ready`.
    pub fn count(&mut self) -> Result<u64> {
        if !matches!(self.state, RunState::Idle | RunState::Done(_)) {
            return Err(self.invalid("count"));
        }

        if let Err(e) = self
            .config
            .validate_extension()
            .and_then(|_| self.config.validate_source())
        {
            tracing::warn!(error = %e, "invalid run input");
            self.display.show_error(self.config.locale.missing_input());
            self.state = RunState::Idle;
            return Err(e);
        }

        self.state = RunState::Counting;
        let total = self.scanner.count(&self.config.source);
        tracing::info!(
            source = %self.config.source.display(),
            suffix = %self.scanner.filter().pattern(),
            total,
            "counted matching files"
        );

        self.state = RunState::Ready { total };
        Ok(total)
    }

    /// Copy every match into the destination folder
    ///
    /// Valid from `Ready`; moves to `Done`, or back to `Idle` when there is
    /// nothing to copy or the destination cannot be created.
    pub fn start(&mut self) -> Result<RunOutcome> {
        let RunState::Ready { total } = self.state else {
            return Err(self.invalid("start"));
        };
        let locale = self.config.locale;

        if total == 0 {
            tracing::info!("{}", locale.no_files_found());
            self.display.show_info(locale.no_files_found());
            self.state = RunState::Idle;
            return Ok(RunOutcome::NoFiles);
        }

        if let Err(e) = create_destination(&self.destination) {
            tracing::warn!(error = %e, "failed to create destination");
            self.display
                .show_error(&locale.destination_failed(self.destination.display(), &e));
            self.state = RunState::Idle;
            return Err(e);
        }

        self.state = RunState::Copying { total };
        let start_time = Instant::now();
        let mut tally = Tally::default();
        self.display.report_progress(0.0);

        let threads = self.config.worker_threads();
        if threads > 1 {
            if let Err(e) = self.copy_parallel(threads, total, &mut tally) {
                tracing::warn!(error = %e, "parallel copy failed");
                self.display.show_error(&e.to_string());
                self.state = RunState::Idle;
                return Err(e);
            }
        } else {
            self.copy_sequential(total, &mut tally);
        }

        let counters = tally.counters;
        let summary = locale.summary(counters.copied, counters.identical, counters.errors);
        tracing::info!(
            copied = counters.copied,
            identical = counters.identical,
            errors = counters.errors,
            "run finished"
        );
        self.display.show_summary(&summary);
        self.state = RunState::Done(counters);

        Ok(RunOutcome::Completed(RunReport {
            source: self.config.source.clone(),
            destination: self.destination.clone(),
            total,
            counters,
            bytes_copied: tally.bytes_copied,
            duration_secs: start_time.elapsed().as_secs_f64(),
            summary,
        }))
    }

    /// Resolve and copy each match as the walk yields it
    fn copy_sequential(&self, total: u64, tally: &mut Tally) {
        for source in self.scanner.matching_files(&self.config.source) {
            let desired = self.desired_path(&source);
            let mut matcher = self.content_matcher(&source);

            let resolution = resolve_destination(
                &desired,
                self.config.rename_limit,
                path_taken,
                |candidate| matcher.as_mut().is_some_and(|m| m.matches(candidate)),
            );

            let outcome = match resolution {
                Ok(Resolution::Available(dest)) => CopyTask { source, dest }.execute(),
                Ok(Resolution::Identical(dest)) => FileOutcome {
                    source,
                    kind: OutcomeKind::Identical { dest },
                },
                Err(e) => FileOutcome {
                    source,
                    kind: OutcomeKind::Failed(e),
                },
            };
            self.record(outcome, total, tally);
        }
    }

    /// Plan every destination up front, then copy on a rayon pool
    ///
    /// Names are reserved during planning so no two workers share a target.
    /// Workers send outcomes back over a channel; this thread alone updates
    /// counters and the display.
    fn copy_parallel(&self, threads: usize, total: u64, tally: &mut Tally) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SuffixCopyError::ThreadPoolError(e.to_string()))?;

        let tasks = self.plan(total, tally);
        tracing::debug!(tasks = tasks.len(), threads, "starting parallel copy");

        let (tx, rx) = crossbeam::channel::unbounded::<FileOutcome>();
        std::thread::scope(|scope| {
            scope.spawn(move || {
                pool.install(|| {
                    tasks.into_par_iter().for_each_with(tx, |tx, task| {
                        // The receiver outlives every worker
                        let _ = tx.send(task.execute());
                    });
                });
            });

            for outcome in rx.iter() {
                self.record(outcome, total, tally);
            }
        });

        Ok(())
    }

    /// Resolve every match against the disk plus names already planned
    ///
    /// Matches that resolve to an identical file or fail to resolve are
    /// recorded right away.
    fn plan(&self, total: u64, tally: &mut Tally) -> Vec<CopyTask> {
        let mut reserved: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut tasks = Vec::new();

        for source in self.scanner.matching_files(&self.config.source) {
            let desired = self.desired_path(&source);
            let mut matcher = self.content_matcher(&source);

            let resolution = resolve_destination(
                &desired,
                self.config.rename_limit,
                |candidate| reserved.contains_key(candidate) || path_taken(candidate),
                |candidate| {
                    // A reserved name will hold its planned source's content
                    let compare_with = reserved
                        .get(candidate)
                        .map(PathBuf::as_path)
                        .unwrap_or(candidate);
                    matcher.as_mut().is_some_and(|m| m.matches(compare_with))
                },
            );

            match resolution {
                Ok(Resolution::Available(dest)) => {
                    reserved.insert(dest.clone(), source.clone());
                    tasks.push(CopyTask { source, dest });
                }
                Ok(Resolution::Identical(dest)) => self.record(
                    FileOutcome {
                        source,
                        kind: OutcomeKind::Identical { dest },
                    },
                    total,
                    tally,
                ),
                Err(e) => self.record(
                    FileOutcome {
                        source,
                        kind: OutcomeKind::Failed(e),
                    },
                    total,
                    tally,
                ),
            }
        }

        tasks
    }

    fn desired_path(&self, source: &Path) -> PathBuf {
        match source.file_name() {
            Some(name) => self.destination.join(name),
            None => self.destination.clone(),
        }
    }

    fn content_matcher(&self, source: &Path) -> Option<ContentMatcher> {
        self.config
            .skip_identical
            .then(|| ContentMatcher::new(source))
    }

    /// Update counters, log and progress for one processed file
    fn record(&self, outcome: FileOutcome, total: u64, tally: &mut Tally) {
        let locale: Locale = self.config.locale;
        let name = outcome
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match outcome.kind {
            OutcomeKind::Copied { dest, bytes } => {
                tally.counters.copied += 1;
                tally.bytes_copied += bytes;
                tracing::info!(
                    source = %outcome.source.display(),
                    dest = %dest.display(),
                    bytes,
                    "file copied"
                );
                self.display
                    .append_log(&locale.file_copied(&name, dest.display()));
            }
            OutcomeKind::Identical { dest } => {
                tally.counters.identical += 1;
                tracing::info!(
                    source = %outcome.source.display(),
                    dest = %dest.display(),
                    "identical file skipped"
                );
                self.display
                    .append_log(&locale.file_identical(&name, dest.display()));
            }
            OutcomeKind::Failed(SuffixCopyError::RenameLimitExceeded { base, limit }) => {
                tally.counters.errors += 1;
                tracing::warn!(
                    source = %outcome.source.display(),
                    base = %base.display(),
                    limit,
                    "rename limit reached"
                );
                self.display
                    .append_log(&locale.rename_limit_reached(base.display()));
            }
            OutcomeKind::Failed(e) => {
                tally.counters.errors += 1;
                tracing::warn!(source = %outcome.source.display(), error = %e, "copy failed");
                self.display.append_log(&locale.copy_failed(&name, &e));
            }
        }

        self.display
            .report_progress(tally.counters.percent_of(total));
    }

    fn invalid(&self, operation: &'static str) -> SuffixCopyError {
        SuffixCopyError::InvalidState {
            operation,
            state: self.state.name(),
        }
    }
}

/// Run a complete collection with the given display
pub fn collect_files(config: RunConfig, display: &dyn RunDisplay) -> Result<RunOutcome> {
    CopyRun::new(config, display).execute()
}
