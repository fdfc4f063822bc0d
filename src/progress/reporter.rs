//! Display surfaces for a run
//!
//! A run only talks to the [`RunDisplay`] trait:
//! - [`ConsoleDisplay`] draws an indicatif progress bar with log lines above it
//! - [`HeadlessDisplay`] records every event, for tests and embedding

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

/// Progress bar resolution (hundredths of a percent)
const PROGRESS_SCALE: u64 = 10_000;

/// Capability interface for everything a run shows to the user
pub trait RunDisplay {
    /// Progress on a 0-100 scale
    fn report_progress(&self, percent: f64);

    /// One line of the running per-file log
    fn append_log(&self, line: &str);

    /// Informational message (e.g. nothing to copy)
    fn show_info(&self, message: &str);

    /// Error message that stops the run
    fn show_error(&self, message: &str);

    /// Final counters line
    fn show_summary(&self, summary: &str) {
        self.append_log(summary);
    }
}

/// Terminal display backed by an indicatif progress bar
pub struct ConsoleDisplay {
    bar: ProgressBar,
    enabled: bool,
}

impl ConsoleDisplay {
    /// Create a visible console display
    pub fn new() -> Self {
        let bar = ProgressBar::new(PROGRESS_SCALE);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {msg}")
                .expect("Invalid template")
                .progress_chars("=> "),
        );
        bar.set_message(format_percent(0.0));

        Self { bar, enabled: true }
    }

    /// Create a display that only prints errors (for quiet mode)
    pub fn disabled() -> Self {
        let mut display = Self::new();
        display.enabled = false;
        display.bar.set_draw_target(ProgressDrawTarget::hidden());
        display
    }

    /// Check if output is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl RunDisplay for ConsoleDisplay {
    fn report_progress(&self, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        self.bar.set_position((percent * PROGRESS_SCALE as f64 / 100.0).round() as u64);
        self.bar.set_message(format_percent(percent));
    }

    fn append_log(&self, line: &str) {
        if self.enabled {
            self.bar.println(line);
        }
    }

    fn show_info(&self, message: &str) {
        if self.enabled {
            self.bar.println(format!("{}", style(message).cyan()));
        }
    }

    fn show_error(&self, message: &str) {
        self.bar.suspend(|| eprintln!("{}", style(message).red().bold()));
    }

    fn show_summary(&self, summary: &str) {
        self.bar.finish_with_message(format!("{}", style(summary).green()));
    }
}

fn format_percent(percent: f64) -> String {
    format!("{percent:5.1}%")
}

/// One thing shown on a [`HeadlessDisplay`]
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    /// Progress update, 0-100
    Progress(f64),
    /// Log line
    Log(String),
    /// Info message
    Info(String),
    /// Error message
    Error(String),
    /// Final summary
    Summary(String),
}

/// Display that records events instead of drawing them
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    events: Mutex<Vec<DisplayEvent>>,
}

impl HeadlessDisplay {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything shown so far, in order
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.lock().clone()
    }

    /// Progress values reported so far
    pub fn progress(&self) -> Vec<f64> {
        self.collect(|e| match e {
            DisplayEvent::Progress(p) => Some(*p),
            _ => None,
        })
    }

    /// Log lines appended so far
    pub fn logs(&self) -> Vec<String> {
        self.collect(|e| match e {
            DisplayEvent::Log(line) => Some(line.clone()),
            _ => None,
        })
    }

    /// Info messages shown so far
    pub fn infos(&self) -> Vec<String> {
        self.collect(|e| match e {
            DisplayEvent::Info(msg) => Some(msg.clone()),
            _ => None,
        })
    }

    /// Error messages shown so far
    pub fn errors(&self) -> Vec<String> {
        self.collect(|e| match e {
            DisplayEvent::Error(msg) => Some(msg.clone()),
            _ => None,
        })
    }

    /// Last summary shown, if any
    pub fn summary(&self) -> Option<String> {
        self.collect(|e| match e {
            DisplayEvent::Summary(s) => Some(s.clone()),
            _ => None,
        })
        .pop()
    }

    fn collect<T>(&self, f: impl FnMut(&DisplayEvent) -> Option<T>) -> Vec<T> {
        self.lock().iter().filter_map(f).collect()
    }

    fn push(&self, event: DisplayEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DisplayEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RunDisplay for HeadlessDisplay {
    fn report_progress(&self, percent: f64) {
        self.push(DisplayEvent::Progress(percent));
    }

    fn append_log(&self, line: &str) {
        self.push(DisplayEvent::Log(line.to_string()));
    }

    fn show_info(&self, message: &str) {
        self.push(DisplayEvent::Info(message.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.push(DisplayEvent::Error(message.to_string()));
    }

    fn show_summary(&self, summary: &str) {
        self.push(DisplayEvent::Summary(summary.to_string()));
    }
}
