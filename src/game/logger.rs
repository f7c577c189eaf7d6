//! Centralized game logger
//!
//! Messages are filtered by verbosity and can be printed, captured to an
//! in-memory buffer, or both. Tests use capture mode to assert on what the
//! engine reported.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - moves, captures and offers (default)
    #[default]
    Normal = 2,
    /// Verbose - turn changes, refused offers and every state change
    Verbose = 3,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "controller_choice")
    pub category: Option<&'static str>,
    /// Controller that made the choice, for controller_choice entries
    pub controller: Option<&'static str>,
}

/// Guard type that provides read-only access to log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Logger owned by `GameState`
///
/// The buffer sits behind a `RefCell` so controllers holding a shared
/// `GameStateView` can still log their choices.
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Choose where messages go; `Both` keeps printing while capturing
    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory only
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    /// Captured messages, one per line
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for entry in self.log_buffer.borrow().iter() {
            out.push_str(&entry.message);
            out.push('\n');
        }
        out
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    /// Print buffered entries allowed by the current verbosity, then clear
    pub fn flush_buffer(&mut self) {
        for entry in self.log_buffer.borrow().iter() {
            if entry.level <= self.verbosity {
                Self::log_to_stdout(entry.level, &entry.message);
            }
        }
        self.clear_logs();
    }

    #[inline]
    fn log_to_stdout(level: VerbosityLevel, message: &str) {
        if level == VerbosityLevel::Minimal {
            println!("{}", message);
        } else {
            println!("  {}", message);
        }
    }

    fn log_at(
        &self,
        level: VerbosityLevel,
        message: &str,
        category: Option<&'static str>,
        controller: Option<&'static str>,
    ) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        if level > self.verbosity && !should_capture {
            return;
        }

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category,
                controller,
            });
        }

        if should_output && level <= self.verbosity {
            Self::log_to_stdout(level, message);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log_at(VerbosityLevel::Minimal, message, None, None);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log_at(VerbosityLevel::Normal, message, None, None);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log_at(VerbosityLevel::Verbose, message, None, None);
    }

    /// Log a controller decision at Normal level
    ///
    /// The controller name is recorded on the entry but kept out of the
    /// message, so transcripts compare equal across controllers.
    pub fn controller_choice(&self, controller: &'static str, message: &str) {
        self.log_at(
            VerbosityLevel::Normal,
            message,
            Some("controller_choice"),
            Some(controller),
        );
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}
