//! Internal logging system for the Galaxy3D occlusion culling crate
//!
//! - Customizable logger via the Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error) with a minimum-severity filter
//! - Colored console output by default
//! - File and line information for detailed ERROR logs
//!
//! Culling runs every frame, so the default console logger drops
//! Trace and Debug entries unless asked otherwise.

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_occlusion::galaxy3d::log::{Logger, LogEntry};
///
/// struct FrameLogger;
///
/// impl Logger for FrameLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to an in-game console...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "galaxy3d::OcclusionCullingBin")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-object details (dropped objects, individual query results)
    Trace,

    /// Per-frame summaries (octree build, draw statistics)
    Debug,

    /// Important informational messages
    Info,

    /// Degraded behavior (query timeouts, protocol misuse that was ignored)
    Warn,

    /// Errors returned to the caller (with file:line details)
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the console logger.
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

impl LogEntry {
    /// Local wall-clock time of the entry, millisecond precision.
    pub fn local_time(&self) -> String {
        let datetime: DateTime<Local> = self.timestamp.into();
        datetime.format(TIMESTAMP_FORMAT).to_string()
    }

    /// ` (file:line)` for detailed entries, empty otherwise.
    pub fn location_suffix(&self) -> String {
        match (self.file, self.line) {
            (Some(file), Some(line)) => format!(" ({}:{})", file, line),
            _ => String::new(),
        }
    }
}

/// Format an entry as plain text (no colors).
///
/// `[timestamp] [SEVERITY] [source] message`, followed by `(file:line)`
/// when the entry carries a location.
pub fn format_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] [{}] [{}] {}{}",
        entry.local_time(),
        entry.severity.label(),
        entry.source,
        entry.message,
        entry.location_suffix()
    )
}

/// Console logger with a severity floor.
///
/// Trace is dimmed, Debug cyan, Info green, Warn yellow and Error bold red.
/// The default floor is Info, so per-frame Debug summaries stay silent
/// until asked for.
#[derive(Debug, Clone, Copy)]
pub struct DefaultLogger {
    min_severity: LogSeverity,
}

impl DefaultLogger {
    pub fn new() -> Self {
        Self::with_min_severity(LogSeverity::Info)
    }

    pub fn with_min_severity(min_severity: LogSeverity) -> Self {
        Self { min_severity }
    }

    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }

    /// Whether an entry of this severity would be printed.
    pub fn accepts(&self, severity: LogSeverity) -> bool {
        severity >= self.min_severity
    }

    fn colored_label(severity: LogSeverity) -> ColoredString {
        let label = severity.label();
        match severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        }
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if !self.accepts(entry.severity) {
            return;
        }
        eprintln!(
            "[{}] [{}] [{}] {}{}",
            entry.local_time(),
            Self::colored_label(entry.severity),
            entry.source.bright_blue(),
            entry.message,
            entry.location_suffix()
        );
    }
}

// ===== LOGGING MACROS =====
//
// Every macro takes a source tag first, then `format!` arguments:
//
// ```ignore
// engine_trace!("galaxy3d::OcclusionCullingBin", "Dropped object {:?}", key);
// ```

#[doc(hidden)]
#[macro_export]
macro_rules! __engine_log_at {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

/// Per-object details.
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log_at!(Trace, $source, $($arg)*) };
}

/// Per-frame summaries.
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log_at!(Debug, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log_at!(Info, $source, $($arg)*) };
}

/// Degraded but recoverable behavior.
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log_at!(Warn, $source, $($arg)*) };
}

/// Error with the caller's file:line attached.
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
