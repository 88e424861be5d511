/// Galaxy3D Engine - global logging hub for the culling crate
///
/// Culling bins are created and dropped every frame, so they do not own a
/// logger. Every `engine_*!` macro routes through the process-wide logger
/// stored here. It starts as a `DefaultLogger` and can be replaced at any time.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

// ===== PUBLIC API =====

/// Process-wide logging hub
///
/// ```no_run
/// use galaxy_3d_occlusion::galaxy3d::{Engine, log::{Logger, LogEntry}};
///
/// struct HudLogger;
/// impl Logger for HudLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Show culling warnings in the debug HUD...
///     }
/// }
///
/// Engine::set_logger(HudLogger);
/// ```
pub struct Engine;

impl Engine {
    /// Route every subsequent `engine_*!` call to `logger`.
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        Self::install(Box::new(logger));
    }

    /// Back to the console logger (Info and above).
    pub fn reset_logger() {
        Self::install(Box::new(DefaultLogger::new()));
    }

    /// Entry point of the non-error macros. `source` is a tag such as
    /// `"galaxy3d::Octree"`.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(Self::entry(severity, source, message, None));
    }

    /// Same as [`Engine::log`] with the call site attached.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(Self::entry(severity, source, message, Some((file, line))));
    }

    fn entry(
        severity: LogSeverity,
        source: &str,
        message: String,
        location: Option<(&'static str, u32)>,
    ) -> LogEntry {
        LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_owned(),
            message,
            file: location.map(|(file, _)| file),
            line: location.map(|(_, line)| line),
        }
    }

    fn install(logger: Box<dyn Logger>) {
        // A poisoned lock keeps the previous logger
        if let Ok(mut current) = logger_lock().write() {
            *current = logger;
        }
    }

    fn dispatch(entry: LogEntry) {
        // A poisoned logger only loses the message
        if let Ok(current) = logger_lock().read() {
            current.log(&entry);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
