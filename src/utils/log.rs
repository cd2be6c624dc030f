//! Simple logging module.
//!
//! Lines go to stderr stamped with the time elapsed since the process
//! started, which is the useful reference frame for a short-lived toolchain
//! command.

use std::fmt::Display;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Log level for filtering messages.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static PROCESS_START: OnceLock<Instant> = OnceLock::new();

/// Initialize the logger with the given level.
pub fn init(level: Level) {
    PROCESS_START.get_or_init(Instant::now);
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Returns true if the given level should be logged.
#[inline]
fn enabled(level: Level) -> bool {
    level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Internal logging function with an identifier prefix.
fn log_with_id(level: Level, id: &str, message: &str) {
    if !enabled(level) {
        return;
    }
    let elapsed = PROCESS_START.get_or_init(Instant::now).elapsed();
    eprintln!(
        "{:5}.{:03} [{:5}] [{}] {}",
        elapsed.as_secs(),
        elapsed.subsec_millis(),
        level,
        id,
        message
    );
}

/// Logger instance with an identifier prefix.
///
/// Each logger carries an id that is prepended to its messages, so output
/// from different components can be told apart.
#[derive(Clone)]
pub struct Logger {
    pub id: Arc<str>,
}

impl Logger {
    /// Creates a new logger with the given identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self { id: id.into() }
    }

    /// Logs a debug-level message.
    pub fn debug(&self, message: &str) {
        log_with_id(Level::Debug, &self.id, message);
    }

    /// Logs an info-level message.
    pub fn info(&self, message: &str) {
        log_with_id(Level::Info, &self.id, message);
    }

    /// Logs a warning-level message.
    pub fn warn(&self, message: &str) {
        log_with_id(Level::Warn, &self.id, message);
    }

    /// Logs an error-level message.
    pub fn error(&self, message: &str) {
        log_with_id(Level::Error, &self.id, message);
    }
}
