//! `bundlekit_log` v1:
//! Logging collaborator for the bundlekit pipeline crates.
//!
//! Engines take a `&dyn LogSink` instead of touching process-wide logger
//! state, so a run can be silenced, captured, or routed through the `log`
//! facade without reconfiguring anything global.

use std::fmt;
use std::sync::Mutex;

////////////////////////////////////////////////////////////////////////////////
// #region LevelsAndTrait

/// Severity of one emitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumLogLevel {
    /// Progress/status line.
    Info,
    /// Non-fatal anomaly.
    Warn,
    /// Failure report.
    Error,
    /// Completed-operation summary.
    Success,
}

impl fmt::Display for EnumLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Success => write!(f, "SUCCESS"),
        }
    }
}

/// Receiver for engine log lines.
///
/// `success` is distinct from `info` so callers can surface end-of-run
/// summaries differently from progress chatter.
pub trait LogSink: Send + Sync {
    /// Progress/status line.
    fn info(&self, message: &str);
    /// Non-fatal anomaly.
    fn warn(&self, message: &str);
    /// Failure report.
    fn error(&self, message: &str);
    /// Completed-operation summary.
    fn success(&self, message: &str);
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Sinks

/// Sink that discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSinkNull;

impl LogSink for LogSinkNull {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
}

/// Sink that forwards to the `log` facade with a scoped prefix.
#[derive(Debug, Clone)]
pub struct LogSinkConsole {
    /// Scope shown in the line prefix, e.g. the consuming plugin name.
    pub name_scope: String,
    /// When false, every line is dropped.
    pub if_enabled: bool,
}

impl LogSinkConsole {
    /// Enabled sink with the given scope name.
    pub fn new(name_scope: impl Into<String>) -> Self {
        Self {
            name_scope: name_scope.into(),
            if_enabled: true,
        }
    }

    fn format_line(&self, message: &str) -> String {
        format!("[bundlekit:{}] {message}", self.name_scope)
    }
}

impl LogSink for LogSinkConsole {
    fn info(&self, message: &str) {
        if self.if_enabled {
            log::info!("{}", self.format_line(message));
        }
    }

    fn warn(&self, message: &str) {
        if self.if_enabled {
            log::warn!("{}", self.format_line(message));
        }
    }

    fn error(&self, message: &str) {
        if self.if_enabled {
            log::error!("{}", self.format_line(message));
        }
    }

    fn success(&self, message: &str) {
        // The facade has no success level; tag it so readers can grep it out.
        if self.if_enabled {
            log::info!("{} [OK]", self.format_line(message));
        }
    }
}

/// Sink that records lines in memory, for asserting engine logging in tests.
#[derive(Debug, Default)]
pub struct LogSinkMemory {
    lines: Mutex<Vec<(EnumLogLevel, String)>>,
}

impl LogSinkMemory {
    /// Empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, level: EnumLogLevel, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn lines(&self) -> Vec<(EnumLogLevel, String)> {
        self.lines.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// True when any recorded line at `level` contains `needle`.
    pub fn contains(&self, level: EnumLogLevel, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(lvl, msg)| *lvl == level && msg.contains(needle))
    }
}

impl LogSink for LogSinkMemory {
    fn info(&self, message: &str) {
        self.record(EnumLogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(EnumLogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(EnumLogLevel::Error, message);
    }

    fn success(&self, message: &str) {
        self.record(EnumLogLevel::Success, message);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
