//! Logging collaborator
//!
//! The client never writes to a global logger of its own. A [`Logger`] is handed
//! to it at construction and shared with the authenticators. [`TracingLogger`]
//! forwards to `tracing`, leaving subscriber setup to the host application.

use std::fmt;
use std::sync::Arc;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
}

/// Structured context of a resource operation.
///
/// Empty fields are left out when rendered as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFields<'a> {
    /// Resource family, e.g. `team_admin`
    pub kind: &'a str,
    pub action: &'a str,
    pub team: &'a str,
    pub roster: &'a str,
    /// User or schedule the operation acts on
    pub subject: &'a str,
}

impl<'a> LogFields<'a> {
    pub fn new(kind: &'a str, action: &'a str) -> Self {
        LogFields {
            kind,
            action,
            ..Default::default()
        }
    }

    pub fn team(mut self, team: &'a str) -> Self {
        self.team = team;
        self
    }

    pub fn roster(mut self, roster: &'a str) -> Self {
        self.roster = roster;
        self
    }

    pub fn subject(mut self, subject: &'a str) -> Self {
        self.subject = subject;
        self
    }
}

impl fmt::Display for LogFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} action={}", self.kind, self.action)?;
        for (key, value) in [("team", self.team), ("roster", self.roster), ("subject", self.subject)] {
            if !value.is_empty() {
                write!(f, " {key}={value}")?;
            }
        }
        Ok(())
    }
}

/// Sink for the client's diagnostic messages
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    /// Log with structured context. Sinks without native fields get them
    /// prefixed to the message.
    fn log_fields(&self, level: LogLevel, fields: &LogFields<'_>, message: &str) {
        self.log(level, &format!("[{fields}] {message}"));
    }
}

macro_rules! tracing_event {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            LogLevel::Trace => tracing::trace!($($arg)+),
            LogLevel::Debug => tracing::debug!($($arg)+),
            LogLevel::Info => tracing::info!($($arg)+),
            LogLevel::Warning => tracing::warn!($($arg)+),
            LogLevel::Error => tracing::error!($($arg)+),
        }
    };
}

/// Forwards every message to the `tracing` macros under target `oncall`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        tracing_event!(level, target: "oncall", "{message}");
    }

    fn log_fields(&self, level: LogLevel, fields: &LogFields<'_>, message: &str) {
        tracing_event!(
            level,
            target: "oncall",
            kind = fields.kind,
            action = fields.action,
            team = fields.team,
            roster = fields.roster,
            subject = fields.subject,
            "{message}"
        );
    }
}

pub(crate) fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}
