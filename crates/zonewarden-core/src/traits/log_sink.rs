// # Log Sink Trait
//
// Defines the interface for forwarding reconciliation log lines to an
// external log-ingestion service.
//
// ## Delivery
//
// Delivery is best-effort. `LogSink::log` has no error channel: a sink
// that cannot deliver an event reports the failure locally (through
// `tracing`) and returns. It never blocks or fails the caller's flow.
//
// ## Implementations
//
// - Datadog: `zonewarden-datadog` crate
// - [`NullLogSink`]: discards everything (no sink configured)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a forwarded log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Normal progress
    Info,
    /// A failure on any branch
    Error,
}

impl LogLevel {
    /// Lower-case name as sent to log backends
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static attributes attached to every event a sink emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogContext {
    /// Service name
    pub service: String,
    /// Source tag (emitting runtime)
    pub source: String,
    /// Free-form tags, e.g. `env` → `DEV`
    pub tags: BTreeMap<String, String>,
    /// Hostname of the emitting machine, if known
    pub hostname: Option<String>,
}

impl LogContext {
    /// Create a context with the given service and source and no tags
    pub fn new(service: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            source: source.into(),
            tags: BTreeMap::new(),
            hostname: None,
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Set the hostname
    pub fn with_hostname(mut self, hostname: Option<String>) -> Self {
        self.hostname = hostname;
        self
    }

    /// Build the event for a single log call
    pub fn event(&self, message: impl Into<String>, level: LogLevel) -> LogEvent {
        LogEvent {
            message: message.into(),
            level,
            service: self.service.clone(),
            source: self.source.clone(),
            tags: self.tags.clone(),
            hostname: self.hostname.clone(),
        }
    }
}

/// A single structured log event; created per call and never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Log line
    pub message: String,
    /// Severity
    pub level: LogLevel,
    /// Service name
    pub service: String,
    /// Source tag
    pub source: String,
    /// Tags
    pub tags: BTreeMap<String, String>,
    /// Hostname
    pub hostname: Option<String>,
}

impl LogEvent {
    /// Tags rendered as `key:value` pairs joined by commas
    pub fn tag_string(&self) -> String {
        self.tags
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Trait for log sink implementations
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Forward one log line
    async fn log(&self, message: &str, level: LogLevel);

    /// Get the sink name (for logging/debugging)
    fn sink_name(&self) -> &'static str;
}

/// A sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogSink;

#[async_trait]
impl LogSink for NullLogSink {
    async fn log(&self, _message: &str, _level: LogLevel) {}

    fn sink_name(&self) -> &'static str {
        "null"
    }
}
