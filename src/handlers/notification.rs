//! Notification Records
//!
//! Fixed-format multi-line log records emitted by every handler.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

const SEPARATOR: &str = "================================";

/// A banner line, labelled body lines and a closing separator
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    banner: String,
    lines: Vec<String>,
}

impl Notification {
    pub fn new(banner: impl Into<String>) -> Self {
        Self {
            banner: banner.into(),
            lines: Vec::new(),
        }
    }

    /// Append `<label>: <value>`
    pub fn field(mut self, label: &str, value: impl fmt::Display) -> Self {
        self.lines.push(format!("{}: {}", label, value));
        self
    }

    /// Append `<label>: "<value>"`
    pub fn quoted(mut self, label: &str, value: impl fmt::Display) -> Self {
        self.lines.push(format!("{}: \"{}\"", label, value));
        self
    }

    /// Append an ISO-8601 timestamp in UTC with millisecond precision
    pub fn timestamp(self, label: &str, at: DateTime<Utc>) -> Self {
        let rendered = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.field(label, rendered)
    }

    /// All lines of the record in emission order
    pub fn lines(&self) -> Vec<&str> {
        std::iter::once(self.banner.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .chain(std::iter::once(SEPARATOR))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Write the record to the log, one info event per line
    pub fn emit(&self) {
        for line in self.lines() {
            tracing::info!("{}", line);
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}
