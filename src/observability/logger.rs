//! Structured JSON logger
//!
//! - `event` first, `severity` second, remaining fields sorted by key
//! - One line per event, handed whole to a `LogSink`
//! - The stdio sink sends TRACE/INFO/WARN to stdout, ERROR/FATAL to stderr

use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Severity {
    /// Upper-case name written in the `severity` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for rendered log lines.
pub trait LogSink: Send + Sync {
    /// Receives one newline-terminated JSON line.
    fn write_line(&self, severity: Severity, line: &str);
}

/// Writes to the process's stdout, or stderr from ERROR upward.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioSink;

impl LogSink for StdioSink {
    fn write_line(&self, severity: Severity, line: &str) {
        let result = if severity >= Severity::Error {
            io::stderr().lock().write_all(line.as_bytes())
        } else {
            io::stdout().lock().write_all(line.as_bytes())
        };
        // A failed log write must never fail a query.
        let _ = result;
    }
}

/// Keeps every line in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the lines received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Returns true if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().map(|l| l.is_empty()).unwrap_or(true)
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, _severity: Severity, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.trim_end_matches('\n').to_string());
        }
    }
}

pub struct Logger;

impl Logger {
    /// Renders one event and hands it to `sink`.
    pub fn emit(sink: &dyn LogSink, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        sink.write_line(severity, &Self::render(severity, event, fields));
    }

    /// Renders one newline-terminated JSON object.
    pub fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted = fields.to_vec();
        sorted.sort_by_key(|&(key, _)| key);

        let mut out = String::with_capacity(48 + fields.len() * 24);
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{{\"event\":{},\"severity\":\"{}\"",
            JsonStr(event),
            severity
        );
        for (key, value) in sorted {
            let _ = write!(out, ",{}:{}", JsonStr(key), JsonStr(value));
        }
        out.push_str("}\n");
        out
    }
}

/// Displays a string as a quoted JSON string literal.
struct JsonStr<'a>(&'a str);

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}
