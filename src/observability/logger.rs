//! Structured JSON logger
//!
//! One log line = one event. Lines are JSON objects with a fixed prefix
//! (`ts`, `event`, `severity`) followed by caller fields in alphabetical
//! order, so identical events always serialize identically. Writes are
//! synchronous and unbuffered; INFO and below go to stdout, ERROR and
//! FATAL to stderr.
//!
//! Events emitted by the engine include ENGINE_START, ENGINE_SEEDED,
//! INDEX_REHYDRATED, INDEX_REBUILT, SNAPSHOT_WRITTEN, DUPLICATE_KEY and
//! OPERATION_FAILED.

use std::fmt;
use std::io::{self, Write};

use chrono::Utc;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
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
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger.
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::render(Some(Utc::now().to_rfc3339()), severity, event, fields);
        if severity >= Severity::Error {
            let mut err = io::stderr();
            let _ = err.write_all(line.as_bytes());
            let _ = err.flush();
        } else {
            let mut out = io::stdout();
            let _ = out.write_all(line.as_bytes());
            let _ = out.flush();
        }
    }

    /// Render one event to a JSON line. The timestamp is injectable so
    /// tests can assert on complete lines.
    fn render(
        ts: Option<String>,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) -> String {
        let mut line = String::with_capacity(256);
        line.push('{');

        if let Some(ts) = ts {
            line.push_str("\"ts\":\"");
            Self::escape_into(&mut line, &ts);
            line.push_str("\",");
        }

        line.push_str("\"event\":\"");
        Self::escape_into(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted {
            line.push_str(",\"");
            Self::escape_into(&mut line, key);
            line.push_str("\":\"");
            Self::escape_into(&mut line, value);
            line.push('"');
        }

        line.push('}');
        line.push('\n');
        line
    }

    fn escape_into(out: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        }
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        Logger::render(None, severity, event, fields)
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_line_is_valid_json() {
        let line = render(Severity::Info, "ENGINE_START", &[("records", "42")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "ENGINE_START");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["records"], "42");
    }

    #[test]
    fn test_fields_sorted_deterministically() {
        let a = render(Severity::Info, "E", &[("zeta", "1"), ("alpha", "2")]);
        let b = render(Severity::Info, "E", &[("alpha", "2"), ("zeta", "1")]);
        assert_eq!(a, b);
        assert!(a.find("alpha").unwrap() < a.find("zeta").unwrap());
    }

    #[test]
    fn test_special_characters_escaped() {
        let line = render(Severity::Warn, "E", &[("msg", "a \"quote\"\nnewline")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["msg"], "a \"quote\"\nnewline");
    }

    #[test]
    fn test_one_event_one_line() {
        let line = render(Severity::Info, "E", &[("a", "1"), ("b", "2")]);
        assert_eq!(line.chars().filter(|c| *c == '\n').count(), 1);
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_timestamp_leads_when_present() {
        let line = Logger::render(
            Some("2026-01-01T00:00:00+00:00".to_string()),
            Severity::Info,
            "E",
            &[],
        );
        assert!(line.starts_with("{\"ts\":\""));
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["ts"], "2026-01-01T00:00:00+00:00");
    }
}
