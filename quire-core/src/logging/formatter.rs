//! Log formatting options for different output styles

use chrono::{DateTime, Utc};

/// One log line before formatting
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: log::Level, message: impl Into<String>, target: impl Into<String>) -> Self {
        Self { timestamp: Utc::now(), level, target: target.into(), message: message.into() }
    }

    pub fn from_record(record: &log::Record) -> Self {
        Self::new(record.level(), record.args().to_string(), record.target())
    }
}

/// How logs should be formatted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable (development default)
    /// Example: 2024-01-15 10:30:00.123 INFO  [quire_core::http] Signed in 'ada'
    Text,

    /// One JSON object per line
    /// Example: {"timestamp":"2024-01-15T10:30:00Z","level":"INFO","message":"Signed in 'ada'"}
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }

    pub fn format_entry(&self, entry: &LogEntry, include_target: bool) -> String {
        match self {
            LogFormat::Text => format_text(entry, include_target),
            LogFormat::Json => format_json(entry, include_target),
        }
    }
}

fn format_text(entry: &LogEntry, include_target: bool) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
    if include_target {
        format!("{} {:<5} [{}] {}", timestamp, entry.level, entry.target, entry.message)
    } else {
        format!("{} {:<5} {}", timestamp, entry.level, entry.message)
    }
}

fn format_json(entry: &LogEntry, include_target: bool) -> String {
    let mut json = serde_json::Map::new();

    json.insert("timestamp".to_string(), entry.timestamp.to_rfc3339().into());
    json.insert("level".to_string(), entry.level.as_str().into());
    json.insert("message".to_string(), entry.message.clone().into());
    if include_target {
        json.insert("target".to_string(), entry.target.clone().into());
    }

    serde_json::to_string(&json).unwrap_or_else(|_| "Failed to serialize log entry".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format() {
        let entry = LogEntry::new(log::Level::Info, "Test \"quoted\" message", "quire_core::http");

        let formatted = LogFormat::Json.format_entry(&entry, true);

        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(parsed["message"], "Test \"quoted\" message");
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["target"], "quire_core::http");
    }

    #[test]
    fn test_text_format() {
        let entry = LogEntry::new(log::Level::Warn, "Credential rejected", "quire_core::http");

        let with_target = LogFormat::Text.format_entry(&entry, true);
        assert!(with_target.contains("WARN"));
        assert!(with_target.contains("[quire_core::http]"));
        assert!(with_target.ends_with("Credential rejected"));

        let without = LogFormat::Text.format_entry(&entry, false);
        assert!(!without.contains("quire_core"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("logfmt"), None);
    }
}
