//! Structured logging - JSON-formatted events for machine parsing
//!
//! Every pipeline decision (classification, routing, mutation results,
//! swallowed persistence failures) emits one line of JSON to stderr and,
//! when configured, to a log file.
//!
//! Usage:
//!   log_event(LogLevel::Info, "ASSISTANT", "intent_classified", json!({
//!       "command": "create a python file named calculator",
//!       "intent": "create_file",
//!   }));

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
    static ref LOG_CONFIG: Mutex<LogConfig> = Mutex::new(LogConfig::default());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub component: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file_path: Option<PathBuf>,
    pub min_level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: LogLevel::Info,
        }
    }
}

/// Initialize the logger. Safe to call more than once; the last config
/// wins.
pub fn init_logger(config: LogConfig) {
    if let Some(path) = &config.file_path {
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
            if let Ok(mut log_file) = LOG_FILE.lock() {
                *log_file = Some(file);
            }
        }
    }
    if let Ok(mut cfg) = LOG_CONFIG.lock() {
        *cfg = config;
    }
}

/// Log an event with structured data.
pub fn log_event(level: LogLevel, component: &str, event: &str, data: serde_json::Value) {
    log_entry(level, component, event, None, Some(data));
}

/// Log a human message with optional data.
pub fn log_message(level: LogLevel, component: &str, event: &str, message: &str) {
    log_entry(level, component, event, Some(message.to_string()), None);
}

fn log_entry(
    level: LogLevel,
    component: &str,
    event: &str,
    message: Option<String>,
    data: Option<serde_json::Value>,
) {
    let min_level = LOG_CONFIG.lock().map(|c| c.min_level).unwrap_or(LogLevel::Info);
    if level < min_level {
        return;
    }

    let entry = LogEntry {
        timestamp: Utc::now(),
        level: level.as_str().to_string(),
        component: component.to_string(),
        event: event.to_string(),
        message,
        data,
    };

    let line = match serde_json::to_string(&entry) {
        Ok(json) => json,
        Err(_) => return,
    };

    eprintln!("{line}");

    if let Ok(mut file) = LOG_FILE.lock() {
        if let Some(f) = file.as_mut() {
            let _ = writeln!(f, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_entry_serializes_without_empty_fields() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: "info".to_string(),
            component: "TEST".to_string(),
            event: "something".to_string(),
            message: None,
            data: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("message"));
        assert!(!json.contains("data"));
    }

    #[test]
    fn test_log_event_does_not_panic() {
        log_event(LogLevel::Info, "TEST", "ping", json!({"ok": true}));
        log_message(LogLevel::Warn, "TEST", "warned", "something happened");
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
