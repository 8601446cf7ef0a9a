//! Rolling Logger
//!
//! `log` backend that keeps the most recent records in a circular buffer so
//! the UI can show them, and mirrors every record to the browser console when
//! running on wasm32.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// One captured log line
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<5} [{}] {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Fixed-capacity buffer; pushing past capacity evicts the oldest entry
#[derive(Debug)]
pub struct RingBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub struct RollingLogger {
    level: LevelFilter,
    buffer: Mutex<RingBuffer>,
}

impl RollingLogger {
    pub fn new(capacity: usize, level: LevelFilter) -> Self {
        Self { level, buffer: Mutex::new(RingBuffer::new(capacity)) }
    }

    pub fn recent(&self) -> Vec<LogEntry> {
        self.buffer.lock().map(|b| b.snapshot()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry {
            timestamp: Local::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        mirror(&entry);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(entry);
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn mirror(entry: &LogEntry) {
    use wasm_bindgen::JsValue;
    let line = JsValue::from_str(&entry.to_string());
    match entry.level {
        Level::Error => web_sys::console::error_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Info => web_sys::console::info_1(&line),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn mirror(entry: &LogEntry) {
    eprintln!("{entry}");
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the global logger. Only the first call takes effect.
pub fn init(capacity: usize, level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(capacity, level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Records held by the global logger, oldest first
pub fn recent() -> Vec<LogEntry> {
    LOGGER.get().map(RollingLogger::recent).unwrap_or_default()
}

pub fn clear() {
    if let Some(logger) = LOGGER.get() {
        logger.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry { timestamp: Local::now(), level: Level::Info, target: "test".into(), message: message.into() }
    }

    #[test]
    fn buffer_evicts_oldest() {
        let mut buffer = RingBuffer::new(3);
        for i in 0..5 {
            buffer.push(entry(&format!("line {i}")));
        }
        let messages: Vec<_> = buffer.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut buffer = RingBuffer::new(0);
        buffer.push(entry("a"));
        buffer.push(entry("b"));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.snapshot()[0].message, "b");
    }

    #[test]
    fn logger_filters_by_level() {
        let logger = RollingLogger::new(10, LevelFilter::Warn);
        logger.log(&Record::builder().level(Level::Info).target("app").args(format_args!("skipped")).build());
        logger.log(&Record::builder().level(Level::Error).target("app").args(format_args!("kept {}", 1)).build());
        let recent = logger.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message, "kept 1");
        assert_eq!(recent[0].level, Level::Error);
        logger.clear();
        assert!(logger.recent().is_empty());
    }

    #[test]
    fn display_contains_level_and_target() {
        let line = entry("hello").to_string();
        assert!(line.contains("INFO"));
        assert!(line.ends_with("[test] hello"));
    }
}
