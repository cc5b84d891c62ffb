//! Rolling Logger
//!
//! A `log` backend for browser applications. Records go to the devtools
//! console at the matching level, and the most recent formatted lines are
//! kept in a circular buffer so the app can surface them for diagnostics.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use wasm_bindgen::JsValue;

/// Default number of lines kept in memory
pub const DEFAULT_CAPACITY: usize = 500;

/// Fixed-size line buffer; the oldest line is dropped when full.
#[derive(Debug)]
pub struct RingBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Where formatted lines are written besides the ring buffer
type Sink = fn(Level, &str);

pub struct RollingLogger {
    level: LevelFilter,
    buffer: Mutex<RingBuffer>,
    sink: Sink,
}

impl RollingLogger {
    pub fn new(level: LevelFilter, capacity: usize) -> Self {
        Self::with_sink(level, capacity, console_sink)
    }

    fn with_sink(level: LevelFilter, capacity: usize, sink: Sink) -> Self {
        Self {
            level,
            buffer: Mutex::new(RingBuffer::new(capacity)),
            sink,
        }
    }

    pub fn recent_lines(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|buffer| buffer.lines())
            .unwrap_or_default()
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
        let line = format_line(
            &chrono::Utc::now().format("%H:%M:%S%.3f").to_string(),
            record.level(),
            &record.args().to_string(),
        );
        (self.sink)(record.level(), &line);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(line);
        }
    }

    fn flush(&self) {}
}

fn format_line(timestamp: &str, level: Level, message: &str) -> String {
    format!("{} {:<5} {}", timestamp, level, message)
}

fn console_sink(level: Level, line: &str) {
    let value = JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the global logger. Calling it twice returns the `log` error.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(level, DEFAULT_CAPACITY));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Lines captured by the global logger, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(RollingLogger::recent_lines).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discard(_: Level, _: &str) {}

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut buffer = RingBuffer::new(2);
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        buffer.push("c".to_string());
        assert_eq!(buffer.lines(), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let mut buffer = RingBuffer::new(0);
        buffer.push("only".to_string());
        buffer.push("latest".to_string());
        assert_eq!(buffer.lines(), vec!["latest".to_string()]);
    }

    #[test]
    fn test_logger_filters_by_level() {
        let logger = RollingLogger::with_sink(LevelFilter::Info, 10, discard);
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("[ROUTER] shown"))
                .build(),
        );
        let lines = logger.recent_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].ends_with("[ROUTER] shown"));
    }

    #[test]
    fn test_format_line_pads_level() {
        assert_eq!(format_line("10:00:00.000", Level::Info, "hi"), "10:00:00.000 INFO  hi");
    }
}
