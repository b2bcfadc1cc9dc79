//! Log buffer with levels and timestamps.
//!
//! Keeps the most recent entries in a fixed ring so the UI can show them and
//! tests can assert on them. Every entry is also forwarded to the `log` facade.
//!
//! # Usage
//!
//! ```ignore
//! use emm_common::log_buffer::LogBuffer;
//!
//! let mut log = LogBuffer::new();
//! log_info!(log, "System started");
//! log_warn!(log, "Unmatched energy: {} Ws", rest);
//! log_error!(log, "Stray blob at {},{}", x, y);
//! ```

use core::fmt::{self, Write};

use heapless::String;

/// Maximum number of log entries to keep.
pub const LOG_ENTRIES: usize = 16;

/// Maximum characters per log message.
pub const LOG_MSG_LEN: usize = 64;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Get the single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }

    const fn facade_level(self) -> log::Level {
        match self {
            Self::Trace => log::Level::Trace,
            Self::Debug => log::Level::Debug,
            Self::Info => log::Level::Info,
            Self::Warn => log::Level::Warn,
            Self::Error => log::Level::Error,
        }
    }
}

/// A single log entry with level, message, and timestamp.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Message, truncated to `LOG_MSG_LEN - 1` characters.
    pub message: String<LOG_MSG_LEN>,
    /// Simulation time in milliseconds when the entry was recorded.
    pub timestamp_ms: u32,
}

impl LogEntry {
    pub fn new(
        level: LogLevel,
        message: &str,
        timestamp_ms: u32,
    ) -> Self {
        let mut msg: String<LOG_MSG_LEN> = String::new();
        for (i, c) in message.chars().enumerate() {
            if i >= LOG_MSG_LEN - 1 {
                break;
            }
            if msg.push(c).is_err() {
                break;
            }
        }
        Self {
            level,
            message: msg,
            timestamp_ms,
        }
    }
}

/// Circular buffer of log entries. Oldest entries are overwritten.
pub struct LogBuffer {
    entries: [LogEntry; LOG_ENTRIES],
    head: usize, // Next write position
    count: usize,
    now_ms: u32,
}

impl LogBuffer {
    pub const fn new() -> Self {
        Self {
            entries: [const {
                LogEntry {
                    level: LogLevel::Info,
                    message: String::new(),
                    timestamp_ms: 0,
                }
            }; LOG_ENTRIES],
            head: 0,
            count: 0,
            now_ms: 0,
        }
    }

    /// Set the timestamp used for subsequent entries.
    #[inline]
    pub fn set_time(
        &mut self,
        now_ms: u32,
    ) {
        self.now_ms = now_ms;
    }

    /// Push a plain message.
    pub fn push(
        &mut self,
        level: LogLevel,
        message: &str,
    ) {
        self.entries[self.head] = LogEntry::new(level, message, self.now_ms);
        self.head = (self.head + 1) % LOG_ENTRIES;
        if self.count < LOG_ENTRIES {
            self.count += 1;
        }
    }

    /// Format, forward to the `log` facade and store. Used by the `log_*!` macros.
    pub fn record(
        &mut self,
        level: LogLevel,
        args: fmt::Arguments<'_>,
    ) {
        let mut buf: String<LOG_MSG_LEN> = String::new();
        // Overlong messages are cut at the chunk that did not fit
        buf.write_fmt(args).ok();
        log::log!(level.facade_level(), "{}", buf.as_str());
        self.push(level, buf.as_str());
    }

    #[inline]
    pub const fn len(&self) -> usize { self.count }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        let start = if self.count < LOG_ENTRIES { 0 } else { self.head };
        (0..self.count).map(move |i| &self.entries[(start + i) % LOG_ENTRIES])
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&LogEntry> {
        if self.count == 0 {
            None
        } else {
            Some(&self.entries[(self.head + LOG_ENTRIES - 1) % LOG_ENTRIES])
        }
    }

    /// Number of retained entries at `level`.
    pub fn count_level(
        &self,
        level: LogLevel,
    ) -> usize {
        self.iter().filter(|e| e.level == level).count()
    }
}

impl Default for LogBuffer {
    fn default() -> Self { Self::new() }
}

/// Log a message at Info level.
#[macro_export]
macro_rules! log_info {
    ($buf:expr, $($arg:tt)*) => {
        $buf.record($crate::log_buffer::LogLevel::Info, format_args!($($arg)*))
    };
}

/// Log a message at Warn level.
#[macro_export]
macro_rules! log_warn {
    ($buf:expr, $($arg:tt)*) => {
        $buf.record($crate::log_buffer::LogLevel::Warn, format_args!($($arg)*))
    };
}

/// Log a message at Error level.
#[macro_export]
macro_rules! log_error {
    ($buf:expr, $($arg:tt)*) => {
        $buf.record($crate::log_buffer::LogLevel::Error, format_args!($($arg)*))
    };
}

/// Log a message at Debug level.
#[macro_export]
macro_rules! log_debug {
    ($buf:expr, $($arg:tt)*) => {
        $buf.record($crate::log_buffer::LogLevel::Debug, format_args!($($arg)*))
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_len() {
        let mut log = LogBuffer::new();
        assert!(log.is_empty());
        log.push(LogLevel::Info, "Test message");
        assert_eq!(log.len(), 1);
        log_error!(log, "value {}", 42);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().map(|e| e.message.as_str()), Some("value 42"));
        assert_eq!(log.count_level(LogLevel::Error), 1);
    }

    #[test]
    fn test_ring_drops_oldest() {
        let mut log = LogBuffer::new();
        for i in 0..LOG_ENTRIES + 1 {
            log_info!(log, "{}", i);
        }
        assert_eq!(log.len(), LOG_ENTRIES);
        let first = log.iter().next().map(|e| e.message.clone());
        assert_eq!(first.as_deref(), Some("1"));
        let last = log.last().map(|e| e.message.clone());
        assert_eq!(last.as_deref(), Some("16"));
    }

    #[test]
    fn test_truncation() {
        let mut log = LogBuffer::new();
        let long_msg = "This is a very long message that exceeds the maximum line length limit of the buffer";
        log.push(LogLevel::Warn, long_msg);
        let stored = log.last().map(|e| e.message.len()).unwrap_or(0);
        assert!(stored < LOG_MSG_LEN);
        assert!(stored > 0);
    }

    #[test]
    fn test_timestamp() {
        let mut log = LogBuffer::new();
        log.set_time(1234);
        log_warn!(log, "late");
        assert_eq!(log.last().map(|e| e.timestamp_ms), Some(1234));
    }

    #[test]
    fn test_macro_through_reference() {
        fn helper(log: &mut LogBuffer) {
            log_debug!(log, "from {}", "helper");
        }
        let mut log = LogBuffer::new();
        helper(&mut log);
        assert_eq!(log.count_level(LogLevel::Debug), 1);
    }
}
