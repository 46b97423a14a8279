// ── Operator log ──
//
// The panel's user-facing record of outcomes: a capped list of timestamped
// lines, oldest trimmed first. Every line is mirrored into `tracing` so the
// file log keeps the full history.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use strum::Display;
use tracing::{info, warn};

use crate::config::DEFAULT_LOG_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug)]
pub struct OperatorLog {
    lines: VecDeque<LogLine>,
    capacity: usize,
    /// Total lines ever pushed; lets views detect appends after trimming.
    pushed: u64,
}

impl Default for OperatorLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl OperatorLog {
    /// A log holding at most `capacity` lines (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            pushed: 0,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    pub fn push(&mut self, level: LogLevel, message: String) {
        match level {
            LogLevel::Info => info!(target: "coverly::operator", "{message}"),
            LogLevel::Error => warn!(target: "coverly::operator", "{message}"),
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            at: Local::now(),
            level,
            message,
        });
        self.pushed += 1;
    }

    /// Lines oldest first.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &LogLine> + ExactSizeIterator {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_pushed(&self) -> u64 {
        self.pushed
    }

    /// Message texts oldest first. Mostly useful in tests.
    pub fn messages(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.message.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_oldest_first() {
        let mut log = OperatorLog::with_capacity(3);
        for n in 1..=5 {
            log.info(format!("line {n}"));
        }
        assert_eq!(log.messages(), ["line 3", "line 4", "line 5"]);
        assert_eq!(log.total_pushed(), 5);
    }

    #[test]
    fn keeps_levels() {
        let mut log = OperatorLog::default();
        log.info("System started");
        log.error("WebSocket disconnected");
        assert_eq!(log.capacity(), 20);
        assert_eq!(log.last().unwrap().level, LogLevel::Error);
        assert_eq!(log.lines().next().unwrap().level, LogLevel::Info);
    }

    #[test]
    fn zero_capacity_still_holds_one_line() {
        let mut log = OperatorLog::with_capacity(0);
        log.info("a");
        log.info("b");
        assert_eq!(log.messages(), ["b"]);
    }
}
