//! Captures tracing output while the TUI owns the terminal.
//!
//! `LogBuffer` implements `MakeWriter`, so the fmt layer writes complete lines
//! into a bounded queue instead of stderr, where they would tear the screen.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

/// Lines kept between two drains by the log pane.
const DEFAULT_CAPACITY: usize = 500;

/// Bounded, shareable queue of log lines.
#[derive(Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// A poisoned lock still holds valid lines; logging must not panic.
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a line, evicting the oldest when full.
    pub fn push(&self, line: String) {
        let mut lines = self.lock();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Take every queued line, oldest first.
    pub fn drain(&self) -> Vec<String> {
        self.lock().drain(..).collect()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-event writer: splits bytes into lines and pushes them on newline or drop.
pub struct LineWriter {
    target: LogBuffer,
    partial: Vec<u8>,
}

impl LineWriter {
    fn emit(&mut self, bytes: &[u8]) {
        let line = String::from_utf8_lossy(bytes).trim_end().to_string();
        self.target.push(line);
    }
}

impl Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.extend_from_slice(buf);
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            self.emit(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let rest = std::mem::take(&mut self.partial);
            self.emit(&rest);
        }
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            target: self.clone(),
            partial: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let buf = LogBuffer::new();
        buf.push("one".to_string());
        buf.push("two".to_string());
        assert_eq!(buf.drain(), vec!["one", "two"]);
        assert!(buf.drain().is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let buf = LogBuffer::with_capacity(3);
        for i in 0..5 {
            buf.push(format!("line {}", i));
        }
        assert_eq!(buf.drain(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_writer_splits_lines() {
        let buf = LogBuffer::new();
        let mut writer = buf.make_writer();
        write!(writer, "first\nsecond\nthi").unwrap();
        assert_eq!(buf.drain(), vec!["first", "second"]);
        drop(writer);
        assert_eq!(buf.drain(), vec!["thi"]);
    }
}
