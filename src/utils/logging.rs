use chrono::Local;
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries kept in memory for the log overlay
const MAX_LOG_ENTRIES: usize = 500;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for display in the log overlay
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap();
        entries.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap();
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Captures formatted tracing output into the ring buffer and, when
/// `MARKET_INSIGHT_LOG` points at a file, appends there too. stdout is never
/// touched; it belongs to the TUI.
pub struct RingBufferWriter {
    buffer: LogRingBuffer,
    file: Option<PathBuf>,
}

impl RingBufferWriter {
    pub fn new(buffer: LogRingBuffer, file: Option<PathBuf>) -> Self {
        Self { buffer, file }
    }

    fn parse_and_push(&self, message: &str) {
        // The compact format is: "LEVEL target: message"
        let (level, rest) = if let Some(rest) = message.strip_prefix("TRACE ") {
            (Level::TRACE, rest)
        } else if let Some(rest) = message.strip_prefix("DEBUG ") {
            (Level::DEBUG, rest)
        } else if let Some(rest) = message.strip_prefix("INFO ") {
            (Level::INFO, rest)
        } else if let Some(rest) = message.strip_prefix("WARN ") {
            (Level::WARN, rest)
        } else if let Some(rest) = message.strip_prefix("ERROR ") {
            (Level::ERROR, rest)
        } else {
            self.buffer
                .push(LogEntry::new(Level::INFO, "general", message.to_string()));
            return;
        };

        let (target, msg) = match rest.find(':') {
            Some(pos) if !rest[..pos].contains(' ') => (&rest[..pos], rest[pos + 1..].trim()),
            _ => ("general", rest),
        };

        let entry = LogEntry::new(level, target, msg.to_string());
        if let Some(path) = &self.file {
            if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(f, "{}", entry.format_for_display());
            }
        }
        self.buffer.push(entry);
    }
}

impl std::io::Write for RingBufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(message) = std::str::from_utf8(buf) {
            let message = message.trim();
            if !message.is_empty() {
                self.parse_and_push(message);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RingBufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Clone for RingBufferWriter {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            file: self.file.clone(),
        }
    }
}

/// Global log buffer accessible throughout the application
static LOG_BUFFER: OnceLock<LogRingBuffer> = OnceLock::new();

/// Get the global log buffer
pub fn get_log_buffer() -> Option<LogRingBuffer> {
    LOG_BUFFER.get().cloned()
}

/// Initialize tracing into the ring buffer (plus optional file).
/// Safe to call once at startup.
pub fn init_tracing() -> LogRingBuffer {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LogRingBuffer::new();
    LOG_BUFFER.set(buffer.clone()).ok();

    let log_file = std::env::var_os("MARKET_INSIGHT_LOG").map(PathBuf::from);
    let writer = RingBufferWriter::new(buffer.clone(), log_file);

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // entries carry their own timestamps
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!(target: "app", "Logging initialized");
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_drops_oldest_past_capacity() {
        let buffer = LogRingBuffer::new();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            buffer.push(LogEntry::new(Level::INFO, "test", format!("entry {}", i)));
        }
        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);
        let recent = buffer.get_recent(1);
        assert_eq!(recent[0].message, format!("entry {}", MAX_LOG_ENTRIES + 9));
    }

    #[test]
    fn writer_parses_compact_format() {
        let buffer = LogRingBuffer::new();
        let mut writer = RingBufferWriter::new(buffer.clone(), None);
        std::io::Write::write(&mut writer, b"INFO state: Submit #1\n").unwrap();

        let recent = buffer.get_recent(1);
        assert_eq!(recent[0].level, "INFO");
        assert_eq!(recent[0].target, "state");
        assert_eq!(recent[0].message, "Submit #1");
    }
}
