//! `tracing` setup for the demo.
//!
//! Formatted events land in the global [`LogBuffer`](crate::log_buffer::LogBuffer)
//! once one is registered, so the demo can show them in its status bar
//! without printing over the alternate screen. Until then, and in processes
//! that never register one, they go to stderr.

use std::io::{self, Write};

use tracing::Level;

use crate::log_buffer::{LogBufferWriter, global_log_buffer};

/// Where one formatted event is written.
#[derive(Debug)]
pub enum LogSink {
    Buffer(LogBufferWriter),
    Stderr(io::Stderr),
}

impl LogSink {
    /// Chosen per event, so a buffer registered after [`init`] still gets
    /// everything logged from then on.
    pub fn current() -> Self {
        global_log_buffer()
            .map(|buffer| LogSink::Buffer(buffer.writer()))
            .unwrap_or_else(|| LogSink::Stderr(io::stderr()))
    }

    fn target(&mut self) -> &mut dyn Write {
        match self {
            LogSink::Buffer(lines) => lines,
            LogSink::Stderr(stderr) => stderr,
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.target().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.target().flush()
    }
}

/// Install a compact, uncolored fmt subscriber capped at `level`.
///
/// Returns `false` if a global subscriber was already installed; the first
/// one stays in place.
pub fn init(level: Level) -> bool {
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(LogSink::current)
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_buffer::LogBuffer;

    #[test]
    fn second_init_keeps_first_subscriber() {
        init(Level::DEBUG);
        assert!(!init(Level::TRACE));
        tracing::debug!("still logging after a second init");
    }

    #[test]
    fn sink_is_stderr_until_a_buffer_is_registered() {
        let mut sink = LogSink::current();
        assert!(matches!(sink, LogSink::Stderr(_)));
        assert_eq!(sink.write(b"").unwrap(), 0);
        sink.flush().unwrap();
    }

    #[test]
    fn buffer_sink_splits_lines() {
        let buffer = LogBuffer::new(4);
        let mut sink = LogSink::Buffer(buffer.writer());
        sink.write_all(b"drag started\ndrag en").unwrap();
        assert_eq!(buffer.tail(4), vec!["drag started".to_string()]);
        sink.write_all(b"ded\n").unwrap();
        assert_eq!(buffer.last().as_deref(), Some("drag ended"));
    }
}
