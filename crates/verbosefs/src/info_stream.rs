//! Info streams: destinations for audit records
//!
//! A record is rendered completely in memory and handed to the sink in a
//! single write, so records from concurrent threads never interleave:
//!
//! ```text
//! FS 0 [2025-01-01T12:00:00.000Z; worker-3]: delete: /data/segments_4
//! 	at app::index::IndexWriter::purge(./src/index.rs:88)
//! 	at app::main(./src/main.rs:12)
//! ```

use crate::error::{Error, Result};
use crate::stack::{FrameFilter, FrameRule, StackFrame};
use chrono::{SecondsFormat, Utc};
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Frames inside this module never appear in records
pub const FRAME_RULE: FrameRule = FrameRule::component(module_path!());

// Stream ids, unique per process
static MESSAGE_ID: AtomicU64 = AtomicU64::new(0);

/// Receives messages tagged with a component name
pub trait InfoStream: Send + Sync {
    /// Whether messages for `component` are wanted at all
    fn is_enabled(&self, component: &str) -> bool;

    /// Record one message
    fn message(&self, component: &str, message: &str) -> Result<()>;

    /// Release the underlying destination
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Where a `PrintStreamInfoStream` writes
pub enum Sink {
    Stdout,
    Stderr,
    Writer(Box<dyn Write + Send>),
}

enum SinkState {
    Stdout,
    Stderr,
    Writer(Mutex<Option<Box<dyn Write + Send>>>),
}

/// `InfoStream` that prints each record, with its call stack, to a sink.
pub struct PrintStreamInfoStream {
    message_id: u64,
    sink: SinkState,
    filter: FrameFilter,
}

impl PrintStreamInfoStream {
    /// Create a stream with the next process-wide stream id
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self::with_id(sink, MESSAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn with_id(sink: Sink, message_id: u64) -> Self {
        let sink = match sink {
            Sink::Stdout => SinkState::Stdout,
            Sink::Stderr => SinkState::Stderr,
            Sink::Writer(w) => SinkState::Writer(Mutex::new(Some(w))),
        };
        Self {
            message_id,
            sink,
            filter: FrameFilter::audit(),
        }
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Sink::Stdout)
    }

    #[must_use]
    pub fn to_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::new(Sink::Writer(Box::new(writer)))
    }

    /// Replace the frame filter
    #[must_use]
    pub fn with_filter(mut self, filter: FrameFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn message_id(&self) -> u64 {
        self.message_id
    }

    /// True for stdout and stderr, which `close` leaves open
    #[must_use]
    pub fn is_system_stream(&self) -> bool {
        matches!(self.sink, SinkState::Stdout | SinkState::Stderr)
    }

    /// Current time for insertion into records
    #[must_use]
    pub fn timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Render one complete record
    #[must_use]
    pub fn render(&self, component: &str, message: &str, frames: &[StackFrame]) -> String {
        let current = std::thread::current();
        let thread_name = match current.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", current.id()),
        };

        let mut record = format!(
            "{} {} [{}; {}]: {}\n",
            component,
            self.message_id,
            Self::timestamp(),
            thread_name,
            message
        );
        for frame in frames {
            record.push_str("\tat ");
            record.push_str(&frame.to_string());
            record.push('\n');
        }
        record
    }

    fn write_record(&self, record: &[u8]) -> Result<()> {
        match &self.sink {
            SinkState::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(record)?;
                out.flush()?;
            }
            SinkState::Stderr => {
                let mut out = std::io::stderr().lock();
                out.write_all(record)?;
                out.flush()?;
            }
            SinkState::Writer(writer) => {
                let mut guard = writer
                    .lock()
                    .map_err(|_| Error::LockPoisoned(self.message_id))?;
                let w = guard
                    .as_mut()
                    .ok_or(Error::StreamClosed(self.message_id))?;
                w.write_all(record)?;
                w.flush()?;
            }
        }
        Ok(())
    }
}

impl InfoStream for PrintStreamInfoStream {
    fn is_enabled(&self, _component: &str) -> bool {
        true
    }

    fn message(&self, component: &str, message: &str) -> Result<()> {
        let frames = self.filter.apply(StackFrame::capture());
        let record = self.render(component, message, &frames);
        self.write_record(record.as_bytes())
    }

    fn close(&self) -> Result<()> {
        match &self.sink {
            SinkState::Stdout => std::io::stdout().flush()?,
            SinkState::Stderr => std::io::stderr().flush()?,
            SinkState::Writer(writer) => {
                let taken = writer
                    .lock()
                    .map_err(|_| Error::LockPoisoned(self.message_id))?
                    .take();
                if let Some(mut w) = taken {
                    w.flush()?;
                }
            }
        }
        Ok(())
    }
}

/// `InfoStream` that wants nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOutputInfoStream;

impl InfoStream for NoOutputInfoStream {
    fn is_enabled(&self, _component: &str) -> bool {
        false
    }

    fn message(&self, _component: &str, _message: &str) -> Result<()> {
        Ok(())
    }
}
