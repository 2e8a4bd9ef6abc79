#![forbid(unsafe_code)]

//! `tracing` output routed to the browser console.
//!
//! The `fmt` layer asks for one writer per event; [`ConsoleWriter`] buffers
//! what it is given and hands the finished line to a sink when dropped. The
//! sink is a plain function so the same plumbing runs natively in tests;
//! the wasm build passes one that calls `console.<method>`.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Filter used when the configured one does not parse.
pub const FALLBACK_FILTER: &str = "info";

/// `console` method a line is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Log,
    Debug,
}

impl ConsoleMethod {
    #[must_use]
    pub fn for_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            Level::DEBUG => Self::Log,
            Level::TRACE => Self::Debug,
        }
    }

    /// Property name on the JS `console` object.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Log => "log",
            Self::Debug => "debug",
        }
    }
}

/// Receives one finished log line.
pub trait ConsoleSink: Clone + Send + Sync + 'static {
    fn write_line(&self, method: ConsoleMethod, line: &str);
}

impl<F> ConsoleSink for F
where
    F: Fn(ConsoleMethod, &str) + Clone + Send + Sync + 'static,
{
    fn write_line(&self, method: ConsoleMethod, line: &str) {
        self(method, line);
    }
}

/// Per-event writer; emits its buffered line on drop.
pub struct ConsoleWriter<S: ConsoleSink> {
    method: ConsoleMethod,
    buf: Vec<u8>,
    sink: S,
}

impl<S: ConsoleSink> ConsoleWriter<S> {
    fn new(method: ConsoleMethod, sink: S) -> Self {
        Self {
            method,
            buf: Vec::new(),
            sink,
        }
    }
}

impl<S: ConsoleSink> io::Write for ConsoleWriter<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: ConsoleSink> Drop for ConsoleWriter<S> {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let line = text.trim_end_matches(['\n', '\r']);
        if !line.is_empty() {
            self.sink.write_line(self.method, line);
        }
    }
}

/// [`MakeWriter`] choosing the console method from the event level.
#[derive(Debug, Clone)]
pub struct ConsoleMakeWriter<S> {
    sink: S,
}

impl<S: ConsoleSink> ConsoleMakeWriter<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<'a, S: ConsoleSink> MakeWriter<'a> for ConsoleMakeWriter<S> {
    type Writer = ConsoleWriter<S>;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::Log, self.sink.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::for_level(meta.level()), self.sink.clone())
    }
}

/// Parse `directives`, falling back to [`FALLBACK_FILTER`].
#[must_use]
pub fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Plain-text subscriber writing through `sink`: no ANSI, no timestamps.
pub fn subscriber<S: ConsoleSink>(
    directives: &str,
    sink: S,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter::new(sink))
        .with_ansi(false)
        .without_time()
        .with_env_filter(env_filter(directives))
        .finish()
}
