//! Tracing output for the browser build
//!
//! Detectors and the session engine log through `tracing`. This installs a
//! `tracing-subscriber` fmt subscriber whose writer forwards each formatted
//! event to the matching `console` method, so the logs show up in devtools
//! with their level intact.

use std::io;

use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Verbosity of the browser build
pub const DEFAULT_LOG_LEVEL: Level = Level::INFO;

type Sink = fn(Level, &str);

// ============================================================================
// SUBSCRIBER
// ============================================================================

/// Install the console subscriber as the global default
pub(crate) fn init_logging() {
    let subscriber = console_subscriber(ConsoleMakeWriter::default());
    // A re-run module start keeps the subscriber from the first one
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn console_subscriber(writer: ConsoleMakeWriter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(DEFAULT_LOG_LEVEL)
        .with_ansi(false)
        .without_time()
        .finish()
}

// ============================================================================
// CONSOLE WRITER
// ============================================================================

/// Hands the fmt layer one buffered writer per event, tagged with its level
#[derive(Clone, Copy)]
struct ConsoleMakeWriter {
    sink: Sink,
}

impl Default for ConsoleMakeWriter {
    fn default() -> Self {
        Self { sink: console_sink }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO, self.sink)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level(), self.sink)
    }
}

/// Collects one formatted event and emits it when dropped
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
    sink: Sink,
}

impl ConsoleWriter {
    fn new(level: Level, sink: Sink) -> Self {
        Self {
            level,
            buffer: Vec::new(),
            sink,
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            (self.sink)(self.level, line);
        }
    }
}

fn console_sink(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&line),
        Level::WARN => console::warn_1(&line),
        Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tracing::{debug, info, warn};

    thread_local! {
        static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: Level, line: &str) {
        CAPTURED.with(|c| c.borrow_mut().push((level, line.to_string())));
    }

    fn captured() -> Vec<(Level, String)> {
        CAPTURED.with(|c| c.borrow_mut().drain(..).collect())
    }

    #[test]
    fn test_events_reach_the_sink_with_their_level() {
        let subscriber = console_subscriber(ConsoleMakeWriter { sink: capture });
        tracing::subscriber::with_default(subscriber, || {
            warn!(value = 3, "configuration rejected");
            info!("session state change");
            debug!("phase change");
        });

        let lines = captured();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, Level::WARN);
        assert!(lines[0].1.contains("configuration rejected"));
        assert!(lines[0].1.contains("value=3"));
        assert!(!lines[0].1.ends_with('\n'));
        assert_eq!(lines[1].0, Level::INFO);
    }

    #[test]
    fn test_empty_writer_emits_nothing() {
        drop(ConsoleWriter::new(Level::INFO, capture));
        assert!(captured().is_empty());
    }
}
