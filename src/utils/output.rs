//! Output streams used by the dispatcher
//!
//! Help, version and diagnostics are written through an [`OutputSink`] so that
//! a spawned handler task can report failures and tests can capture output.

use std::{
    fmt,
    io::{self, Write},
    sync::{Arc, Mutex},
};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable, thread-safe text sink
#[derive(Clone)]
pub struct OutputSink {
    writer: SharedWriter,
}

/// In-memory buffer behind [`OutputSink::buffer`]
#[derive(Clone, Default)]
pub struct CapturedOutput {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl OutputSink {
    /// Sink writing to an arbitrary writer
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Sink collecting everything in memory
    pub fn buffer() -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        (Self::new(captured.clone()), captured)
    }

    /// Write a block of text, adding a trailing newline when missing
    pub fn write_block(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let newline = if text.ends_with('\n') { "" } else { "\n" };
        self.write_raw(&format!("{text}{newline}"));
    }

    fn write_raw(&self, text: &str) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        // write failures on the diagnostic stream are dropped
        let _ = writer.write_all(text.as_bytes());
        let _ = writer.flush();
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

impl CapturedOutput {
    /// Everything written so far
    pub fn contents(&self) -> String {
        let bytes = match self.bytes.lock() {
            Ok(bytes) => bytes,
            Err(poisoned) => poisoned.into_inner(),
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("output buffer lock poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
