use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Writer shared by renderers.
///
/// Render callbacks cannot return errors, so the first write failure is kept
/// here and every later write is skipped.
pub struct SharedOutput<W> {
    inner: Arc<Mutex<OutputInner<W>>>,
}

struct OutputInner<W> {
    writer: W,
    error: Option<io::Error>,
}

impl<W> Clone for SharedOutput<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Write> SharedOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(OutputInner {
                writer,
                error: None,
            })),
        }
    }

    /// Write `text` followed by a newline, then flush.
    pub fn emit(&self, text: &str) {
        let mut inner = self.inner.lock();
        if inner.error.is_some() {
            return;
        }
        let result = writeln!(inner.writer, "{}", text).and_then(|()| inner.writer.flush());
        if let Err(err) = result {
            inner.error = Some(err);
        }
    }

    /// Record a failure that happened before anything could be written.
    pub fn fail(&self, err: io::Error) {
        let mut inner = self.inner.lock();
        if inner.error.is_none() {
            inner.error = Some(err);
        }
    }

    pub fn take_error(&self) -> Option<io::Error> {
        self.inner.lock().error.take()
    }

    pub fn with_writer<T>(&self, inspect: impl FnOnce(&W) -> T) -> T {
        inspect(&self.inner.lock().writer)
    }
}
