//! Shared test utilities.
//!
//! [`LogCapture`] installs a thread-local `tracing` subscriber that writes
//! plain-text lines into memory for as long as it is alive.

use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub(crate) struct LogCapture {
    writer: SharedWriter,
    _guard: DefaultGuard,
}

impl LogCapture {
    pub(crate) fn install() -> Self {
        let writer = SharedWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self {
            writer,
            _guard: guard,
        }
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.writer.0.lock().unwrap()).into_owned()
    }
}
