use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared counters describing what a [`Sink`] has written.
///
/// One instance is shared by a sink and all of its clones.
#[derive(Debug, Default)]
pub struct SinkStats {
    /// Complete records written.
    pub records_written: AtomicU64,
    /// Bytes written across all records.
    pub bytes_written: AtomicU64,
    /// Writes that returned an error.
    pub write_failures: AtomicU64,
}

struct Shared {
    writer: Mutex<Box<dyn Write + Send>>,
    stats: SinkStats,
}

/// Byte-oriented output shared by a handler and every handler derived
/// from it.
///
/// Cloning a `Sink` clones the handle, not the writer: all clones
/// serialize their writes through the same lock, so records written
/// concurrently never interleave.
#[derive(Clone)]
pub struct Sink {
    shared: Arc<Shared>,
}

impl Sink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Sink {
            shared: Arc::new(Shared {
                writer: Mutex::new(Box::new(writer)),
                stats: SinkStats::default(),
            }),
        }
    }

    pub fn stdout() -> Self {
        Sink::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Sink::new(io::stderr())
    }

    /// Write one fully formatted record while holding the shared lock.
    ///
    /// A lock poisoned by a panicking writer is taken over rather than
    /// reported, so that later records still get out.
    pub fn write_record(&self, buf: &[u8]) -> io::Result<()> {
        let result = {
            let mut writer = self.lock();
            writer.write_all(buf).and_then(|()| writer.flush())
        };

        let stats = &self.shared.stats;
        match &result {
            Ok(()) => {
                stats.records_written.fetch_add(1, Ordering::Relaxed);
                stats.bytes_written.fetch_add(buf.len() as u64, Ordering::Relaxed);
            }
            Err(_) => {
                stats.write_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
        result
    }

    pub fn stats(&self) -> &SinkStats {
        &self.shared.stats
    }

    /// Whether `self` and `other` write through the same lock.
    pub fn same_sink(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.shared
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("stats", &self.shared.stats)
            .finish_non_exhaustive()
    }
}

/// In-memory writer whose clones share one buffer.
///
/// Handy for capturing handler output in tests and tools.
#[derive(Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Drain the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
