//! Byte-to-symbol converter
//!
//! A background worker drains the source, decodes each byte and appends
//! the resulting symbols to the sink.
//!
//! ```text
//!  producer ──push_byte──▶ ┌────────────┐
//!                          │   Source   │
//!                          └─────┬──────┘
//!                                │ extract_byte   ┐
//!                          ┌─────▼──────┐         │ one burst,
//!                          │   worker   │ decode  │ token held
//!                          └─────┬──────┘         │
//!                                │ push           ┘
//!                          ┌─────▼──────┐
//!  reader ◀──symbols()──── │    Sink    │
//!                          └────────────┘
//! ```
//!
//! # Locking
//!
//! The converter creates one [`ExclusionToken`] and injects it into the
//! source and the sink. The worker holds the token for a whole burst, so
//! a reader that locks the sink sees either none or all of a burst, and
//! the source is never observed with bytes removed but not yet converted.
//!
//! # Polling
//!
//! The worker polls the source and waits `idle_interval` between polls.
//! The wait is a condition variable timeout, so `stop()` interrupts it
//! at once; a burst in progress is always finished first.

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

use crate::config::ConverterConfig;
use crate::decoder::{classify, format_binary};
use crate::error::ConverterError;
use crate::io::{ByteSource, SymbolSink};
use crate::lock::ExclusionToken;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

// ============================================================================
// Run Signal
// ============================================================================

/// Stop flag with a wakeup for the idle wait
struct RunSignal {
    running: Mutex<bool>,
    wake: Condvar,
}

impl RunSignal {
    fn new() -> Self {
        Self {
            running: Mutex::new(true),
            wake: Condvar::new(),
        }
    }

    fn is_running(&self) -> bool {
        *self.running.lock()
    }

    fn stop(&self) {
        *self.running.lock() = false;
        self.wake.notify_all();
    }

    /// Wait up to `interval` or until stopped. Returns whether still running.
    fn idle(&self, interval: Duration) -> bool {
        let mut running = self.running.lock();
        if *running {
            // Timeouts and spurious wakeups are both just the end of the pause
            let _ = self.wake.wait_for(&mut running, interval);
        }
        *running
    }
}

// ============================================================================
// Worker
// ============================================================================

struct Worker<S, K> {
    source: Arc<S>,
    sink: Arc<K>,
    token: ExclusionToken,
    signal: Arc<RunSignal>,
    idle_interval: Duration,
}

impl<S: ByteSource, K: SymbolSink> Worker<S, K> {
    fn run(self) {
        debug!(idle_interval = ?self.idle_interval, "converter worker started");

        // It is assumed that only one consumer is working with the source at a time
        while self.signal.is_running() {
            if !self.source.is_empty_buffer() {
                self.drain();
            }
            if !self.signal.idle(self.idle_interval) {
                break;
            }
        }

        debug!("converter worker exiting");
    }

    /// Convert everything pending in one burst under the token
    fn drain(&self) {
        let _locker = self.token.lock();
        let mut read = 0usize;
        let mut emitted = 0usize;

        while !self.source.is_empty_buffer() {
            let byte = self.source.extract_byte();
            read += 1;
            trace!(byte = %format_binary(byte), "byte read");

            match classify(byte) {
                Ok(symbol) => {
                    self.sink.push(symbol);
                    emitted += 1;
                }
                Err(reason) => {
                    warn!(byte = %format_binary(byte), %reason, "byte skipped");
                }
            }
        }

        debug!(read, emitted, "burst drained");
    }
}

// ============================================================================
// Converter
// ============================================================================

struct ActiveWorker {
    signal: Arc<RunSignal>,
    thread: JoinHandle<()>,
}

/// Background converter from a [`ByteSource`] to a [`SymbolSink`]
///
/// Starts stopped. `run()` starts the worker thread, `stop()` joins it,
/// and dropping the converter stops it. At most one worker exists per
/// converter at any time.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use byteconv::io::{ByteSource, MemSink, MemSource};
/// use byteconv::{Converter, Symbol};
///
/// let source = Arc::new(MemSource::new());
/// let sink = Arc::new(MemSink::new());
/// let mut converter = Converter::new(Arc::clone(&source), Arc::clone(&sink));
///
/// converter.run().unwrap();
/// source.push_byte(0b0110_0110);
/// assert!(converter.wait_drained(Duration::from_secs(5)));
/// converter.stop();
///
/// assert_eq!(sink.snapshot(), vec![Symbol::Char('z')]);
/// ```
pub struct Converter<S: ByteSource + 'static, K: SymbolSink + 'static> {
    source: Arc<S>,
    sink: Arc<K>,
    token: ExclusionToken,
    config: ConverterConfig,
    worker: Option<ActiveWorker>,
}

impl<S: ByteSource + 'static, K: SymbolSink + 'static> Converter<S, K> {
    /// Bind a converter with the default configuration
    ///
    /// # Panics
    /// Panics if the source or the sink already has a token injected.
    #[must_use]
    pub fn new(source: Arc<S>, sink: Arc<K>) -> Self {
        Self::with_config(source, sink, ConverterConfig::default())
    }

    /// Bind a converter: create the shared token and inject it into both ends
    ///
    /// Does not start the worker.
    ///
    /// # Panics
    /// Panics if the source or the sink already has a token injected.
    #[must_use]
    pub fn with_config(source: Arc<S>, sink: Arc<K>, config: ConverterConfig) -> Self {
        let token = ExclusionToken::new();
        source.set_buffer_lock(token.clone());
        sink.set_symbols_lock(token.clone());

        Self {
            source,
            sink,
            token,
            config,
            worker: None,
        }
    }

    /// Start the worker thread
    ///
    /// A running converter is stopped first, then started again.
    ///
    /// # Errors
    /// Returns an error if the OS refuses to spawn the thread. The converter
    /// is stopped in that case.
    pub fn run(&mut self) -> Result<(), ConverterError> {
        if self.worker.is_some() {
            warn!("the converter is already running, it will be restarted");
            self.stop();
        }

        let signal = Arc::new(RunSignal::new());
        let worker = Worker {
            source: Arc::clone(&self.source),
            sink: Arc::clone(&self.sink),
            token: self.token.clone(),
            signal: Arc::clone(&signal),
            idle_interval: self.config.idle_interval(),
        };

        let thread = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || worker.run())
            .map_err(ConverterError::Spawn)?;

        self.worker = Some(ActiveWorker { signal, thread });
        info!(thread = %self.config.thread_name, "the converter is running");
        Ok(())
    }

    /// Stop the worker and wait for it to exit
    ///
    /// Does nothing if the converter is stopped.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        worker.signal.stop();
        if worker.thread.join().is_err() {
            error!("converter worker panicked");
        }
        info!("converter stopped");
    }

    /// Whether a worker was started and not stopped yet
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Wait until every byte pushed so far has been converted
    ///
    /// The source is checked under the token. The worker only extracts
    /// while holding the token, so an empty source seen under the token
    /// means all extracted bytes have reached the sink.
    ///
    /// Returns `false` if the source is still not empty after `timeout`,
    /// which is always the case for pending bytes on a stopped converter.
    #[must_use]
    pub fn wait_drained(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let _locker = self.token.lock();
                if self.source.is_empty_buffer() {
                    return true;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(DRAIN_POLL_INTERVAL);
        }
    }

    #[must_use]
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    #[must_use]
    pub fn sink(&self) -> &Arc<K> {
        &self.sink
    }

    /// The token shared with the source and the sink
    #[must_use]
    pub fn token(&self) -> &ExclusionToken {
        &self.token
    }

    #[must_use]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }
}

impl<S: ByteSource + 'static, K: SymbolSink + 'static> Drop for Converter<S, K> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: ByteSource + 'static, K: SymbolSink + 'static> fmt::Debug for Converter<S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("running", &self.is_running())
            .field("config", &self.config)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_returns_false_after_stop() {
        let signal = RunSignal::new();
        assert!(signal.idle(Duration::from_millis(1)));
        signal.stop();
        assert!(!signal.is_running());
        assert!(!signal.idle(Duration::from_secs(60)));
    }

    #[test]
    fn test_stop_wakes_idle_wait() {
        let signal = Arc::new(RunSignal::new());
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                let started = Instant::now();
                let still_running = signal.idle(Duration::from_secs(60));
                (still_running, started.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        signal.stop();

        let (still_running, elapsed) = waiter.join().unwrap();
        assert!(!still_running);
        assert!(elapsed < Duration::from_secs(30));
    }
}
