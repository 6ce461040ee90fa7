//! In-memory implementation of ByteSource

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;

use super::types::ByteSource;
use crate::lock::{ExclusionToken, TokenSlot};

/// In-memory byte queue
///
/// The queue lives behind a private mutex that is only taken while the
/// injected token is held.
///
/// # Example
///
/// ```
/// use byteconv::io::{ByteSource, MemSource};
/// use byteconv::ExclusionToken;
///
/// let source = MemSource::new();
/// source.set_buffer_lock(ExclusionToken::new());
/// source.push_bytes(&[0b0000_0010, 0b0110_0110]);
///
/// assert_eq!(source.extract_byte(), 0b0000_0010);
/// assert_eq!(source.len(), 1);
/// ```
pub struct MemSource {
    buffer: Mutex<VecDeque<u8>>,
    token: TokenSlot,
}

impl MemSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::new()),
            token: TokenSlot::new("MemSource"),
        }
    }

    /// Append a slice under one token acquisition
    ///
    /// The worker can't start a burst in the middle of the slice, so the
    /// whole slice is converted in one burst.
    ///
    /// # Panics
    /// Panics if the token is not injected yet.
    pub fn push_bytes(&self, data: &[u8]) {
        let _locker = self.token.get().lock();
        self.buffer.lock().extend(data.iter().copied());
    }

    /// Number of pending bytes
    ///
    /// # Panics
    /// Panics if the token is not injected yet.
    #[must_use]
    pub fn len(&self) -> usize {
        let _locker = self.token.get().lock();
        self.buffer.lock().len()
    }

    /// Same as [`ByteSource::is_empty_buffer`]
    ///
    /// # Panics
    /// Panics if the token is not injected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_empty_buffer()
    }
}

impl Default for MemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for MemSource {
    fn push_byte(&self, byte: u8) {
        let _locker = self.token.get().lock();
        self.buffer.lock().push_back(byte);
    }

    fn extract_byte(&self) -> u8 {
        let _locker = self.token.get().lock();
        self.buffer
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("MemSource: extract_byte called on an empty buffer"))
    }

    fn is_empty_buffer(&self) -> bool {
        let _locker = self.token.get().lock();
        self.buffer.lock().is_empty()
    }

    fn set_buffer_lock(&self, token: ExclusionToken) {
        self.token.inject(token);
    }
}

impl fmt::Debug for MemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemSource")
            .field("pending", &self.buffer.lock().len())
            .field("token", &self.token)
            .finish()
    }
}

// Writing through a shared reference lets the producer keep an `Arc<MemSource>`
impl embedded_io::ErrorType for &MemSource {
    type Error = Infallible;
}

impl embedded_io::Write for &MemSource {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.push_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injected() -> MemSource {
        let source = MemSource::new();
        source.set_buffer_lock(ExclusionToken::new());
        source
    }

    #[test]
    fn test_fifo_order() {
        let source = injected();
        source.push_byte(1);
        source.push_byte(2);
        source.push_bytes(&[3, 4]);

        let mut out = Vec::new();
        while !source.is_empty_buffer() {
            out.push(source.extract_byte());
        }
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_len_and_empty() {
        let source = injected();
        assert!(source.is_empty());
        source.push_bytes(b"abc");
        assert_eq!(source.len(), 3);
        assert!(!source.is_empty());
    }

    #[test]
    fn test_calls_nest_under_held_token() {
        let token = ExclusionToken::new();
        let source = MemSource::new();
        source.set_buffer_lock(token.clone());

        let _outer = token.lock();
        source.push_byte(7);
        assert_eq!(source.extract_byte(), 7);
    }

    #[test]
    fn test_embedded_io_write() {
        use embedded_io::Write;

        let source = injected();
        let mut writer = &source;
        writer.write_all(&[0b10, 0b110]).unwrap();
        writer.flush().unwrap();
        assert_eq!(source.len(), 2);
    }

    #[test]
    #[should_panic(expected = "empty buffer")]
    fn test_extract_from_empty_panics() {
        let source = injected();
        let _ = source.extract_byte();
    }

    #[test]
    #[should_panic(expected = "exclusion token is not set")]
    fn test_push_before_injection_panics() {
        let source = MemSource::new();
        source.push_byte(0);
    }
}
