//! In-memory implementation of SymbolSink

use parking_lot::{ReentrantMutexGuard, RwLock, RwLockReadGuard};
use std::fmt;
use std::ops::Deref;

use super::types::SymbolSink;
use crate::lock::{ExclusionToken, TokenSlot};
use crate::symbol::Symbol;

/// Read-only guard to the collected symbols
///
/// Holds the shared token and provides read-only access to the symbols.
/// Both locks are released when the guard is dropped.
pub struct SymbolsReadGuard<'a> {
    // Field order is drop order: the data lock goes before the token
    symbols: RwLockReadGuard<'a, Vec<Symbol>>,
    _token: ReentrantMutexGuard<'a, ()>,
}

impl Deref for SymbolsReadGuard<'_> {
    type Target = [Symbol];

    fn deref(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl AsRef<[Symbol]> for SymbolsReadGuard<'_> {
    fn as_ref(&self) -> &[Symbol] {
        &self.symbols
    }
}

/// In-memory append-only symbol collection
///
/// # Thread Safety
///
/// Every access first takes the injected token, then a private lock
/// around the vector.
/// - `push()` and `clear()` lock for writing, modify, and release
/// - `symbols()` returns a guard that holds the token and a read lock
///   until dropped
///
/// Reads nest: `len()`, `snapshot()` or another `symbols()` may be called
/// on a thread that already holds a guard. `push()` and `clear()` must not
/// be called while the same thread holds a guard; the write lock would
/// wait for that guard forever.
///
/// # Example
///
/// ```
/// use byteconv::io::{MemSink, SymbolSink};
/// use byteconv::{ExclusionToken, Symbol};
///
/// let sink = MemSink::new();
/// sink.set_symbols_lock(ExclusionToken::new());
/// sink.push(Symbol::Char('a'));
/// sink.push(Symbol::Text("63".to_string()));
///
/// let guard = sink.symbols();
/// assert_eq!(guard.len(), 2);
/// assert_eq!(guard[0], Symbol::Char('a'));
/// ```
pub struct MemSink {
    symbols: RwLock<Vec<Symbol>>,
    token: TokenSlot,
}

impl MemSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            symbols: RwLock::new(Vec::new()),
            token: TokenSlot::new("MemSink"),
        }
    }

    /// Drop all collected symbols
    ///
    /// # Panics
    /// Panics if the token is not injected yet.
    pub fn clear(&self) {
        let _locker = self.token.get().lock();
        self.symbols.write().clear();
    }

    /// # Panics
    /// Panics if the token is not injected yet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols().len()
    }

    /// # Panics
    /// Panics if the token is not injected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols().is_empty()
    }

    /// Copy of the collected symbols
    ///
    /// # Panics
    /// Panics if the token is not injected yet.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Symbol> {
        self.symbols().to_vec()
    }
}

impl Default for MemSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolSink for MemSink {
    type Symbols<'a> = SymbolsReadGuard<'a>;

    fn push(&self, symbol: Symbol) {
        let _locker = self.token.get().lock();
        self.symbols.write().push(symbol);
    }

    fn symbols(&self) -> SymbolsReadGuard<'_> {
        let token = self.token.get().lock();
        SymbolsReadGuard {
            symbols: self.symbols.read_recursive(),
            _token: token,
        }
    }

    fn set_symbols_lock(&self, token: ExclusionToken) {
        self.token.inject(token);
    }
}

impl fmt::Debug for MemSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemSink")
            .field("symbols", &self.symbols.read_recursive().len())
            .field("token", &self.token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injected() -> MemSink {
        let sink = MemSink::new();
        sink.set_symbols_lock(ExclusionToken::new());
        sink
    }

    #[test]
    fn test_new_sink_is_empty() {
        let sink = injected();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_push_keeps_order() {
        let sink = injected();
        sink.push(Symbol::from("63"));
        sink.push(Symbol::Char('z'));
        sink.push(Symbol::from("25"));

        assert_eq!(
            sink.snapshot(),
            vec![Symbol::from("63"), Symbol::Char('z'), Symbol::from("25")]
        );
    }

    #[test]
    fn test_clear() {
        let sink = injected();
        sink.push(Symbol::Char('a'));
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_guard_deref_and_as_ref() {
        let sink = injected();
        sink.push(Symbol::Char('e'));

        let guard = sink.symbols();
        assert_eq!(guard.first(), Some(&Symbol::Char('e')));
        let slice: &[Symbol] = guard.as_ref();
        assert_eq!(slice.len(), 1);
    }

    #[test]
    fn test_guard_holds_token() {
        let token = ExclusionToken::new();
        let sink = MemSink::new();
        sink.set_symbols_lock(token.clone());

        let guard = sink.symbols();
        let other = std::thread::spawn(move || token.try_lock().is_some());
        assert!(!other.join().unwrap());
        drop(guard);
    }

    #[test]
    fn test_reads_nest_under_held_guard() {
        let sink = injected();
        sink.push(Symbol::Char('a'));
        sink.push(Symbol::from("41"));

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let sink = std::sync::Arc::new(sink);
        let reader = {
            let sink = std::sync::Arc::clone(&sink);
            std::thread::spawn(move || {
                let guard = sink.symbols();
                let nested = (sink.len(), sink.is_empty(), sink.snapshot());
                let inner_len = sink.symbols().len();
                drop(guard);
                let _ = done_tx.send((nested, inner_len));
            })
        };

        let (nested, inner_len) = done_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("nested read under a held guard did not finish");
        reader.join().unwrap();
        assert_eq!(
            nested,
            (2, false, vec![Symbol::Char('a'), Symbol::from("41")])
        );
        assert_eq!(inner_len, 2);
    }

    #[test]
    #[should_panic(expected = "exclusion token is not set")]
    fn test_read_before_injection_panics() {
        let sink = MemSink::new();
        let _ = sink.symbols();
    }
}
