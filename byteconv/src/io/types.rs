//! Capability traits for the converter's input and output

use std::ops::Deref;

use crate::lock::ExclusionToken;
use crate::symbol::Symbol;

/// Producer-side FIFO of bytes waiting to be converted
///
/// Every method except `set_buffer_lock` must take the injected token
/// for its own state access. The converter injects the token once, before
/// any other call.
///
/// One producer and one consumer (the converter worker) are assumed.
pub trait ByteSource: Send + Sync {
    /// Append a byte to the tail of the queue
    fn push_byte(&self, byte: u8);

    /// Remove and return the head byte
    ///
    /// # Panics
    /// Implementations panic if the queue is empty.
    fn extract_byte(&self) -> u8;

    /// Check whether no bytes are pending
    fn is_empty_buffer(&self) -> bool;

    /// Inject the shared token. Called exactly once by the converter.
    fn set_buffer_lock(&self, token: ExclusionToken);
}

/// Consumer-side append-only collection of decoded symbols
///
/// `push` and `symbols` must take the injected token. The view returned by
/// `symbols` holds the token until dropped, so a reader blocks while a
/// drain burst is in progress and never sees half of it.
pub trait SymbolSink: Send + Sync {
    /// Read-only view of the collected symbols
    type Symbols<'a>: Deref<Target = [Symbol]>
    where
        Self: 'a;

    /// Append a symbol
    fn push(&self, symbol: Symbol);

    /// Lock the collection for reading
    fn symbols(&self) -> Self::Symbols<'_>;

    /// Inject the shared token. Called exactly once by the converter.
    fn set_symbols_lock(&self, token: ExclusionToken);
}
