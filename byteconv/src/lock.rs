//! Shared exclusion token
//!
//! One reentrant lock is shared by the source, the sink and the converter
//! worker. The worker holds it for a whole drain burst and, while holding
//! it, calls source and sink methods that take the same lock again.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Cloneable handle to a single reentrant lock
///
/// Clones refer to the same lock. Locking is reentrant for the owning
/// thread, so nested `lock()` calls from one thread never deadlock.
#[derive(Clone, Default)]
pub struct ExclusionToken(Arc<ReentrantMutex<()>>);

impl ExclusionToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(ReentrantMutex::new(())))
    }

    /// Acquire the lock; released when the guard is dropped
    #[must_use]
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.0.lock()
    }

    /// Acquire the lock if it is free or already owned by this thread
    #[must_use]
    pub fn try_lock(&self) -> Option<ReentrantMutexGuard<'_, ()>> {
        self.0.try_lock()
    }

    /// Check whether two tokens refer to the same lock
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ExclusionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusionToken")
            .field("lock", &Arc::as_ptr(&self.0))
            .field("is_locked", &self.0.is_locked())
            .finish()
    }
}

/// Slot for a token injected after construction
///
/// Both injecting twice and using the slot before injection are contract
/// violations and panic.
#[derive(Default)]
pub struct TokenSlot {
    token: OnceLock<ExclusionToken>,
    owner: &'static str,
}

impl TokenSlot {
    /// `owner` names the holder in panic messages
    #[must_use]
    pub const fn new(owner: &'static str) -> Self {
        Self {
            token: OnceLock::new(),
            owner,
        }
    }

    /// # Panics
    /// Panics if a token was already injected
    pub fn inject(&self, token: ExclusionToken) {
        if self.token.set(token).is_err() {
            panic!("{}: exclusion token is already set", self.owner);
        }
    }

    /// # Panics
    /// Panics if no token was injected yet
    #[must_use]
    pub fn get(&self) -> &ExclusionToken {
        self.token
            .get()
            .unwrap_or_else(|| panic!("{}: exclusion token is not set", self.owner))
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.token.get().is_some()
    }
}

impl fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSlot")
            .field("owner", &self.owner)
            .field("token", &self.token.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_lock() {
        let token = ExclusionToken::new();
        let clone = token.clone();
        assert!(token.same_as(&clone));
        assert!(!token.same_as(&ExclusionToken::new()));
    }

    #[test]
    fn test_reentrant() {
        let token = ExclusionToken::new();
        let clone = token.clone();
        let _outer = token.lock();
        let _inner = clone.lock();
    }

    #[test]
    fn test_slot_inject_and_get() {
        let slot = TokenSlot::new("test");
        assert!(!slot.is_set());
        let token = ExclusionToken::new();
        slot.inject(token.clone());
        assert!(slot.is_set());
        assert!(slot.get().same_as(&token));
    }

    #[test]
    #[should_panic(expected = "exclusion token is not set")]
    fn test_slot_get_before_inject() {
        let slot = TokenSlot::new("test");
        let _ = slot.get();
    }

    #[test]
    #[should_panic(expected = "exclusion token is already set")]
    fn test_slot_double_inject() {
        let slot = TokenSlot::new("test");
        slot.inject(ExclusionToken::new());
        slot.inject(ExclusionToken::new());
    }
}
