//! Debug-only reentrancy guard.
//!
//! `ChainedHashSet` calls into user code (`Hash`, `Eq`) while its anchors
//! and links are being read or rewritten. If that code reaches back into
//! the same set, the set must not observe itself half-updated. In debug
//! builds a second `enter` on the same tracker panics; in release builds
//! the guard is empty.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-set reentrancy tracker. Public entry points take
/// `let _g = self.reentrancy.enter();` before touching user code.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<bool>,
    // Same auto traits in every build: Send, never Sync.
    _not_sync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(false),
            _not_sync: PhantomData,
        }
    }

    /// Mark the owner busy until the returned guard drops.
    ///
    /// Panics in debug builds if the owner is already busy.
    #[inline]
    #[allow(clippy::needless_return)]
    pub(crate) fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.active.replace(true),
                "reentrancy detected: set accessed from its own Hash/Eq"
            );
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _owner: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

// A clone is a fresh, idle tracker; busy state belongs to one instance.
impl Clone for DebugReentrancy {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// RAII guard returned by [`DebugReentrancy::enter`].
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let was_active = self.owner.active.replace(false);
            debug_assert!(was_active);
        }
    }
}
