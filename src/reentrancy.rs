//! Debug-only reentrancy guard.
//!
//! Key callbacks (`TableKey::table_hash`, `Eq::eq`) are user code that runs
//! while a chain is being walked or relinked. A key that reaches back into
//! the same table from one of those callbacks would observe a half-updated
//! chain. In debug builds the guard panics on such nested entry and names
//! both operations; in release builds it is a zero-sized no-op.

#[cfg(debug_assertions)]
use core::cell::Cell;
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

/// Per-table tracker. Public entry points start with
/// `let _g = self.reentrancy.enter("op");`.
///
/// Holds only a `Cell`, so a table stays `Send` but not `Sync`.
#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
        }
    }

    /// Enter the guarded section for operation `op`.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant call to `{op}` while `{outer}` is in progress");
            }
            self.active.set(Some(op));
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
