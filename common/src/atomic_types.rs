//! Lock-free primitives for state shared across the hot path.
//!
//! The single-flight invariant (spec §4) is enforced with [`AtomicFlag`]
//! rather than a mutex so that a busy check never blocks behind whatever
//! else holds the controller's state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Atomic counter for metrics (hot path safe).
#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicU64,
}

impl AtomicCounter {
    pub fn new() -> Self {
        Self { value: AtomicU64::new(0) }
    }

    pub fn increment(&self) -> u64 {
        self.value.fetch_add(1, Ordering::Relaxed)
    }

    pub fn add(&self, delta: u64) -> u64 {
        self.value.fetch_add(delta, Ordering::Relaxed)
    }

    pub fn load(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn reset(&self) -> u64 {
        self.value.swap(0, Ordering::Relaxed)
    }
}

/// Atomic boolean used to enforce the controller's single-flight invariant:
/// at most one opportunity is ever admitted at a time.
#[derive(Debug)]
pub struct AtomicFlag {
    flag: AtomicBool,
}

impl AtomicFlag {
    pub fn new(initial: bool) -> Self {
        Self { flag: AtomicBool::new(initial) }
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Atomically claims the flag, returning `true` only if it was unset.
    /// This is the single-flight admission check: callers that lose the
    /// race get `false` and must reject the opportunity as `Busy`.
    pub fn try_claim(&self) -> bool {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
