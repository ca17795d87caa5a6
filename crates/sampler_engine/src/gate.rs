//! Exclusive-call gate around batched callback invocation.
//!
//! Some host environments require that user callbacks run one at a time
//! (for example under a global interpreter lock). The workers enter the gate
//! once per batch, run every callback for that batch inside it, and leave
//! before touching the queue.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Serialisation point for user callbacks.
///
/// `with_exclusive` runs `f` while holding whatever exclusivity the
/// environment requires and releases it before returning.
pub trait ExclusiveGate: Sync {
    /// Runs `f` inside the gate.
    fn with_exclusive<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// Gate for environments without a callback exclusivity constraint.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopGate;

impl ExclusiveGate for NoopGate {
    #[inline]
    fn with_exclusive<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }
}

/// Gate backed by a process-wide style mutex.
///
/// Models a global interpreter lock: at most one batch of callbacks runs at
/// a time across both workers. Acquisitions are counted.
///
/// # Examples
///
/// ```rust
/// use sampler_engine::gate::{ExclusiveGate, MutexGate};
///
/// let gate = MutexGate::new();
/// let value = gate.with_exclusive(|| 2 + 2);
///
/// assert_eq!(value, 4);
/// assert_eq!(gate.acquisitions(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MutexGate {
    lock: Mutex<()>,
    acquisitions: AtomicU64,
}

impl MutexGate {
    /// Creates an unlocked gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times the gate has been entered.
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::Relaxed)
    }
}

impl ExclusiveGate for MutexGate {
    fn with_exclusive<R>(&self, f: impl FnOnce() -> R) -> R {
        // A panicking callback poisons the lock; the unit payload is still valid.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        f()
    }
}

impl<T: ExclusiveGate> ExclusiveGate for &T {
    #[inline]
    fn with_exclusive<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).with_exclusive(f)
    }
}
