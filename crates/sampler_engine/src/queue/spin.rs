//! Busy-wait backend for latency-sensitive runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_utils::{Backoff, CachePadded};

use super::{BatchQueue, QueueState, QueueStats};
use crate::signal::{TerminationReason, TerminationSignal};

/// Batch queue whose waiting workers spin instead of parking.
///
/// Workers poll an atomic mirror of the queue length and the termination
/// signal, backing off exponentially and then yielding to the scheduler, so
/// a spinning side never starves the other of CPU time. The predicate is
/// re-checked under the lock before any mutation. Nobody ever sleeps, so
/// termination is observed on the next poll without an explicit wake-up.
///
/// # Examples
///
/// ```rust
/// use sampler_engine::queue::{BatchQueue, SpinQueue};
///
/// let queue = SpinQueue::new(1);
/// assert!(queue.push_batch(vec![0.25]));
/// assert_eq!(queue.pop_batch(1), vec![0.25]);
/// ```
#[derive(Debug)]
pub struct SpinQueue {
    threshold: usize,
    state: Mutex<QueueState>,
    /// Length as of the last mutation, readable without the lock.
    len: CachePadded<AtomicUsize>,
    signal: TerminationSignal,
}

impl SpinQueue {
    /// Creates an empty queue with batch threshold `threshold` (at least 1).
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            threshold,
            state: Mutex::new(QueueState::with_capacity(2 * threshold)),
            len: CachePadded::new(AtomicUsize::new(0)),
            signal: TerminationSignal::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BatchQueue for SpinQueue {
    #[inline]
    fn threshold(&self) -> usize {
        self.threshold
    }

    fn push_batch(&self, samples: Vec<f64>) -> bool {
        let backoff = Backoff::new();
        loop {
            if self.signal.is_set() {
                return false;
            }
            if self.len.load(Ordering::Acquire) < self.threshold {
                let mut state = self.lock();
                if self.signal.is_set() {
                    return false;
                }
                if state.len() < self.threshold {
                    state.append(samples);
                    self.len.store(state.len(), Ordering::Release);
                    return true;
                }
            }
            backoff.snooze();
        }
    }

    fn pop_batch(&self, max: usize) -> Vec<f64> {
        let backoff = Backoff::new();
        loop {
            let terminated = self.signal.is_set();
            if terminated || self.len.load(Ordering::Acquire) >= self.threshold {
                let mut state = self.lock();
                if terminated || state.len() >= self.threshold {
                    let batch = state.take(max);
                    self.len.store(state.len(), Ordering::Release);
                    return batch;
                }
            }
            backoff.snooze();
        }
    }

    fn terminate(&self, reason: TerminationReason) -> bool {
        self.signal.set(reason)
    }

    #[inline]
    fn signal(&self) -> &TerminationSignal {
        &self.signal
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    fn stats(&self) -> QueueStats {
        self.lock().stats()
    }
}
