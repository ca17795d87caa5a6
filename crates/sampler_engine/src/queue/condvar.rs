//! Wait/notify backend: one mutex, one condition variable per side.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use super::{BatchQueue, QueueState, QueueStats};
use crate::signal::{TerminationReason, TerminationSignal};

/// Batch queue that parks waiting workers on condition variables.
///
/// Waits use [`Condvar::wait_while`], so the predicate is re-checked after
/// every wake-up, spurious or not. The termination signal is set while the
/// mutex is held, which closes the window between a worker checking its
/// predicate and going to sleep.
///
/// # Examples
///
/// ```rust
/// use sampler_engine::queue::{BatchQueue, CondvarQueue};
///
/// let queue = CondvarQueue::new(2);
/// assert!(queue.push_batch(vec![1.0, 2.0]));
/// assert_eq!(queue.pop_batch(2), vec![1.0, 2.0]);
/// ```
#[derive(Debug)]
pub struct CondvarQueue {
    threshold: usize,
    state: Mutex<QueueState>,
    /// Producer waits here while the queue is at or above the threshold.
    not_full: Condvar,
    /// Consumer waits here while the queue is below the threshold.
    ready: Condvar,
    signal: TerminationSignal,
}

impl CondvarQueue {
    /// Creates an empty queue with batch threshold `threshold` (at least 1).
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            threshold,
            state: Mutex::new(QueueState::with_capacity(2 * threshold)),
            not_full: Condvar::new(),
            ready: Condvar::new(),
            signal: TerminationSignal::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BatchQueue for CondvarQueue {
    #[inline]
    fn threshold(&self) -> usize {
        self.threshold
    }

    fn push_batch(&self, samples: Vec<f64>) -> bool {
        let guard = self.lock();
        let mut state = self
            .not_full
            .wait_while(guard, |s| s.len() >= self.threshold && !self.signal.is_set())
            .unwrap_or_else(PoisonError::into_inner);

        if self.signal.is_set() {
            return false;
        }
        state.append(samples);
        drop(state);

        self.ready.notify_one();
        true
    }

    fn pop_batch(&self, max: usize) -> Vec<f64> {
        let guard = self.lock();
        let mut state = self
            .ready
            .wait_while(guard, |s| s.len() < self.threshold && !self.signal.is_set())
            .unwrap_or_else(PoisonError::into_inner);

        let batch = state.take(max);
        drop(state);

        self.not_full.notify_one();
        batch
    }

    fn terminate(&self, reason: TerminationReason) -> bool {
        let won = {
            let _state = self.lock();
            self.signal.set(reason)
        };
        self.not_full.notify_all();
        self.ready.notify_all();
        won
    }

    #[inline]
    fn signal(&self) -> &TerminationSignal {
        &self.signal
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn stats(&self) -> QueueStats {
        self.lock().stats()
    }
}
