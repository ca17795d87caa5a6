//! Shared sample queue between the proposal producer and the consumer.
//!
//! The queue is a FIFO of pending proposals with a batch threshold `B`
//! acting as a flow-control watermark:
//!
//! - the producer waits in [`push_batch`](BatchQueue::push_batch) while the
//!   queue holds `B` or more samples
//! - the consumer waits in [`pop_batch`](BatchQueue::pop_batch) while it
//!   holds fewer than `B`
//!
//! Since the producer only appends below the watermark, the queue never
//! holds more than `2B - 1` samples. At any moment one of the two waits is
//! satisfied, so the pair cannot deadlock.
//!
//! The queue owns the call's [`TerminationSignal`]. Setting it through
//! [`terminate`](BatchQueue::terminate) wakes every parked worker, after
//! which both waits return immediately.
//!
//! # Backends
//!
//! | Backend | Waiting | Type |
//! |---------|---------|------|
//! | `Condvar` | park on condition variable | [`CondvarQueue`] |
//! | `Spin` | busy-wait with backoff | [`SpinQueue`] |

mod condvar;
mod spin;

pub use condvar::CondvarQueue;
pub use spin::SpinQueue;

use std::collections::VecDeque;

use crate::signal::{TerminationReason, TerminationSignal};

/// Counters describing the traffic through a queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Batches appended by the producer.
    pub batches_pushed: u64,
    /// Non-empty batches removed by the consumer.
    pub batches_popped: u64,
    /// Samples appended.
    pub samples_pushed: u64,
    /// Samples removed.
    pub samples_popped: u64,
    /// Largest queue length observed after an append.
    pub peak_len: usize,
}

/// Blocking batch queue contract shared by both backends.
pub trait BatchQueue: Sync {
    /// Returns the batch threshold `B`.
    fn threshold(&self) -> usize;

    /// Appends `samples` in order once the queue is below the threshold.
    ///
    /// Returns `false` without enqueueing if termination was signalled
    /// before the batch could be appended.
    fn push_batch(&self, samples: Vec<f64>) -> bool;

    /// Removes up to `max` samples from the front once the queue holds at
    /// least the threshold.
    ///
    /// After termination this returns whatever is available without
    /// waiting, possibly nothing.
    fn pop_batch(&self, max: usize) -> Vec<f64>;

    /// Sets the termination signal and wakes every waiting worker.
    ///
    /// Returns `true` if this call set the signal.
    fn terminate(&self, reason: TerminationReason) -> bool;

    /// Returns the termination signal owned by this queue.
    fn signal(&self) -> &TerminationSignal;

    /// Returns whether termination has been signalled.
    #[inline]
    fn is_terminated(&self) -> bool {
        self.signal().is_set()
    }

    /// Returns the number of pending samples.
    fn len(&self) -> usize;

    /// Returns whether no samples are pending.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of the traffic counters.
    fn stats(&self) -> QueueStats;
}

/// Lock-protected contents shared by both backends.
#[derive(Debug, Default)]
pub(crate) struct QueueState {
    items: VecDeque<f64>,
    stats: QueueStats,
}

impl QueueState {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            stats: QueueStats::default(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn append(&mut self, samples: Vec<f64>) {
        self.stats.batches_pushed += 1;
        self.stats.samples_pushed += samples.len() as u64;
        self.items.extend(samples);
        self.stats.peak_len = self.stats.peak_len.max(self.items.len());
    }

    pub(crate) fn take(&mut self, max: usize) -> Vec<f64> {
        let count = max.min(self.items.len());
        let batch: Vec<f64> = self.items.drain(..count).collect();
        if !batch.is_empty() {
            self.stats.batches_popped += 1;
            self.stats.samples_popped += batch.len() as u64;
        }
        batch
    }

    #[inline]
    pub(crate) fn stats(&self) -> QueueStats {
        self.stats
    }
}

#[cfg(test)]
mod tests;
