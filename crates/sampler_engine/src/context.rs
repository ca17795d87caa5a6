//! Per-call sampling context shared by the producer and the consumer.
//!
//! A [`SamplingContext`] is built by the orchestrator for exactly one call
//! and dropped when that call returns; nothing in it outlives the call or is
//! shared with another call. Uniform sources are not part of the context:
//! each worker receives its own.

use std::thread::{self, Thread};

use tracing::warn;

use crate::config::SamplerConfig;
use crate::gate::ExclusiveGate;
use crate::problem::SamplingProblem;
use crate::queue::BatchQueue;
use crate::signal::TerminationReason;

/// Queue, gate, problem and limits for one sampling call.
#[derive(Debug)]
pub struct SamplingContext<'a, Q, Gt, P> {
    queue: Q,
    gate: &'a Gt,
    problem: &'a P,
    batch_size: usize,
    max_proposals: Option<u64>,
    check_majorization: bool,
}

impl<'a, Q, Gt, P> SamplingContext<'a, Q, Gt, P>
where
    Q: BatchQueue,
    Gt: ExclusiveGate,
    P: SamplingProblem,
{
    /// Creates a context around a fresh queue.
    pub fn new(queue: Q, gate: &'a Gt, problem: &'a P, config: &SamplerConfig) -> Self {
        Self {
            batch_size: queue.threshold(),
            queue,
            gate,
            problem,
            max_proposals: config.max_proposals(),
            check_majorization: config.check_majorization(),
        }
    }

    /// Returns the shared queue.
    #[inline]
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Returns the exclusive-call gate.
    #[inline]
    pub fn gate(&self) -> &'a Gt {
        self.gate
    }

    /// Returns the problem being sampled.
    #[inline]
    pub fn problem(&self) -> &'a P {
        self.problem
    }

    /// Returns the batch size `B`.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the proposal budget, if any.
    #[inline]
    pub fn max_proposals(&self) -> Option<u64> {
        self.max_proposals
    }

    /// Returns whether acceptance ratios above one are counted.
    #[inline]
    pub fn check_majorization(&self) -> bool {
        self.check_majorization
    }
}

/// Scope guard held by each worker thread.
///
/// On unwind it signals [`TerminationReason::WorkerFailed`] so the other
/// worker is never left waiting on a peer that is gone. It always unparks
/// the orchestrator (if registered) so a timeout watchdog notices the exit.
pub(crate) struct WorkerGuard<'q, Q: BatchQueue> {
    queue: &'q Q,
    role: &'static str,
    notify: Option<Thread>,
}

impl<'q, Q: BatchQueue> WorkerGuard<'q, Q> {
    pub(crate) fn new(queue: &'q Q, role: &'static str) -> Self {
        Self {
            queue,
            role,
            notify: None,
        }
    }

    pub(crate) fn notify_on_exit(mut self, thread: Thread) -> Self {
        self.notify = Some(thread);
        self
    }
}

impl<Q: BatchQueue> Drop for WorkerGuard<'_, Q> {
    fn drop(&mut self) {
        if thread::panicking() {
            warn!(worker = self.role, "sampling worker panicked, terminating call");
            self.queue.terminate(TerminationReason::WorkerFailed);
        }
        if let Some(thread) = self.notify.take() {
            thread.unpark();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::NoopGate;
    use crate::problem::RejectionProblem;
    use crate::queue::CondvarQueue;

    #[test]
    fn test_context_exposes_configuration() {
        let config = SamplerConfig::builder()
            .batch_size(16)
            .max_proposals(1_000)
            .check_majorization(true)
            .build()
            .unwrap();
        let problem =
            RejectionProblem::new(|_x: f64| 1.0, |_x: f64| 1.0, |u: f64| u, 1.0).unwrap();
        let gate = NoopGate;

        let ctx = SamplingContext::new(
            CondvarQueue::new(config.batch_size()),
            &gate,
            &problem,
            &config,
        );

        assert_eq!(ctx.batch_size(), 16);
        assert_eq!(ctx.queue().threshold(), 16);
        assert_eq!(ctx.max_proposals(), Some(1_000));
        assert!(ctx.check_majorization());
        assert!(!ctx.queue().is_terminated());
    }

    #[test]
    fn test_worker_guard_terminates_on_panic() {
        let queue = CondvarQueue::new(1);

        let result = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = WorkerGuard::new(&queue, "producer");
                panic!("callback exploded");
            })
            .join()
        });

        assert!(result.is_err());
        assert_eq!(
            queue.signal().reason(),
            Some(TerminationReason::WorkerFailed)
        );
    }

    #[test]
    fn test_worker_guard_quiet_on_normal_exit() {
        let queue = CondvarQueue::new(1);
        {
            let _guard = WorkerGuard::new(&queue, "consumer");
        }
        assert!(!queue.is_terminated());
    }
}
