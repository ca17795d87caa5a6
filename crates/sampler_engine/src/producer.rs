//! Proposal producer: uniform variates in, proposal batches out.

use tracing::trace;

use crate::context::SamplingContext;
use crate::gate::ExclusiveGate;
use crate::problem::SamplingProblem;
use crate::queue::BatchQueue;
use crate::rng::UniformSource;

/// Counters reported by the producer when it exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProducerStats {
    /// Batches accepted by the queue.
    pub batches: u64,
    /// Proposals generated, including a final discarded batch.
    pub proposals: u64,
}

/// Runs the producer loop until termination is signalled.
///
/// Each iteration draws `B` uniforms, maps them through the proposal
/// generator inside one gate acquisition, leaves the gate and pushes the
/// batch. A batch still in flight when termination is observed is dropped
/// by the queue; no batch is started after the loop test sees the signal.
pub fn run_producer<Q, Gt, P, U>(
    ctx: &SamplingContext<'_, Q, Gt, P>,
    mut uniforms: U,
) -> ProducerStats
where
    Q: BatchQueue,
    Gt: ExclusiveGate,
    P: SamplingProblem,
    U: UniformSource,
{
    let problem = ctx.problem();
    let mut variates = vec![0.0; ctx.batch_size()];
    let mut stats = ProducerStats::default();

    while !ctx.queue().is_terminated() {
        uniforms.fill_uniform(&mut variates);

        let batch: Vec<f64> = ctx
            .gate()
            .with_exclusive(|| variates.iter().map(|&u| problem.propose(u)).collect());
        stats.proposals += batch.len() as u64;

        if !ctx.queue().push_batch(batch) {
            break;
        }
        stats.batches += 1;
        trace!(batch = stats.batches, "proposal batch queued");
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplerConfig;
    use crate::gate::MutexGate;
    use crate::problem::RejectionProblem;
    use crate::queue::CondvarQueue;
    use crate::rng::SamplerRng;
    use crate::signal::TerminationReason;

    #[test]
    fn test_producer_stops_when_terminated_upfront() {
        let config = SamplerConfig::builder().batch_size(4).build().unwrap();
        let problem =
            RejectionProblem::new(|_x: f64| 1.0, |_x: f64| 1.0, |u: f64| u, 1.0).unwrap();
        let gate = MutexGate::new();
        let ctx = SamplingContext::new(CondvarQueue::new(4), &gate, &problem, &config);

        ctx.queue().terminate(TerminationReason::Completed);
        let stats = run_producer(&ctx, SamplerRng::from_seed(1));

        assert_eq!(stats, ProducerStats::default());
        assert_eq!(gate.acquisitions(), 0);
    }

    #[test]
    fn test_producer_maps_uniforms_through_sampler() {
        let config = SamplerConfig::builder().batch_size(8).build().unwrap();
        let problem =
            RejectionProblem::new(|_x: f64| 1.0, |_x: f64| 1.0, |u: f64| 10.0 + u, 1.0).unwrap();
        let gate = MutexGate::new();
        let ctx = SamplingContext::new(CondvarQueue::new(8), &gate, &problem, &config);

        let (stats, batch) = std::thread::scope(|s| {
            let producer = s.spawn(|| run_producer(&ctx, SamplerRng::from_seed(9)));
            let batch = ctx.queue().pop_batch(8);
            ctx.queue().terminate(TerminationReason::Completed);
            (producer.join().unwrap(), batch)
        });

        assert_eq!(batch.len(), 8);
        assert!(batch.iter().all(|&x| (10.0..11.0).contains(&x)));

        // Same stream, same proposals.
        let mut rng = SamplerRng::from_seed(9);
        let expected: Vec<f64> = (0..8).map(|_| 10.0 + rng.gen_uniform()).collect();
        assert_eq!(batch, expected);

        // One gate acquisition per generated batch.
        assert_eq!(gate.acquisitions(), stats.proposals / 8);
        assert!(stats.batches >= 1);
    }
}
