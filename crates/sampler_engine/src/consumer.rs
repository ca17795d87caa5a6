//! Accept/reject consumer: proposal batches in, accepted samples out.

use tracing::{debug, trace, warn};

use crate::context::SamplingContext;
use crate::gate::ExclusiveGate;
use crate::problem::SamplingProblem;
use crate::queue::BatchQueue;
use crate::rng::UniformSource;
use crate::signal::TerminationReason;

/// Counters reported by the consumer when it exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Non-empty batches taken from the queue.
    pub batches: u64,
    /// Proposals put through the accept/reject test.
    pub proposals: u64,
    /// Proposals accepted.
    pub accepted: u64,
    /// Evaluations whose acceptance ratio exceeded one.
    pub majorization_violations: u64,
    /// Evaluations whose acceptance ratio was NaN.
    pub nan_rejections: u64,
}

/// Accepted samples plus the consumer's counters.
#[derive(Clone, Debug, Default)]
pub struct ConsumerOutcome {
    /// Accepted samples in acceptance order.
    pub samples: Vec<f64>,
    /// Consumer counters.
    pub stats: ConsumerStats,
}

#[derive(Default)]
struct BatchTally {
    evaluated: u64,
    accepted: u64,
    violations: u64,
    nans: u64,
}

/// Runs the consumer loop until `requested` samples are accepted or the
/// call is terminated by someone else.
///
/// On success the output holds exactly `requested` samples and the consumer
/// signals [`TerminationReason::Completed`]. When the proposal budget is
/// spent (checked after each batch) it signals
/// [`TerminationReason::BudgetExhausted`] and returns what it has. If the
/// signal was set externally it returns the partial output as soon as it
/// notices.
pub fn run_consumer<Q, Gt, P, U>(
    ctx: &SamplingContext<'_, Q, Gt, P>,
    mut uniforms: U,
    requested: usize,
) -> ConsumerOutcome
where
    Q: BatchQueue,
    Gt: ExclusiveGate,
    P: SamplingProblem,
    U: UniformSource,
{
    let queue = ctx.queue();
    let mut samples = Vec::with_capacity(requested);
    let mut stats = ConsumerStats::default();
    let mut variates = Vec::with_capacity(ctx.batch_size());

    while samples.len() < requested {
        let batch = queue.pop_batch(ctx.batch_size());
        if batch.is_empty() {
            if queue.is_terminated() {
                debug!(
                    accepted = samples.len(),
                    requested, "queue drained after termination"
                );
                return ConsumerOutcome { samples, stats };
            }
            continue;
        }
        stats.batches += 1;

        variates.resize(batch.len(), 0.0);
        uniforms.fill_uniform(&mut variates);

        let remaining = requested - samples.len();
        let tally = ctx.gate().with_exclusive(|| {
            evaluate_batch(ctx, &batch, &variates, remaining, &mut samples)
        });

        if tally.violations > 0 && stats.majorization_violations == 0 {
            warn!(
                "acceptance ratio above 1 observed; f <= k*g does not hold and samples are biased"
            );
        }
        stats.proposals += tally.evaluated;
        stats.accepted += tally.accepted;
        stats.majorization_violations += tally.violations;
        stats.nan_rejections += tally.nans;
        trace!(
            batch = stats.batches,
            accepted = samples.len(),
            requested,
            "proposal batch evaluated"
        );

        if samples.len() == requested {
            break;
        }
        if ctx.max_proposals().is_some_and(|budget| stats.proposals >= budget) {
            queue.terminate(TerminationReason::BudgetExhausted);
            debug!(proposals = stats.proposals, "proposal budget exhausted");
            return ConsumerOutcome { samples, stats };
        }
        if queue.is_terminated() {
            return ConsumerOutcome { samples, stats };
        }
    }

    queue.terminate(TerminationReason::Completed);
    ConsumerOutcome { samples, stats }
}

/// Runs the accept/reject test over one batch, appending accepted samples
/// and stopping as soon as `remaining` have been accepted.
fn evaluate_batch<Q, Gt, P>(
    ctx: &SamplingContext<'_, Q, Gt, P>,
    batch: &[f64],
    variates: &[f64],
    remaining: usize,
    samples: &mut Vec<f64>,
) -> BatchTally
where
    Q: BatchQueue,
    Gt: ExclusiveGate,
    P: SamplingProblem,
{
    let problem = ctx.problem();
    let mut tally = BatchTally::default();

    for (&x, &u) in batch.iter().zip(variates) {
        if tally.accepted as usize == remaining {
            break;
        }
        let ratio = problem.acceptance_ratio(x);
        tally.evaluated += 1;

        if ratio.is_nan() {
            tally.nans += 1;
            continue;
        }
        if ctx.check_majorization() && ratio > 1.0 {
            tally.violations += 1;
        }
        if ratio >= u {
            samples.push(x);
            tally.accepted += 1;
        }
    }

    tally
}
