//! Set-once termination signal shared by the two sampling workers.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

const RUNNING: u8 = 0;

/// Why a sampling call stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The requested number of samples was accepted.
    Completed,
    /// The per-call timeout elapsed.
    TimedOut,
    /// The proposal budget was spent.
    BudgetExhausted,
    /// A worker panicked.
    WorkerFailed,
}

impl TerminationReason {
    fn encode(self) -> u8 {
        match self {
            Self::Completed => 1,
            Self::TimedOut => 2,
            Self::BudgetExhausted => 3,
            Self::WorkerFailed => 4,
        }
    }

    fn decode(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Completed),
            2 => Some(Self::TimedOut),
            3 => Some(Self::BudgetExhausted),
            4 => Some(Self::WorkerFailed),
            _ => None,
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Completed => "completed",
            Self::TimedOut => "timed out",
            Self::BudgetExhausted => "budget exhausted",
            Self::WorkerFailed => "worker failed",
        };
        f.write_str(label)
    }
}

/// Termination flag written exactly once.
///
/// The first [`set`](Self::set) wins; later calls leave the recorded reason
/// untouched and return `false`. Waking parked workers is the job of the
/// queue that owns the signal (see [`BatchQueue::terminate`]).
///
/// [`BatchQueue::terminate`]: crate::queue::BatchQueue::terminate
///
/// # Examples
///
/// ```rust
/// use sampler_engine::signal::{TerminationReason, TerminationSignal};
///
/// let signal = TerminationSignal::new();
/// assert!(!signal.is_set());
///
/// assert!(signal.set(TerminationReason::Completed));
/// assert!(!signal.set(TerminationReason::TimedOut));
/// assert_eq!(signal.reason(), Some(TerminationReason::Completed));
/// ```
#[derive(Debug, Default)]
pub struct TerminationSignal {
    state: AtomicU8,
}

impl TerminationSignal {
    /// Creates an unset signal.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(RUNNING),
        }
    }

    /// Sets the signal, returning `true` if this call was the one that set it.
    pub fn set(&self, reason: TerminationReason) -> bool {
        self.state
            .compare_exchange(RUNNING, reason.encode(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Returns whether the signal has been set.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.state.load(Ordering::Acquire) != RUNNING
    }

    /// Returns the recorded reason, or `None` while still running.
    pub fn reason(&self) -> Option<TerminationReason> {
        TerminationReason::decode(self.state.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_initially_unset() {
        let signal = TerminationSignal::default();
        assert!(!signal.is_set());
        assert_eq!(signal.reason(), None);
    }

    #[test]
    fn test_reason_round_trip() {
        for reason in [
            TerminationReason::Completed,
            TerminationReason::TimedOut,
            TerminationReason::BudgetExhausted,
            TerminationReason::WorkerFailed,
        ] {
            let signal = TerminationSignal::new();
            assert!(signal.set(reason));
            assert_eq!(signal.reason(), Some(reason));
        }
    }

    #[test]
    fn test_exactly_one_concurrent_setter_wins() {
        let signal = TerminationSignal::new();
        let winners = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for i in 0..8 {
                let signal = &signal;
                let winners = &winners;
                s.spawn(move || {
                    let reason = if i % 2 == 0 {
                        TerminationReason::Completed
                    } else {
                        TerminationReason::TimedOut
                    };
                    if signal.set(reason) {
                        winners.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::Relaxed), 1);
        assert!(signal.is_set());
    }

    #[test]
    fn test_display() {
        assert_eq!(TerminationReason::BudgetExhausted.to_string(), "budget exhausted");
    }
}
