//! Contract tests run against both queue backends.

use super::*;
use proptest::prelude::*;
use std::thread;
use std::time::Duration;

/// Long enough for a blocked worker to be observed as still blocked.
const SETTLE: Duration = Duration::from_millis(50);

/// Expects `B = 2`: the leftover after the first pop sits below the
/// watermark, so the second push proceeds on the same thread.
fn check_fifo_order<Q: BatchQueue>(queue: Q) {
    assert_eq!(queue.threshold(), 2);
    assert!(queue.push_batch(vec![1.0, 2.0, 3.0]));
    assert_eq!(queue.pop_batch(2), vec![1.0, 2.0]);
    assert!(queue.push_batch(vec![4.0, 5.0, 6.0]));
    assert_eq!(queue.pop_batch(10), vec![3.0, 4.0, 5.0, 6.0]);
    assert!(queue.is_empty());
}

fn check_producer_blocks_at_threshold<Q: BatchQueue>(queue: Q) {
    assert!(queue.push_batch(vec![0.0; 4]));
    assert_eq!(queue.len(), 4);

    thread::scope(|s| {
        let producer = s.spawn(|| queue.push_batch(vec![1.0; 4]));
        thread::sleep(SETTLE);
        assert!(!producer.is_finished(), "producer must wait at the watermark");

        assert_eq!(queue.pop_batch(4).len(), 4);
        assert!(producer.join().unwrap());
    });
    assert_eq!(queue.pop_batch(4), vec![1.0; 4]);
}

fn check_consumer_blocks_below_threshold<Q: BatchQueue>(queue: Q) {
    thread::scope(|s| {
        let consumer = s.spawn(|| queue.pop_batch(3));
        thread::sleep(SETTLE);
        assert!(!consumer.is_finished(), "consumer must wait below the watermark");

        assert!(queue.push_batch(vec![7.0, 8.0, 9.0]));
        assert_eq!(consumer.join().unwrap(), vec![7.0, 8.0, 9.0]);
    });
}

fn check_terminate_wakes_parked_consumer<Q: BatchQueue>(queue: Q) {
    assert!(queue.push_batch(vec![0.5]));
    thread::scope(|s| {
        let consumer = s.spawn(|| queue.pop_batch(8));
        thread::sleep(SETTLE);
        assert!(queue.terminate(TerminationReason::TimedOut));
        assert_eq!(consumer.join().unwrap(), vec![0.5]);
    });
    assert!(queue.pop_batch(8).is_empty());
    assert_eq!(queue.signal().reason(), Some(TerminationReason::TimedOut));
}

fn check_terminate_wakes_parked_producer<Q: BatchQueue>(queue: Q) {
    assert!(queue.push_batch(vec![0.0; 2]));
    thread::scope(|s| {
        let producer = s.spawn(|| queue.push_batch(vec![1.0; 2]));
        thread::sleep(SETTLE);
        assert!(queue.terminate(TerminationReason::Completed));
        assert!(!producer.join().unwrap(), "batch must be discarded after termination");
    });
    assert_eq!(queue.len(), 2);
    assert!(!queue.push_batch(vec![3.0]));
}

fn check_terminate_sets_once<Q: BatchQueue>(queue: Q) {
    assert!(queue.terminate(TerminationReason::BudgetExhausted));
    assert!(!queue.terminate(TerminationReason::Completed));
    assert!(queue.is_terminated());
    assert_eq!(
        queue.signal().reason(),
        Some(TerminationReason::BudgetExhausted)
    );
}

fn check_stress_watermark<Q: BatchQueue>(queue: Q, batch: usize) {
    let total_batches = 2_000;
    let received = thread::scope(|s| {
        s.spawn(|| {
            for i in 0..total_batches {
                let base = (i * batch) as f64;
                let samples: Vec<f64> = (0..batch).map(|j| base + j as f64).collect();
                assert!(queue.push_batch(samples));
            }
        });
        let consumer = s.spawn(|| {
            let expected = total_batches * batch;
            let mut out = Vec::with_capacity(expected);
            while out.len() + queue.threshold() <= expected {
                out.extend(queue.pop_batch(batch));
            }
            out
        });
        let mut out = consumer.join().unwrap();
        queue.terminate(TerminationReason::Completed);
        out.extend(queue.pop_batch(usize::MAX));
        out
    });

    assert_eq!(received.len(), total_batches * batch);
    assert!(received.windows(2).all(|w| w[1] == w[0] + 1.0), "FIFO violated");

    let stats = queue.stats();
    assert!(stats.peak_len <= 2 * batch - 1, "peak {} for B={}", stats.peak_len, batch);
    assert_eq!(stats.samples_pushed, stats.samples_popped);
    assert_eq!(stats.batches_pushed, total_batches as u64);
}

macro_rules! backend_contract_tests {
    ($module:ident, $queue:ty) => {
        mod $module {
            use super::*;

            #[test]
            fn test_fifo_order() {
                check_fifo_order(<$queue>::new(2));
            }

            #[test]
            fn test_producer_blocks_at_threshold() {
                check_producer_blocks_at_threshold(<$queue>::new(4));
            }

            #[test]
            fn test_consumer_blocks_below_threshold() {
                check_consumer_blocks_below_threshold(<$queue>::new(3));
            }

            #[test]
            fn test_terminate_wakes_parked_consumer() {
                check_terminate_wakes_parked_consumer(<$queue>::new(8));
            }

            #[test]
            fn test_terminate_wakes_parked_producer() {
                check_terminate_wakes_parked_producer(<$queue>::new(2));
            }

            #[test]
            fn test_terminate_sets_once() {
                check_terminate_sets_once(<$queue>::new(1));
            }

            #[test]
            fn test_stress_watermark_batch_1() {
                check_stress_watermark(<$queue>::new(1), 1);
            }

            #[test]
            fn test_stress_watermark_batch_64() {
                check_stress_watermark(<$queue>::new(64), 64);
            }
        }
    };
}

backend_contract_tests!(condvar_backend, CondvarQueue);
backend_contract_tests!(spin_backend, SpinQueue);

#[test]
fn test_zero_threshold_is_clamped() {
    assert_eq!(CondvarQueue::new(0).threshold(), 1);
    assert_eq!(SpinQueue::new(0).threshold(), 1);
}

#[test]
fn test_empty_pop_is_not_counted() {
    let queue = CondvarQueue::new(1);
    queue.terminate(TerminationReason::Completed);
    assert!(queue.pop_batch(4).is_empty());
    assert_eq!(queue.stats().batches_popped, 0);
}

proptest! {
    /// Any single-threaded interleaving that respects the watermarks keeps
    /// FIFO order and the `2B - 1` bound.
    #[test]
    fn prop_single_thread_fifo(threshold in 1usize..16, ops in prop::collection::vec(any::<bool>(), 1..64)) {
        let queue = CondvarQueue::new(threshold);
        let mut next = 0.0;
        let mut expected = std::collections::VecDeque::new();

        for push in ops {
            if push && queue.len() < threshold {
                let batch: Vec<f64> = (0..threshold).map(|i| next + i as f64).collect();
                next += threshold as f64;
                expected.extend(batch.iter().copied());
                prop_assert!(queue.push_batch(batch));
            } else if queue.len() >= threshold {
                let popped = queue.pop_batch(threshold);
                let want: Vec<f64> = expected.drain(..popped.len()).collect();
                prop_assert_eq!(popped, want);
            }
            prop_assert!(queue.len() <= 2 * threshold - 1);
        }
    }
}
