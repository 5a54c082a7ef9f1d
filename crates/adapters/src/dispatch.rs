use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use log::error;

type Wake = Arc<dyn Fn() + Send + Sync>;

/// Runs blocking jobs on short-lived worker threads and queues their results
/// for the owning (UI) thread. Jobs never wait on each other, so completion
/// order is arbitrary.
pub struct RequestDispatcher<T: Send + 'static> {
    result_tx: mpsc::Sender<T>,
    result_rx: mpsc::Receiver<T>,
    in_flight: Arc<AtomicUsize>,
    wake: Wake,
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<T: Send + 'static> RequestDispatcher<T> {
    /// `wake` runs on the worker thread after each result is queued.
    pub fn new(wake: impl Fn() + Send + Sync + 'static) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        Self {
            result_tx,
            result_rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
            wake: Arc::new(wake),
        }
    }

    pub fn spawn<F>(&self, name: &str, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let result_tx = self.result_tx.clone();
        let wake = Arc::clone(&self.wake);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        let spawned = thread::Builder::new()
            .name(format!("brick-review-{name}"))
            .spawn(move || {
                let result = job();
                let sent = result_tx.send(result).is_ok();
                // Queue first: zero in flight means every result is already in the channel.
                drop(guard);
                if sent {
                    wake();
                }
            });
        if let Err(spawn_error) = spawned {
            error!("failed to start {name} worker: {spawn_error}");
        }
    }

    /// Everything that finished since the last call.
    pub fn drain(&self) -> Vec<T> {
        self.result_rx.try_iter().collect()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn results_arrive_in_any_order_and_wake_the_owner() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let dispatcher = RequestDispatcher::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for value in 0..3_u32 {
            dispatcher.spawn("test", move || {
                thread::sleep(Duration::from_millis(u64::from(30 - value * 10)));
                value
            });
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut results = Vec::new();
        while results.len() < 3 {
            assert!(Instant::now() < deadline, "timed out waiting for workers");
            results.extend(dispatcher.drain());
            thread::sleep(Duration::from_millis(5));
        }
        results.sort_unstable();
        assert_eq!(results, vec![0, 1, 2]);

        while dispatcher.in_flight() > 0 || wakes.load(Ordering::SeqCst) < 3 {
            assert!(Instant::now() < deadline, "timed out waiting for wakes");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn drain_is_empty_when_idle() {
        let dispatcher: RequestDispatcher<u8> = RequestDispatcher::new(|| {});
        assert!(dispatcher.drain().is_empty());
        assert_eq!(dispatcher.in_flight(), 0);
    }
}
