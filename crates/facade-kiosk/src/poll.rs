//! Periodic recognition loop.
//!
//! One recognition pass runs immediately on start, then repeats at the
//! configured period. The loop awaits each pass before arming the next
//! tick, so at most one request is ever in flight — a slow network
//! stretches the schedule instead of piling up requests. Stopping only
//! prevents new passes; a pass already in flight runs to completion.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running recognition loop.
pub struct RecognitionTask {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RecognitionTask {
    /// Spawn the loop on the given runtime. `pass` is called once per
    /// tick and awaited to completion.
    pub fn spawn<F, Fut>(rt: &tokio::runtime::Handle, period: Duration, pass: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel, cancelled) = watch::channel(false);
        let handle = rt.spawn(run(period, cancelled, pass));
        Self { cancel, handle }
    }

    /// Stop scheduling new passes. Does not abort an in-flight pass.
    pub fn stop(&self) {
        let _ = self.cancel.send(true);
    }

    /// Whether the loop task has fully exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RecognitionTask {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

async fn run<F, Fut>(period: Duration, mut cancelled: watch::Receiver<bool>, mut pass: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = cancelled.changed() => return,
        }
        if *cancelled.borrow() {
            return;
        }
        pass().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_pass(count: Arc<AtomicUsize>) -> impl FnMut() -> std::future::Ready<()> {
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_pass_is_immediate_then_periodic() {
        let count = Arc::new(AtomicUsize::new(0));
        let task = RecognitionTask::spawn(
            &tokio::runtime::Handle::current(),
            Duration::from_millis(1500),
            counting_pass(count.clone()),
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);

        task.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_passes() {
        let count = Arc::new(AtomicUsize::new(0));
        let task = RecognitionTask::spawn(
            &tokio::runtime::Handle::current(),
            Duration::from_millis(1500),
            counting_pass(count.clone()),
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        task.stop();
        // Well past several intervals: no new passes may run.
        tokio::time::sleep(Duration::from_millis(6000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_pass_completes_after_stop() {
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let (started2, finished2) = (started.clone(), finished.clone());

        let task = RecognitionTask::spawn(
            &tokio::runtime::Handle::current(),
            Duration::from_millis(1500),
            move || {
                started2.fetch_add(1, Ordering::SeqCst);
                let finished = finished2.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(3000)).await;
                    finished.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        // Stop mid-pass: the pass still runs to completion, but no new
        // pass may start afterwards.
        task.stop();
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_pass_never_overlaps() {
        // Pass takes 4s against a 1.5s period: ticks are delayed, never
        // stacked, so at most one pass is in flight at any moment.
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let (in_flight2, max_seen2) = (in_flight.clone(), max_seen.clone());

        let task = RecognitionTask::spawn(
            &tokio::runtime::Handle::current(),
            Duration::from_millis(1500),
            move || {
                let in_flight = in_flight2.clone();
                let max_seen = max_seen2.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(4000)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }
            },
        );

        tokio::time::sleep(Duration::from_millis(20_000)).await;
        task.stop();
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
