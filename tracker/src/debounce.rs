use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Collapses a burst of calls into a single trailing invocation of the
/// handler, using the value of the last call.
///
/// Built once per controller lifetime and handed the current state as the
/// call argument; rebuilding it per event would defeat the debouncing and
/// risk capturing stale handler state. A newer call supersedes a pending one
/// and restarts the quiet-period timer (last-call-wins, no explicit cancel).
///
/// Must be constructed inside a tokio runtime; the worker task exits when
/// the last `Debouncer` handle is dropped, discarding any pending value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(quiet_period: Duration, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, quiet_period, handler));
        Self { tx }
    }

    /// Fire-and-forget: no result is propagated back to the caller, only
    /// the handler's side effect once the quiet period elapses.
    pub fn call(&self, value: T) {
        let _ = self.tx.send(value);
    }
}

async fn run<T, F, Fut>(mut rx: mpsc::UnboundedReceiver<T>, quiet_period: Duration, handler: F)
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut pending: Option<T> = None;
    loop {
        match pending.take() {
            None => match rx.recv().await {
                Some(value) => pending = Some(value),
                None => break,
            },
            Some(current) => tokio::select! {
                next = rx.recv() => match next {
                    // Superseded: the newer value restarts the timer.
                    Some(value) => pending = Some(value),
                    None => break,
                },
                () = sleep(quiet_period) => handler(current).await,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording_debouncer(
        quiet_period: Duration,
    ) -> (Debouncer<u32>, Arc<Mutex<Vec<u32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer = Debouncer::new(quiet_period, move |value| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().push(value);
            }
        });
        (debouncer, seen)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_one_trailing_call_with_last_value() {
        let (debouncer, seen) = recording_debouncer(Duration::from_secs(5));

        debouncer.call(1);
        debouncer.call(2);
        debouncer.call(3);

        sleep(Duration::from_millis(4_999)).await;
        assert!(seen.lock().is_empty(), "must not fire inside the quiet period");

        sleep(Duration::from_millis(2)).await;
        assert_eq!(*seen.lock(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_each_fire_once() {
        let (debouncer, seen) = recording_debouncer(Duration::from_secs(5));

        debouncer.call(1);
        sleep(Duration::from_secs(6)).await;

        debouncer.call(2);
        debouncer.call(3);
        sleep(Duration::from_secs(6)).await;

        assert_eq!(*seen.lock(), vec![1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn call_inside_quiet_period_restarts_the_timer() {
        let (debouncer, seen) = recording_debouncer(Duration::from_secs(5));

        debouncer.call(1);
        sleep(Duration::from_secs(4)).await;
        debouncer.call(2);
        sleep(Duration::from_secs(4)).await;
        assert!(seen.lock().is_empty());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(*seen.lock(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_debouncer_discards_the_pending_value() {
        let (debouncer, seen) = recording_debouncer(Duration::from_secs(5));

        debouncer.call(1);
        drop(debouncer);
        sleep(Duration::from_secs(10)).await;

        assert!(seen.lock().is_empty());
    }
}
