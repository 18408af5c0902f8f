//! Fixed-interval refresh

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Fire `refresh` every `period` until the returned handle is aborted
///
/// Each call is spawned on its own task and never awaited by the loop, so a
/// slow fetch does not delay the next tick. The first call fires immediately.
pub fn spawn_refresh<F, Fut>(period: Duration, mut refresh: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            tokio::spawn(refresh());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_refresh_fires_every_period() {
        let calls = Arc::new(AtomicUsize::new(0));

        let handle = {
            let calls = Arc::clone(&calls);
            spawn_refresh(Duration::from_secs(10), move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        // Ticks at 0s, 10s, 20s
        time::sleep(Duration::from_secs(25)).await;
        handle.abort();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refresh_does_not_block_ticks() {
        let started = Arc::new(AtomicUsize::new(0));

        let handle = {
            let started = Arc::clone(&started);
            spawn_refresh(Duration::from_secs(1), move || {
                let started = Arc::clone(&started);
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    time::sleep(Duration::from_secs(60)).await;
                }
            })
        };

        time::sleep(Duration::from_millis(3500)).await;
        handle.abort();

        assert_eq!(started.load(Ordering::SeqCst), 4);
    }
}
