// Auto-refresh scheduler - Periodic silent refresh of every tracked server
use crate::application::coordinator_pool::CoordinatorPool;
use crate::application::refresh_coordinator::RefreshMode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const MIN_INTERVAL: Duration = Duration::from_secs(1);

struct TimerHandle {
    interval: Duration,
    stop_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

pub struct AutoRefreshScheduler {
    pool: Arc<CoordinatorPool>,
    timer: Mutex<Option<TimerHandle>>,
}

impl AutoRefreshScheduler {
    pub fn new(pool: Arc<CoordinatorPool>) -> Self {
        Self {
            pool,
            timer: Mutex::new(None),
        }
    }

    /// Arm the timer, cancelling any running one first. The first tick fires
    /// one full interval after the call.
    pub fn start(&self, interval: Duration) {
        self.stop();

        let interval = interval.max(MIN_INTERVAL);
        let (stop_tx, stop_rx) = broadcast::channel(1);
        let task = tokio::spawn(run_refresh_loop(self.pool.clone(), interval, stop_rx));

        tracing::info!("Auto refresh started every {}s", interval.as_secs());
        *self.lock() = Some(TimerHandle {
            interval,
            stop_tx,
            task,
        });
    }

    /// Cancel the timer. Safe to call when already stopped.
    pub fn stop(&self) {
        if let Some(timer) = self.lock().take() {
            let _ = timer.stop_tx.send(());
            drop(timer.task);
            tracing::info!("Auto refresh stopped");
        }
    }

    /// Apply the user's auto-refresh settings with a full stop + start.
    pub fn reconfigure(&self, enabled: bool, interval: Duration) {
        if enabled {
            self.start(interval);
        } else {
            self.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock()
            .as_ref()
            .map(|t| !t.task.is_finished())
            .unwrap_or(false)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.lock().as_ref().map(|t| t.interval)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TimerHandle>> {
        match self.timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for AutoRefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_refresh_loop(
    pool: Arc<CoordinatorPool>,
    period: Duration,
    mut stop_rx: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = stop_rx.recv() => {
                break;
            }
            _ = ticker.tick() => {
                let coordinators = pool.snapshot();
                if coordinators.is_empty() {
                    continue;
                }

                tracing::debug!("Auto refresh tick for {} servers", coordinators.len());

                // Fire and forget, one task per server
                for coordinator in coordinators {
                    tokio::spawn(async move {
                        coordinator.refresh(RefreshMode::Silent).await;
                    });
                }
            }
        }
    }
}
