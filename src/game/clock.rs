//! Cancellable fixed-rate simulation clock

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::GameRoom;

/// Handle to the periodic task driving one room's ticks.
///
/// Ticks execute synchronously inside a single task, so two ticks can never
/// overlap; if a tick overruns the period, later firings are skipped rather
/// than queued. After `cancel` returns no further tick body starts, and a
/// tick already executing runs to completion (the body has no await points,
/// so the abort only lands at the timer).
pub struct ClockHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ClockHandle {
    /// Spawn the clock task: first firing after one full period, then at the
    /// fixed period.
    pub fn start(room: Arc<GameRoom>, period: Duration) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let task = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval completes immediately on its first poll; consume that
            // so the first tick lands one full period after start
            timer.tick().await;

            loop {
                timer.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                room.tick();
            }
        });

        debug!(period_ms = period.as_millis() as u64, "simulation clock started");
        Self { cancelled, task }
    }

    pub fn cancel(self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
        debug!("simulation clock cancelled");
    }
}
