//! Periodic top-up of the permit pool.
//!
//! Every period the cycle releases the pool's deficit, raising it back to
//! capacity regardless of how many delayed releases are still pending. This
//! runs alongside the per-call delayed release, so the two sources can overlap.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::permit::{PermitPool, deadline_after};

/// Owned handle to the background top-up task.
///
/// Stopping is idempotent. Dropping the handle also stops the task.
pub struct ReplenishCycle {
    period: Duration,
    cancel: CancellationToken,
    stopped: AtomicBool,
    task: JoinHandle<()>,
}

impl ReplenishCycle {
    /// Start topping up `pool` every `period` on the current runtime.
    ///
    /// The first top-up fires one period from now; the pool starts full.
    pub fn start(
        handle: &tokio::runtime::Handle,
        pool: Arc<PermitPool>,
        period: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = handle.spawn(async move {
            // Late ticks push the schedule back rather than bursting.
            let mut next_tick = deadline_after(Instant::now(), period);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep_until(next_tick) => {
                        let added = pool.top_up();
                        if added > 0 {
                            tracing::trace!(added, capacity = pool.capacity(), "Permit pool topped up");
                        }
                        next_tick = deadline_after(Instant::now(), period);
                    }
                }
            }
            tracing::debug!("Replenish cycle stopped");
        });

        Self {
            period,
            cancel,
            stopped: AtomicBool::new(false),
            task,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stop the cycle. Returns `false` if it was already stopped.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.cancel.cancel();
        true
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Whether the background task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ReplenishCycle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
