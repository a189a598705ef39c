//! Held permits and their delayed release.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use super::{PermitPool, deadline_after};

/// A permit taken from the pool by an admitted call.
///
/// Dropping it schedules exactly one release of one permit at
/// `acquired_at + release_delay`, on every exit path of the call (success,
/// error or panic). The release runs on a detached task and is not affected by
/// shutting the client down.
#[must_use = "dropping the permit schedules its release"]
pub struct HeldPermit {
    pool: Arc<PermitPool>,
    pending: Arc<AtomicUsize>,
    acquired_at: Instant,
    release_delay: Duration,
}

impl HeldPermit {
    pub(crate) fn new(
        pool: Arc<PermitPool>,
        pending: Arc<AtomicUsize>,
        release_delay: Duration,
    ) -> Self {
        pending.fetch_add(1, Ordering::AcqRel);
        Self {
            pool,
            pending,
            acquired_at: Instant::now(),
            release_delay,
        }
    }

    pub fn acquired_at(&self) -> Instant {
        self.acquired_at
    }

    /// When the permit will be returned to the pool.
    pub fn release_at(&self) -> Instant {
        deadline_after(self.acquired_at, self.release_delay)
    }
}

impl Drop for HeldPermit {
    fn drop(&mut self) {
        let pool = Arc::clone(&self.pool);
        let pending = Arc::clone(&self.pending);
        let release_at = self.release_at();

        let release = move || {
            pool.release(1);
            pending.fetch_sub(1, Ordering::AcqRel);
            tracing::debug!(available = pool.available(), "Permit released");
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                // A runtime that is already shutting down accepts this task but
                // never polls it; the permit is then lost along with the pool.
                tracing::debug!(release_at = ?release_at, "Scheduling delayed permit release");
                handle.spawn(async move {
                    tokio::time::sleep_until(release_at).await;
                    release();
                });
            }
            Err(_) => {
                tracing::warn!("No runtime to schedule delayed permit release - releasing now");
                release();
            }
        }
    }
}

impl std::fmt::Debug for HeldPermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeldPermit")
            .field("acquired_at", &self.acquired_at)
            .field("release_delay", &self.release_delay)
            .finish()
    }
}
