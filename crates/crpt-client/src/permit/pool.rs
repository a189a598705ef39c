//! Counted permit pool with bounded-wait acquisition.
//!
//! The counter is guarded by a mutex so every acquire, release and top-up is a
//! single indivisible update. Waiters park on a [`Notify`] and re-check the
//! counter whenever capacity is returned. No fairness is provided: any waiter
//! may win the permit after a wakeup.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use super::deadline_after;

pub struct PermitPool {
    capacity: usize,
    available: Mutex<usize>,
    notify: Notify,
}

impl PermitPool {
    /// Create a full pool with `capacity` permits.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: Mutex::new(capacity),
            notify: Notify::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        *self.lock()
    }

    /// Take one permit, waiting up to `timeout` for one to be released.
    ///
    /// Returns `false` if the timeout elapsed without a grant; in that case no
    /// permit was consumed.
    pub async fn try_acquire(&self, timeout: Duration) -> bool {
        let deadline = deadline_after(Instant::now(), timeout);
        loop {
            // Register interest before checking the counter so a release that
            // lands between the check and the wait is not lost.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.take_one() {
                return true;
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                tracing::debug!(waited = ?timeout, "Timed out waiting for permit");
                return false;
            }
        }
    }

    /// Take one permit without waiting.
    pub fn try_acquire_now(&self) -> bool {
        self.take_one()
    }

    /// Return `count` permits, clamped so `available` never exceeds capacity.
    ///
    /// Returns the number of permits actually added.
    pub fn release(&self, count: usize) -> usize {
        let added = {
            let mut available = self.lock();
            let added = count.min(self.capacity - *available);
            *available += added;
            added
        };
        if added > 0 {
            self.notify.notify_waiters();
        }
        added
    }

    /// Release the current deficit (`capacity - available`) in one step.
    ///
    /// The deficit is computed and applied under the same lock, so concurrent
    /// acquires and releases cannot push the counter out of `[0, capacity]`.
    pub fn top_up(&self) -> usize {
        let added = {
            let mut available = self.lock();
            let deficit = self.capacity - *available;
            *available += deficit;
            deficit
        };
        if added > 0 {
            self.notify.notify_waiters();
        }
        added
    }

    fn take_one(&self) -> bool {
        let mut available = self.lock();
        if *available == 0 {
            return false;
        }
        *available -= 1;
        true
    }

    // The counter is a plain integer, so a poisoned lock still holds a valid value.
    fn lock(&self) -> std::sync::MutexGuard<'_, usize> {
        self.available
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for PermitPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermitPool")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .finish()
    }
}
