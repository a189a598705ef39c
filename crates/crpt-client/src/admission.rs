//! Admission gate: decides whether a call may proceed now.
//!
//! The gate waits a fixed, short time for a permit. It never queues beyond that
//! single bounded wait and never retries.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::RateLimitExceeded;
use crate::permit::{HeldPermit, PermitPool};

pub struct AdmissionGate {
    pool: Arc<PermitPool>,
    timeout: Duration,
    release_delay: Duration,
    pending: Arc<AtomicUsize>,
}

impl AdmissionGate {
    pub fn new(pool: Arc<PermitPool>, timeout: Duration, release_delay: Duration) -> Self {
        Self {
            pool,
            timeout,
            release_delay,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wait up to the admission timeout for a permit.
    ///
    /// On success the caller owns the returned [`HeldPermit`]; dropping it
    /// schedules the permit's delayed return. On timeout no permit is consumed.
    pub async fn admit(&self) -> Result<HeldPermit, RateLimitExceeded> {
        if self.pool.try_acquire(self.timeout).await {
            tracing::debug!(available = self.pool.available(), "Permit acquired");
            return Ok(HeldPermit::new(
                Arc::clone(&self.pool),
                Arc::clone(&self.pending),
                self.release_delay,
            ));
        }

        tracing::warn!(
            waited = ?self.timeout,
            capacity = self.pool.capacity(),
            "Rate limit exceeded"
        );
        Err(RateLimitExceeded {
            waited: self.timeout,
        })
    }

    pub fn pool(&self) -> &Arc<PermitPool> {
        &self.pool
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Admitted permits whose delayed release has not fired yet.
    pub fn pending_releases(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }
}
