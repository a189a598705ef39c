//! Permit pool for admission control.
//!
//! A call takes one permit from the [`PermitPool`] and holds it as a
//! [`HeldPermit`]. Dropping the `HeldPermit` does not return the permit
//! immediately: it schedules a single delayed release, so capacity flows back
//! into the pool one release delay after it was taken.

mod pool;
mod release;

pub use pool::PermitPool;
pub use release::HeldPermit;

use std::time::Duration;

use tokio::time::Instant;

/// Roughly 30 years, the horizon tokio itself uses for "never".
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `start + delay`, saturating to a far-future instant instead of overflowing.
pub(crate) fn deadline_after(start: Instant, delay: Duration) -> Instant {
    start
        .checked_add(delay)
        .unwrap_or_else(|| start + FAR_FUTURE)
}
