//! Client configuration.

use std::time::Duration;

use crate::error::BuildError;

/// Registration endpoint of the CRPT "true sign" API.
pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Construction parameters for [`SubmissionClient`](crate::SubmissionClient).
///
/// `time_unit` and `request_limit` define the admission limit: at most
/// `request_limit` calls per `time_unit`. The admission timeout and the
/// per-call release delay are separate knobs and do not follow `time_unit`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Period of the replenish cycle.
    pub time_unit: Duration,
    /// Capacity of the permit pool.
    pub request_limit: usize,
    /// How long `submit` waits for a permit before failing.
    pub admission_timeout: Duration,
    /// Delay between taking a permit and its scheduled return to the pool.
    pub release_delay: Duration,
    pub endpoint: String,
    /// Overall HTTP request timeout.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            time_unit: Duration::from_secs(1),
            request_limit: 5,
            admission_timeout: Duration::from_secs(1),
            release_delay: Duration::from_secs(1),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Allow `request_limit` calls per `time_unit`, defaults elsewhere.
    pub fn new(time_unit: Duration, request_limit: usize) -> Self {
        Self {
            time_unit,
            request_limit,
            ..Default::default()
        }
    }

    pub fn with_admission_timeout(mut self, timeout: Duration) -> Self {
        self.admission_timeout = timeout;
        self
    }

    pub fn with_release_delay(mut self, delay: Duration) -> Self {
        self.release_delay = delay;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        if self.request_limit == 0 {
            return Err(BuildError::InvalidConfig("request_limit must be at least 1"));
        }
        if self.time_unit.is_zero() {
            return Err(BuildError::InvalidConfig("time_unit must be non-zero"));
        }
        Ok(())
    }
}
